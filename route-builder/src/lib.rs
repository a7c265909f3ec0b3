//! Multi-criteria journey planner over scheduled runs.
//!
//! Given departure and arrival points with time windows, finds itineraries
//! through a network of runs, changing runs at most a bounded number of
//! times, subject to seat availability. Itineraries are produced lazily in
//! the requested order: by number of changes, departure, arrival or total
//! duration.

pub mod availability;
pub mod cache;
pub mod domain;
pub mod network;
pub mod planner;
pub mod schedule;
pub mod store;
