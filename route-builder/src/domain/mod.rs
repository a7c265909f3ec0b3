//! Domain types for the route builder.
//!
//! This module contains the value types the search works with: points,
//! runs and their waypoints, search vertices (stops), edges (forward
//! segments) and complete paths. Types that carry invariants enforce them
//! at construction time.

mod error;
mod ids;
mod path;
mod point;
mod run;
mod segment;
mod stop;
mod time;

pub use error::DomainError;
pub use ids::{InvalidId, PointId, RunId};
pub use path::Path;
pub use point::Point;
pub use run::{Run, Waypoint};
pub use segment::ForwardSegment;
pub use stop::{Stop, StopLight};
pub use time::{InstantInterval, Timestamp, day_start};
