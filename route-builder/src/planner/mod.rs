//! Journey planner.
//!
//! Answers "how do I get from this point to that one within these time
//! windows?" in three phases:
//!
//! 1. Boundary stops are read from the schedule pages of both points.
//! 2. A breadth-first search over `(stop, transfer count)` states records
//!    every edge that can lead from a source towards a target, within the
//!    transfer bound and the availability filter.
//! 3. Paths are enumerated lazily from that record in the requested order:
//!    depth-first for transfer count, departure and arrival, and through a
//!    merge tree for total duration.

mod builder;
mod config;
mod depth_first;
mod graph;
mod handler;
mod level;
mod merge_tree;
mod prefix;
mod query;
mod search;
mod transfers;


pub use builder::{RouteBuilder, RouteSearch};
pub use config::{ConfigError, MAX_TRANSFER_WINDOW_SECS, RouteBuilderConfig};
pub use handler::{DefaultHandler, ResponseHandler, RouteFilter, RouteResponse};
pub use query::{
    PointTimeInterval, QueryError, ResultPresentation, RouteQuery, SortDirection, SortOrder,
    UnknownSortOrder,
};
pub use search::{Algorithm, SearchError, Stage};
pub use transfers::{ScheduleTransfers, Transfers};
