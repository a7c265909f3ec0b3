//! Seat availability engine.
//!
//! Every run segment carries a [`Properties`] profile: seat counts per
//! attribute category and value. Profiles of consecutive segments are
//! intersected with [`Properties::min`], alternatives are merged with
//! [`Properties::max`], and an [`AvailabilityFilter`] resolves how many
//! seats a profile can actually offer through the [`DependencyGraph`].

mod category;
mod dependencies;
mod filter;
mod properties;
mod range;
mod tree;

pub use category::{AttributeValue, Berth, CarriageType, Category, Side, TransportType, WcProximity};
pub use dependencies::{DependencyGraph, Link, Rollup};
pub use filter::{AvailabilityFilter, FilteringMode};
pub use properties::Properties;
pub use range::RangeAggregator;
pub use tree::AvailabilityTree;
