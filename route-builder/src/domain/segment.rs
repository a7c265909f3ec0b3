//! Forward segments: the edges of the search graph.

use crate::availability::Properties;

use super::Stop;

/// A directed edge `A -> B -> C`.
///
/// `A` is the boarding stop, `B` the alighting waypoint on the same run, and
/// `C` either `B` itself (the journey ends there) or the boarding stop of a
/// different run at `B`'s point. The profile describes travel from `A` to `B`.
#[derive(Debug, Clone)]
pub struct ForwardSegment {
    pub a: Stop,
    pub b: Stop,
    pub c: Stop,
    pub properties: Properties,
}

impl ForwardSegment {
    pub fn new(a: Stop, b: Stop, c: Stop, properties: Properties) -> Self {
        Self { a, b, c, properties }
    }

    /// Whether the segment changes run at `B`.
    pub fn is_transfer(&self) -> bool {
        self.a.run != self.c.run
    }
}
