//! Shared path prefixes.
//!
//! Enumeration builds many candidate paths that share most of their
//! segments. Each candidate is a chain of nodes in a [`PrefixArena`]; a new
//! candidate adds one node pointing at the prefix it extends, so siblings
//! share their common tail and nothing is copied until a [`Path`] is
//! materialized.

use std::sync::Arc;

use chrono::Duration;

use crate::domain::{ForwardSegment, Path, RunId, Timestamp};

/// Index of a prefix node in its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PrefixId(usize);

/// Which end of the path a chain grows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Growth {
    /// New nodes are later in time; the root holds the first segment.
    Forward,
    /// New nodes are earlier in time; the root holds the last segment.
    Backward,
}

#[derive(Debug)]
struct PrefixNode {
    segment: Arc<ForwardSegment>,
    parent: Option<PrefixId>,
    /// Transfer count at the open end of the chain.
    transfers: usize,
    departure: Timestamp,
    arrival: Timestamp,
}

#[derive(Debug)]
pub(crate) struct PrefixArena {
    growth: Growth,
    nodes: Vec<PrefixNode>,
}

impl PrefixArena {
    pub(crate) fn new(growth: Growth) -> Self {
        Self {
            growth,
            nodes: Vec::new(),
        }
    }

    pub(crate) fn growth(&self) -> Growth {
        self.growth
    }

    /// A single-segment chain.
    pub(crate) fn root(&mut self, segment: Arc<ForwardSegment>, transfers: usize) -> PrefixId {
        let node = PrefixNode {
            departure: segment.a.time,
            arrival: segment.c.time,
            segment,
            parent: None,
            transfers,
        };
        self.push(node)
    }

    /// Extends `parent` at its open end.
    pub(crate) fn extend(
        &mut self,
        parent: PrefixId,
        segment: Arc<ForwardSegment>,
        transfers: usize,
    ) -> PrefixId {
        let (departure, arrival) = match self.growth {
            Growth::Forward => (self.node(parent).departure, segment.c.time),
            Growth::Backward => (segment.a.time, self.node(parent).arrival),
        };
        let node = PrefixNode {
            segment,
            parent: Some(parent),
            transfers,
            departure,
            arrival,
        };
        self.push(node)
    }

    fn push(&mut self, node: PrefixNode) -> PrefixId {
        self.nodes.push(node);
        PrefixId(self.nodes.len() - 1)
    }

    fn node(&self, id: PrefixId) -> &PrefixNode {
        &self.nodes[id.0]
    }

    /// The segment at the open end.
    pub(crate) fn segment(&self, id: PrefixId) -> &Arc<ForwardSegment> {
        &self.node(id).segment
    }

    pub(crate) fn transfers(&self, id: PrefixId) -> usize {
        self.node(id).transfers
    }

    pub(crate) fn departure(&self, id: PrefixId) -> Timestamp {
        self.node(id).departure
    }

    pub(crate) fn arrival(&self, id: PrefixId) -> Timestamp {
        self.node(id).arrival
    }

    pub(crate) fn duration(&self, id: PrefixId) -> Duration {
        self.arrival(id) - self.departure(id)
    }

    /// Segments from the open end back to the root.
    fn chain(&self, id: PrefixId) -> impl Iterator<Item = &Arc<ForwardSegment>> {
        std::iter::successors(Some(id), |&id| self.node(id).parent).map(|id| &self.node(id).segment)
    }

    /// Whether any segment of the chain rides `run`.
    pub(crate) fn visits_run(&self, id: PrefixId, run: &RunId) -> bool {
        self.chain(id).any(|s| &s.a.run == run || &s.c.run == run)
    }

    /// Boarded runs in path order.
    pub(crate) fn signature(&self, id: PrefixId) -> Vec<RunId> {
        let mut runs: Vec<RunId> = self.chain(id).map(|s| s.a.run.clone()).collect();
        if self.growth == Growth::Forward {
            runs.reverse();
        }
        runs
    }

    pub(crate) fn path(&self, id: PrefixId) -> Path {
        let mut segments: Vec<_> = self.chain(id).cloned().collect();
        if self.growth == Growth::Forward {
            segments.reverse();
        }
        Path::from_linked(segments)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::Properties;
    use crate::domain::{PointId, Stop};
    use chrono::{TimeZone, Utc};

    fn stop(run: &str, offset: usize, point: &str, hour: u32) -> Stop {
        Stop::new(
            offset,
            RunId::new(run).unwrap(),
            PointId::new(point).unwrap(),
            Utc.with_ymd_and_hms(2017, 1, 1, hour, 0, 0).unwrap(),
        )
    }

    fn first() -> Arc<ForwardSegment> {
        Arc::new(ForwardSegment::new(
            stop("R1", 0, "A", 8),
            stop("R1", 1, "B", 10),
            stop("R2", 0, "B", 11),
            Properties::default(),
        ))
    }

    fn last() -> Arc<ForwardSegment> {
        let idle = stop("R2", 1, "C", 13);
        Arc::new(ForwardSegment::new(
            stop("R2", 0, "B", 11),
            idle.clone(),
            idle,
            Properties::default(),
        ))
    }

    #[test]
    fn forward_chain() {
        let mut arena = PrefixArena::new(Growth::Forward);
        let root = arena.root(first(), 1);
        let full = arena.extend(root, last(), 1);

        assert_eq!(arena.duration(root), Duration::hours(3));
        assert_eq!(arena.duration(full), Duration::hours(5));

        let path = arena.path(full);
        assert_eq!(path.len(), 2);
        assert_eq!(path.segments()[0].a.point.as_str(), "A");
        assert_eq!(path.arrival(), arena.arrival(full));
        assert_eq!(
            arena.signature(full),
            vec![RunId::new("R1").unwrap(), RunId::new("R2").unwrap()]
        );
    }

    #[test]
    fn backward_chain() {
        let mut arena = PrefixArena::new(Growth::Backward);
        let root = arena.root(last(), 1);
        let full = arena.extend(root, first(), 0);

        assert_eq!(arena.transfers(full), 0);
        assert_eq!(arena.departure(full), Utc.with_ymd_and_hms(2017, 1, 1, 8, 0, 0).unwrap());

        let path = arena.path(full);
        assert_eq!(path.segments()[0].a.point.as_str(), "A");
        assert_eq!(path.segments()[1].c.point.as_str(), "C");
        assert_eq!(
            arena.signature(full),
            vec![RunId::new("R1").unwrap(), RunId::new("R2").unwrap()]
        );
    }

    #[test]
    fn siblings_share_their_tail() {
        let mut arena = PrefixArena::new(Growth::Backward);
        let root = arena.root(last(), 1);
        let a = arena.extend(root, first(), 0);
        let b = arena.extend(root, first(), 0);

        assert_eq!(arena.len(), 3);
        assert_ne!(a, b);
        assert!(arena.visits_run(a, &RunId::new("R2").unwrap()));
        assert!(!arena.visits_run(root, &RunId::new("R1").unwrap()));
    }
}
