//! Frontiers of the depth-first enumerations.

use std::cmp::Ordering;
use std::collections::VecDeque;

use super::prefix::{PrefixArena, PrefixId};
use super::query::SortDirection;

/// One depth of the exploration stack: candidates waiting to be extended.
pub(crate) trait Level {
    fn add(&mut self, arena: &PrefixArena, id: PrefixId);

    /// Removes the next candidate.
    fn poll(&mut self) -> Option<PrefixId>;

    fn is_empty(&self) -> bool;
}

/// Candidates in insertion order.
#[derive(Debug, Default)]
pub(crate) struct UnorderedLevel {
    queue: VecDeque<PrefixId>,
}

impl UnorderedLevel {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl Level for UnorderedLevel {
    fn add(&mut self, _arena: &PrefixArena, id: PrefixId) {
        self.queue.push_back(id);
    }

    fn poll(&mut self) -> Option<PrefixId> {
        self.queue.pop_front()
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Which instant of a prefix an ordered level sorts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Boundary {
    Departure,
    Arrival,
}

/// Fewest transfers first, then by boundary instant in `direction`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LevelOrder {
    pub boundary: Boundary,
    pub direction: SortDirection,
}

impl LevelOrder {
    pub(crate) fn compare(&self, arena: &PrefixArena, a: PrefixId, b: PrefixId) -> Ordering {
        let instant = |id| match self.boundary {
            Boundary::Departure => arena.departure(id),
            Boundary::Arrival => arena.arrival(id),
        };
        let by_instant = instant(a).cmp(&instant(b));
        let by_instant = match self.direction {
            SortDirection::Asc => by_instant,
            SortDirection::Desc => by_instant.reverse(),
        };
        arena.transfers(a).cmp(&arena.transfers(b)).then(by_instant)
    }
}

/// Candidates kept sorted by a [`LevelOrder`]; ties poll in insertion order.
#[derive(Debug)]
pub(crate) struct OrderedLevel {
    order: LevelOrder,
    queue: VecDeque<PrefixId>,
}

impl OrderedLevel {
    pub(crate) fn new(order: LevelOrder) -> Self {
        Self {
            order,
            queue: VecDeque::new(),
        }
    }
}

impl Level for OrderedLevel {
    fn add(&mut self, arena: &PrefixArena, id: PrefixId) {
        let at = self
            .queue
            .partition_point(|&queued| self.order.compare(arena, queued, id) != Ordering::Greater);
        self.queue.insert(at, id);
    }

    fn poll(&mut self) -> Option<PrefixId> {
        self.queue.pop_front()
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::availability::Properties;
    use crate::domain::{ForwardSegment, PointId, RunId, Stop};
    use crate::planner::prefix::Growth;
    use chrono::{TimeZone, Utc};

    fn segment(run: &str, depart: u32, arrive: u32) -> Arc<ForwardSegment> {
        let at = |h| Utc.with_ymd_and_hms(2017, 1, 1, h, 0, 0).unwrap();
        let run = RunId::new(run).unwrap();
        let idle = Stop::new(1, run.clone(), PointId::new("B").unwrap(), at(arrive));
        Arc::new(ForwardSegment::new(
            Stop::new(0, run, PointId::new("A").unwrap(), at(depart)),
            idle.clone(),
            idle,
            Properties::default(),
        ))
    }

    fn drain(level: &mut dyn Level) -> Vec<PrefixId> {
        std::iter::from_fn(|| level.poll()).collect()
    }

    #[test]
    fn unordered_is_fifo() {
        let mut arena = PrefixArena::new(Growth::Forward);
        let ids: Vec<_> = (0..3).map(|i| arena.root(segment("R", 10 - i, 12), 0)).collect();

        let mut level = UnorderedLevel::new();
        for &id in &ids {
            level.add(&arena, id);
        }
        assert!(!level.is_empty());
        assert_eq!(drain(&mut level), ids);
        assert!(level.is_empty());
    }

    #[test]
    fn ordered_by_transfers_then_departure() {
        let mut arena = PrefixArena::new(Growth::Forward);
        let late_direct = arena.root(segment("R1", 11, 12), 0);
        let early_transfer = arena.root(segment("R2", 6, 12), 1);
        let early_direct = arena.root(segment("R3", 9, 12), 0);
        let tie = arena.root(segment("R4", 9, 13), 0);

        let mut level = OrderedLevel::new(LevelOrder {
            boundary: Boundary::Departure,
            direction: SortDirection::Asc,
        });
        for id in [late_direct, early_transfer, early_direct, tie] {
            level.add(&arena, id);
        }
        assert_eq!(drain(&mut level), vec![early_direct, tie, late_direct, early_transfer]);
    }

    #[test]
    fn descending_arrival() {
        let mut arena = PrefixArena::new(Growth::Backward);
        let early = arena.root(segment("R1", 8, 10), 0);
        let late = arena.root(segment("R2", 8, 14), 0);

        let mut level = OrderedLevel::new(LevelOrder {
            boundary: Boundary::Arrival,
            direction: SortDirection::Desc,
        });
        level.add(&arena, early);
        level.add(&arena, late);
        assert_eq!(drain(&mut level), vec![late, early]);
    }
}
