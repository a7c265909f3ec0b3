//! Depth-first path enumeration over the recorded search graph.
//!
//! Backward enumeration starts from the edges entering the targets and
//! walks predecessors until it reaches a source; forward enumeration
//! starts from the edges leaving the sources and walks successors until it
//! reaches a target. The first level decides the output order; deeper
//! levels are plain FIFO buffers.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::{Path, RunId};

use super::graph::{SearchGraph, transfers_before};
use super::level::{Boundary, Level, LevelOrder, OrderedLevel, UnorderedLevel};
use super::prefix::{Growth, PrefixArena, PrefixId};
use super::query::SortDirection;

pub(crate) struct DepthFirst {
    arena: PrefixArena,
    stack: Vec<Box<dyn Level + Send>>,
    /// Run sequences already emitted.
    used: HashSet<Vec<RunId>>,
}

impl DepthFirst {
    /// Paths by transfer count: the edges entering every target, fewest
    /// (or most) transfers first.
    pub(crate) fn by_transfers(graph: &SearchGraph, direction: SortDirection) -> Self {
        let mut arena = PrefixArena::new(Growth::Backward);
        let mut level = UnorderedLevel::new();
        let layers: Vec<usize> = match direction {
            SortDirection::Asc => (0..=graph.max_transfers()).collect(),
            SortDirection::Desc => (0..=graph.max_transfers()).rev().collect(),
        };
        for t in layers {
            Self::seed_targets(graph, &mut arena, &mut level, t);
        }
        Self::with_root(arena, Box::new(level))
    }

    /// Paths by arrival: the edges entering every target, by transfer count
    /// then arrival instant.
    pub(crate) fn by_arrival(graph: &SearchGraph, direction: SortDirection) -> Self {
        let mut arena = PrefixArena::new(Growth::Backward);
        let mut level = OrderedLevel::new(LevelOrder {
            boundary: Boundary::Arrival,
            direction,
        });
        for t in 0..=graph.max_transfers() {
            Self::seed_targets(graph, &mut arena, &mut level, t);
        }
        Self::with_root(arena, Box::new(level))
    }

    /// Paths by departure: the edges leaving every source, by transfer
    /// count of the first edge then departure instant.
    ///
    /// `graph` must have its successors built.
    pub(crate) fn by_departure(graph: &SearchGraph, direction: SortDirection) -> Self {
        let mut arena = PrefixArena::new(Growth::Forward);
        let mut level = OrderedLevel::new(LevelOrder {
            boundary: Boundary::Departure,
            direction,
        });
        for source in graph.sources() {
            for segment in graph.successors(source, 0) {
                let transfers = usize::from(segment.is_transfer());
                let id = arena.root(Arc::clone(segment), transfers);
                level.add(&arena, id);
            }
        }
        Self::with_root(arena, Box::new(level))
    }

    fn seed_targets(graph: &SearchGraph, arena: &mut PrefixArena, level: &mut dyn Level, t: usize) {
        for target in graph.targets() {
            for segment in graph.predecessors(target, t) {
                let Some(before) = transfers_before(segment, t) else {
                    continue;
                };
                let id = arena.root(Arc::clone(segment), before);
                level.add(arena, id);
            }
        }
    }

    fn with_root(arena: PrefixArena, root: Box<dyn Level + Send>) -> Self {
        Self {
            arena,
            stack: vec![root],
            used: HashSet::new(),
        }
    }

    fn growth(&self) -> Growth {
        self.arena.growth()
    }

    /// Next path, or `None` once every level is exhausted.
    pub(crate) fn next(&mut self, graph: &SearchGraph) -> Option<Path> {
        while let Some(level) = self.stack.last_mut() {
            let Some(id) = level.poll() else {
                self.stack.pop();
                continue;
            };
            // A partial prefix whose runs match an emitted sequence is
            // dropped with every extension, so a connection feeding into an
            // already offered run is not offered after it.
            let signature = self.arena.signature(id);
            if self.used.contains(&signature) {
                continue;
            }

            let segment = Arc::clone(self.arena.segment(id));
            let complete = match self.growth() {
                Growth::Backward => graph.is_source(&segment.a),
                Growth::Forward => graph.is_target(&segment.c),
            };
            if complete {
                self.used.insert(signature);
                let path = self.arena.path(id);
                // a multi-segment path ends this branch's siblings
                if path.len() > 1 {
                    self.stack.pop();
                }
                return Some(path);
            }

            let level = self.expand(graph, id);
            self.stack.push(Box::new(level));
        }
        None
    }

    fn expand(&mut self, graph: &SearchGraph, id: PrefixId) -> UnorderedLevel {
        let segment = Arc::clone(self.arena.segment(id));
        let transfers = self.arena.transfers(id);
        let mut level = UnorderedLevel::new();

        let (neighbours, growth) = match self.growth() {
            Growth::Backward => (graph.predecessors(&segment.a, transfers), Growth::Backward),
            Growth::Forward => (graph.successors(&segment.c, transfers), Growth::Forward),
        };
        for next in neighbours {
            let (entered, next_transfers) = match growth {
                Growth::Backward => (&next.a.run, transfers_before(next, transfers)),
                Growth::Forward => (
                    &next.c.run,
                    Some(transfers + usize::from(next.is_transfer()))
                        .filter(|&t| t <= graph.max_transfers()),
                ),
            };
            let Some(next_transfers) = next_transfers else {
                continue;
            };
            if next.is_transfer() && self.arena.visits_run(id, entered) {
                continue;
            }
            let child = self.arena.extend(id, Arc::clone(next), next_transfers);
            if !self.used.contains(&self.arena.signature(child)) {
                level.add(&self.arena, child);
            }
        }
        level
    }
}
