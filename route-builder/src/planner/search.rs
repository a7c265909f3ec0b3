//! Bounded state-space search between boundary stops.
//!
//! The search explores `(stop, transfer count)` states breadth-first from
//! the sources, recording for every reached state the segments leading
//! into it. Paths are then enumerated lazily from that record in the
//! requested order.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::availability::Properties;
use crate::domain::{ForwardSegment, Path, PointId, RunId, Stop};

use super::depth_first::DepthFirst;
use super::graph::{SearchGraph, transfers_before};
use super::merge_tree::MergeTree;
use super::query::{SortDirection, SortOrder};
use super::transfers::Transfers;

/// Error from the search engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// A stop refers to a run the store does not know
    #[error("run {0} not found")]
    MissingRun(RunId),

    /// Operation called in the wrong lifecycle stage
    #[error("{operation} requires stage {expected}, but the search is {actual}")]
    InvalidStage {
        operation: &'static str,
        expected: &'static str,
        actual: Stage,
    },
}

/// Lifecycle of an [`Algorithm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Initial,
    Executed,
    /// Executed, with availability aggregated.
    Properties,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Initial => "initial",
            Stage::Executed => "executed",
            Stage::Properties => "properties",
        };
        f.write_str(name)
    }
}

enum Enumeration {
    DepthFirst(DepthFirst),
    MergeTree(MergeTree),
}

/// One journey search: boundary stops in, paths out.
///
/// Register sources and targets, call [`execute`](Self::execute), then
/// iterate. Iteration is lazy; each path is built when asked for.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use route_builder::domain::{ForwardSegment, PointId, Stop};
/// use route_builder::planner::{Algorithm, SearchError, SortDirection, SortOrder};
///
/// let no_edges = |_: &HashSet<PointId>, _: &Stop, _: &HashSet<PointId>| -> Result<Vec<ForwardSegment>, SearchError> {
///     Ok(vec![])
/// };
/// let mut algorithm = Algorithm::new(no_edges, 2, SortOrder::Transfers, SortDirection::Asc);
/// algorithm.execute().unwrap();
/// assert!(algorithm.next().is_none());
/// ```
pub struct Algorithm<T> {
    transfers: T,
    order: SortOrder,
    direction: SortDirection,
    stage: Stage,
    graph: SearchGraph,
    properties: Properties,
    enumeration: Option<Enumeration>,
}

impl<T: Transfers> Algorithm<T> {
    pub fn new(transfers: T, max_transfers: usize, order: SortOrder, direction: SortDirection) -> Self {
        Self {
            transfers,
            order,
            direction,
            stage: Stage::Initial,
            graph: SearchGraph::new(max_transfers),
            properties: Properties::default(),
            enumeration: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn max_transfers(&self) -> usize {
        self.graph.max_transfers()
    }

    /// Aggregated availability; empty until [`build_properties`](Self::build_properties).
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    fn require(&self, operation: &'static str, allowed: &[Stage], expected: &'static str) -> Result<(), SearchError> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(SearchError::InvalidStage {
                operation,
                expected,
                actual: self.stage,
            })
        }
    }

    /// Registers a stop the journey may start from.
    pub fn add_source(&mut self, stop: Stop) -> Result<(), SearchError> {
        self.require("add_source", &[Stage::Initial], "initial")?;
        self.graph.add_source(stop);
        Ok(())
    }

    /// Registers a stop the journey may end at.
    pub fn add_target(&mut self, stop: Stop) -> Result<(), SearchError> {
        self.require("add_target", &[Stage::Initial], "initial")?;
        self.graph.add_target(stop);
        Ok(())
    }

    /// Explores every state reachable from the sources within the transfer
    /// bound, then prepares enumeration in the configured order.
    pub fn execute(&mut self) -> Result<(), SearchError> {
        self.require("execute", &[Stage::Initial], "initial")?;

        let departures: HashSet<PointId> = self.graph.sources().iter().map(|s| s.point.clone()).collect();
        let arrivals: HashSet<PointId> = self.graph.targets().iter().map(|s| s.point.clone()).collect();
        let max_transfers = self.graph.max_transfers();

        let mut expanded: Vec<HashSet<Stop>> = vec![HashSet::new(); max_transfers + 1];
        let mut explored: HashSet<(Stop, usize)> = HashSet::new();
        let mut queue: VecDeque<(Stop, usize)> = VecDeque::new();
        for source in self.graph.sources() {
            if explored.insert((source.clone(), 0)) {
                queue.push_back((source.clone(), 0));
            }
        }

        while let Some((current, t)) = queue.pop_front() {
            expanded[t].insert(current.clone());
            if self.graph.is_target(&current) {
                continue;
            }

            for segment in self.transfers.successors(&departures, &current, &arrivals)? {
                let next_t = t + usize::from(segment.is_transfer());
                if next_t > max_transfers {
                    continue;
                }
                let neighbour = segment.c.clone();
                if expanded[next_t].contains(&neighbour) {
                    continue;
                }
                self.graph.add_predecessor(next_t, Arc::new(segment));
                if explored.insert((neighbour.clone(), next_t)) {
                    queue.push_back((neighbour, next_t));
                }
            }
        }

        self.graph.sort_predecessors();
        self.stage = Stage::Executed;
        self.log_counts(explored.len());
        self.prepare_enumeration();
        Ok(())
    }

    fn log_counts(&self, explored: usize) {
        let counts = self.graph.path_counts();
        for (t, count) in counts.iter().enumerate() {
            debug!(transfers = t, paths = count, "Paths by transfer count");
        }
        let total = counts.iter().fold(0u64, |total, count| total.saturating_add(*count));
        info!(
            sources = self.graph.sources().len(),
            targets = self.graph.targets().len(),
            states = explored,
            edges = self.graph.edge_count(),
            reached = self.graph.reached_count(),
            paths = total,
            "Search executed"
        );
    }

    fn prepare_enumeration(&mut self) {
        let enumeration = match self.order {
            SortOrder::Transfers => Enumeration::DepthFirst(DepthFirst::by_transfers(&self.graph, self.direction)),
            SortOrder::Arrival => Enumeration::DepthFirst(DepthFirst::by_arrival(&self.graph, self.direction)),
            SortOrder::Departure => {
                self.graph.build_successors();
                Enumeration::DepthFirst(DepthFirst::by_departure(&self.graph, self.direction))
            }
            SortOrder::Duration => Enumeration::MergeTree(MergeTree::new(&self.graph, self.direction)),
        };
        self.enumeration = Some(enumeration);
    }

    /// Aggregates the best availability over every path found.
    ///
    /// The availability of reaching a stop is the union, over its incoming
    /// edges, of the availability of reaching the edge's origin narrowed by
    /// the edge's own. Calling it again returns the same result.
    pub fn build_properties(&mut self) -> Result<&Properties, SearchError> {
        self.require("build_properties", &[Stage::Executed, Stage::Properties], "executed")?;
        if self.stage == Stage::Properties {
            return Ok(&self.properties);
        }

        let mut memo = HashMap::new();
        let mut properties = Properties::default();
        for t in 0..=self.graph.max_transfers() {
            for target in self.graph.targets() {
                if let Some(reach) = reach_properties(&self.graph, target, t, &mut memo) {
                    properties = properties.max(&reach);
                }
            }
        }
        debug!(states = memo.len(), "Aggregated availability");

        self.properties = properties;
        self.stage = Stage::Properties;
        Ok(&self.properties)
    }

    /// Derives the forward adjacency used by departure ordering.
    pub fn build_successors(&mut self) -> Result<(), SearchError> {
        self.require("build_successors", &[Stage::Executed, Stage::Properties], "executed")?;
        self.graph.build_successors();
        Ok(())
    }

    /// Segments leaving `stop` with `transfers` made, once successors are built.
    pub fn successors(&self, stop: &Stop, transfers: usize) -> &[Arc<ForwardSegment>] {
        self.graph.successors(stop, transfers)
    }

    /// Segments entering `stop` with `transfers` made.
    pub fn predecessors(&self, stop: &Stop, transfers: usize) -> &[Arc<ForwardSegment>] {
        self.graph.predecessors(stop, transfers)
    }
}

/// Availability of reaching `stop` with `t` transfers made. `None` stands
/// for a source, which narrows nothing; a state no path reaches yields an
/// empty profile.
fn reach_properties(
    graph: &SearchGraph,
    stop: &Stop,
    t: usize,
    memo: &mut HashMap<(Stop, usize), Option<Properties>>,
) -> Option<Properties> {
    if t == 0 && graph.is_source(stop) {
        return None;
    }
    if let Some(known) = memo.get(&(stop.clone(), t)) {
        return known.clone();
    }
    let mut properties = Properties::default();
    for segment in graph.predecessors(stop, t) {
        let Some(before) = transfers_before(segment, t) else {
            continue;
        };
        let reach = match reach_properties(graph, &segment.a, before, memo) {
            Some(prefix) => prefix.min(&segment.properties),
            None => segment.properties.clone(),
        };
        properties = properties.max(&reach);
    }
    memo.insert((stop.clone(), t), Some(properties.clone()));
    Some(properties)
}

impl<T> Iterator for Algorithm<T> {
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        match self.enumeration.as_mut()? {
            Enumeration::DepthFirst(enumeration) => enumeration.next(&self.graph),
            Enumeration::MergeTree(enumeration) => enumeration.next(),
        }
    }
}
