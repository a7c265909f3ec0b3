//! The layered graph recorded by a search.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::domain::{ForwardSegment, Stop};

type Adjacency = HashMap<Stop, Vec<Arc<ForwardSegment>>>;

/// Stops reached by a search, layered by transfer count.
///
/// `predecessors[t][s]` holds the segments through which `s` was reached
/// having made `t` transfers. Successors are the same edges keyed by their
/// origin and the origin's transfer count.
#[derive(Debug)]
pub(crate) struct SearchGraph {
    max_transfers: usize,
    sources: Vec<Stop>,
    targets: Vec<Stop>,
    source_set: HashSet<Stop>,
    target_set: HashSet<Stop>,
    predecessors: Vec<Adjacency>,
    successors: Vec<Adjacency>,
    successors_built: bool,
}

/// Transfer count at the origin of `segment` when its destination is
/// reached with `transfers`.
pub(crate) fn transfers_before(segment: &ForwardSegment, transfers: usize) -> Option<usize> {
    if segment.is_transfer() {
        transfers.checked_sub(1)
    } else {
        Some(transfers)
    }
}

impl SearchGraph {
    pub(crate) fn new(max_transfers: usize) -> Self {
        Self {
            max_transfers,
            sources: Vec::new(),
            targets: Vec::new(),
            source_set: HashSet::new(),
            target_set: HashSet::new(),
            predecessors: (0..=max_transfers).map(|_| Adjacency::new()).collect(),
            successors: (0..=max_transfers).map(|_| Adjacency::new()).collect(),
            successors_built: false,
        }
    }

    pub(crate) fn max_transfers(&self) -> usize {
        self.max_transfers
    }

    pub(crate) fn add_source(&mut self, stop: Stop) {
        if self.source_set.insert(stop.clone()) {
            self.sources.push(stop);
        }
    }

    pub(crate) fn add_target(&mut self, stop: Stop) {
        if self.target_set.insert(stop.clone()) {
            self.targets.push(stop);
        }
    }

    /// Sources in insertion order.
    pub(crate) fn sources(&self) -> &[Stop] {
        &self.sources
    }

    /// Targets in insertion order.
    pub(crate) fn targets(&self) -> &[Stop] {
        &self.targets
    }

    pub(crate) fn is_source(&self, stop: &Stop) -> bool {
        self.source_set.contains(stop)
    }

    pub(crate) fn is_target(&self, stop: &Stop) -> bool {
        self.target_set.contains(stop)
    }

    pub(crate) fn add_predecessor(&mut self, transfers: usize, segment: Arc<ForwardSegment>) {
        self.predecessors[transfers]
            .entry(segment.c.clone())
            .or_default()
            .push(segment);
    }

    pub(crate) fn predecessors(&self, stop: &Stop, transfers: usize) -> &[Arc<ForwardSegment>] {
        self.predecessors
            .get(transfers)
            .and_then(|layer| layer.get(stop))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn successors(&self, stop: &Stop, transfers: usize) -> &[Arc<ForwardSegment>] {
        self.successors
            .get(transfers)
            .and_then(|layer| layer.get(stop))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Orders every predecessor list by descending alighting offset, so
    /// the most direct edges are tried first.
    pub(crate) fn sort_predecessors(&mut self) {
        for layer in &mut self.predecessors {
            for incoming in layer.values_mut() {
                incoming.sort_by(|x, y| y.b.offset.cmp(&x.b.offset));
            }
        }
    }

    /// Records the edges leading to targets as successors of their origins.
    ///
    /// Only edges lying on some path to a target are included; each
    /// `(stop, transfers)` state is walked once. Repeated calls do nothing.
    pub(crate) fn build_successors(&mut self) {
        if self.successors_built {
            return;
        }
        self.successors_built = true;

        let mut visited = HashSet::new();
        let mut pending: Vec<(Stop, usize)> = Vec::new();
        for t in 0..=self.max_transfers {
            for target in &self.targets {
                pending.push((target.clone(), t));
            }
        }

        while let Some((stop, t)) = pending.pop() {
            if !visited.insert((stop.clone(), t)) {
                continue;
            }
            let incoming: Vec<_> = self.predecessors(&stop, t).to_vec();
            for segment in incoming {
                let Some(before) = transfers_before(&segment, t) else {
                    continue;
                };
                pending.push((segment.a.clone(), before));
                self.successors[before]
                    .entry(segment.a.clone())
                    .or_default()
                    .push(segment);
            }
        }

        for layer in &mut self.successors {
            for outgoing in layer.values_mut() {
                outgoing.sort_by_key(|s| s.b.offset);
            }
        }
    }

    /// Number of `(stop, transfers)` states with at least one incoming edge.
    pub(crate) fn reached_count(&self) -> usize {
        self.predecessors.iter().map(HashMap::len).sum()
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.predecessors
            .iter()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Number of distinct source-to-target paths per transfer count.
    pub(crate) fn path_counts(&self) -> Vec<u64> {
        let mut memo = HashMap::new();
        (0..=self.max_transfers)
            .map(|t| {
                self.targets
                    .iter()
                    .fold(0u64, |total, target| total.saturating_add(self.count_paths(target, t, &mut memo)))
            })
            .collect()
    }

    fn count_paths(&self, stop: &Stop, t: usize, memo: &mut HashMap<(Stop, usize), u64>) -> u64 {
        if let Some(&known) = memo.get(&(stop.clone(), t)) {
            return known;
        }
        let count = if t == 0 && self.is_source(stop) {
            1
        } else {
            self.predecessors(stop, t).iter().fold(0u64, |total, segment| {
                let before = transfers_before(segment, t);
                let prefixes = before.map_or(0, |before| self.count_paths(&segment.a, before, memo));
                total.saturating_add(prefixes)
            })
        };
        memo.insert((stop.clone(), t), count);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::Properties;
    use crate::domain::{PointId, RunId};
    use chrono::{TimeZone, Utc};

    fn stop(run: &str, offset: usize, point: &str, hour: u32) -> Stop {
        Stop::new(
            offset,
            RunId::new(run).unwrap(),
            PointId::new(point).unwrap(),
            Utc.with_ymd_and_hms(2017, 1, 1, hour, 0, 0).unwrap(),
        )
    }

    fn segment(a: Stop, b: Stop, c: Stop) -> Arc<ForwardSegment> {
        Arc::new(ForwardSegment::new(a, b, c, Properties::default()))
    }

    /// A -R1-> B, transfer to R2 -> C; also R1 direct to C.
    fn diamond() -> SearchGraph {
        let mut graph = SearchGraph::new(1);
        let source = stop("R1", 0, "A", 8);
        let via_r1 = stop("R1", 2, "C", 12);
        let via_r2 = stop("R2", 1, "C", 11);
        graph.add_source(source.clone());
        graph.add_target(via_r1.clone());
        graph.add_target(via_r2.clone());
        graph.add_target(via_r2.clone());

        let board = stop("R2", 0, "B", 10);
        graph.add_predecessor(0, segment(source.clone(), via_r1.clone(), via_r1));
        graph.add_predecessor(1, segment(source, stop("R1", 1, "B", 9), board.clone()));
        graph.add_predecessor(1, segment(board, via_r2.clone(), via_r2));
        graph
    }

    #[test]
    fn deduplicates_boundaries() {
        let graph = diamond();
        assert_eq!(graph.sources().len(), 1);
        assert_eq!(graph.targets().len(), 2);
        assert!(graph.is_target(&stop("R2", 1, "C", 0)));
        assert!(!graph.is_source(&stop("R2", 0, "B", 10)));
    }

    #[test]
    fn counts() {
        let graph = diamond();
        assert_eq!(graph.reached_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.path_counts(), vec![1, 1]);
    }

    #[test]
    fn successors_follow_paths_to_targets() {
        let mut graph = diamond();
        graph.build_successors();
        graph.build_successors();

        let source = stop("R1", 0, "A", 8);
        let out: Vec<_> = graph.successors(&source, 0).iter().map(|s| s.b.offset).collect();
        assert_eq!(out, vec![1, 2]);
        assert_eq!(graph.successors(&stop("R2", 0, "B", 10), 1).len(), 1);
        assert!(graph.successors(&source, 1).is_empty());
    }

    #[test]
    fn predecessors_sorted_most_direct_first() {
        let mut graph = SearchGraph::new(0);
        let target = stop("R1", 3, "D", 12);
        graph.add_predecessor(0, segment(stop("R1", 0, "A", 8), stop("R1", 1, "B", 9), target.clone()));
        graph.add_predecessor(0, segment(stop("R1", 0, "A", 8), stop("R1", 2, "C", 10), target.clone()));
        graph.sort_predecessors();

        let offsets: Vec<_> = graph.predecessors(&target, 0).iter().map(|s| s.b.offset).collect();
        assert_eq!(offsets, vec![2, 1]);
        assert!(graph.predecessors(&target, 5).is_empty());
    }
}
