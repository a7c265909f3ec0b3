//! Duration-ordered path enumeration.
//!
//! Every reachable `(stop, transfers)` state gets a node producing the
//! prefixes that end there, shortest first. A node merges its incoming
//! edges: one lazy link per edge, holding the best prefix of the edge's
//! origin not yet combined with the edge. Taking the cheapest link and
//! advancing it along the origin's (cached) sequence yields the next
//! prefix, so only as much of each sequence is built as the output needs.
//!
//! All prefixes ending at one stop share their arrival instant, so ordering
//! them by duration is ordering them by departure, and extending each by
//! the same edge preserves the order.

use std::cmp::{Ordering, Reverse};
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::Arc;

use crate::domain::{ForwardSegment, Path, RunId, Stop};

use super::graph::{SearchGraph, transfers_before};
use super::prefix::{Growth, PrefixArena, PrefixId};
use super::query::SortDirection;

#[derive(Debug)]
struct LazyLink {
    rank: i64,
    seq: u64,
    /// Edge appended to the origin's prefixes; `None` for the root's links.
    segment: Option<Arc<ForwardSegment>>,
    /// Origin prefix; `None` when the origin is a source.
    current: Option<PrefixId>,
    child: usize,
    /// Position of the origin's next prefix.
    index: usize,
}

impl PartialEq for LazyLink {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LazyLink {}

impl PartialOrd for LazyLink {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LazyLink {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.rank, self.seq).cmp(&(other.rank, other.seq))
    }
}

#[derive(Debug)]
enum NodeKind {
    /// A source: a single empty prefix.
    Source,
    Inner,
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    transfers: usize,
    queue: BinaryHeap<Reverse<LazyLink>>,
    cache: Vec<PrefixId>,
}

impl Node {
    fn new(kind: NodeKind, transfers: usize) -> Self {
        Self {
            kind,
            transfers,
            queue: BinaryHeap::new(),
            cache: Vec::new(),
        }
    }
}

pub(crate) struct MergeTree {
    arena: PrefixArena,
    direction: SortDirection,
    nodes: Vec<Node>,
    root: usize,
    seq: u64,
    used: HashSet<Vec<RunId>>,
}

impl MergeTree {
    pub(crate) fn new(graph: &SearchGraph, direction: SortDirection) -> Self {
        let mut tree = Self {
            arena: PrefixArena::new(Growth::Forward),
            direction,
            nodes: vec![Node::new(NodeKind::Inner, 0)],
            root: 0,
            seq: 0,
            used: HashSet::new(),
        };

        let mut index = HashMap::new();
        for t in 0..=graph.max_transfers() {
            for target in graph.targets() {
                let node = tree.build(graph, &mut index, target, t);
                // a target without prefixes was never reached at this count
                if let Some(Some(first)) = tree.item(node, 0) {
                    tree.push_link(tree.root, None, Some(first), node, 1);
                }
            }
        }
        tree
    }

    fn build(
        &mut self,
        graph: &SearchGraph,
        index: &mut HashMap<(Stop, usize), usize>,
        stop: &Stop,
        t: usize,
    ) -> usize {
        let id = match index.entry((stop.clone(), t)) {
            Entry::Occupied(known) => return *known.get(),
            Entry::Vacant(slot) => {
                let kind = if t == 0 && graph.is_source(stop) {
                    NodeKind::Source
                } else {
                    NodeKind::Inner
                };
                self.nodes.push(Node::new(kind, t));
                *slot.insert(self.nodes.len() - 1)
            }
        };

        for segment in graph.predecessors(stop, t) {
            let Some(before) = transfers_before(segment, t) else {
                continue;
            };
            let child = self.build(graph, index, &segment.a, before);
            if let Some(first) = self.item(child, 0) {
                self.push_link(id, Some(Arc::clone(segment)), first, child, 1);
            }
        }
        id
    }

    fn push_link(
        &mut self,
        node: usize,
        segment: Option<Arc<ForwardSegment>>,
        current: Option<PrefixId>,
        child: usize,
        index: usize,
    ) {
        let departure = match (current, &segment) {
            (Some(prefix), _) => self.arena.departure(prefix),
            (None, Some(segment)) => segment.a.time,
            (None, None) => return,
        };
        let arrival = match (&segment, current) {
            (Some(segment), _) => segment.c.time,
            (None, Some(prefix)) => self.arena.arrival(prefix),
            (None, None) => return,
        };
        let millis = (arrival - departure).num_milliseconds();
        let rank = match self.direction {
            SortDirection::Asc => millis,
            SortDirection::Desc => -millis,
        };
        self.seq += 1;
        self.nodes[node].queue.push(Reverse(LazyLink {
            rank,
            seq: self.seq,
            segment,
            current,
            child,
            index,
        }));
    }

    /// The `i`-th prefix ending at `node`: `Some(None)` is the empty prefix
    /// of a source, `None` means the sequence is shorter than `i`.
    fn item(&mut self, node: usize, i: usize) -> Option<Option<PrefixId>> {
        if let NodeKind::Source = self.nodes[node].kind {
            return (i == 0).then_some(None);
        }
        while self.nodes[node].cache.len() <= i {
            let next = self.advance(node)?;
            self.nodes[node].cache.push(next);
        }
        Some(Some(self.nodes[node].cache[i]))
    }

    /// Pops the cheapest link of `node` and returns its prefix.
    fn advance(&mut self, node: usize) -> Option<PrefixId> {
        let Reverse(link) = self.nodes[node].queue.pop()?;
        if let Some(next) = self.item(link.child, link.index) {
            self.push_link(node, link.segment.clone(), next, link.child, link.index + 1);
        }
        let transfers = self.nodes[node].transfers;
        match (link.segment, link.current) {
            (Some(segment), Some(prefix)) => Some(self.arena.extend(prefix, segment, transfers)),
            (Some(segment), None) => Some(self.arena.root(segment, transfers)),
            (None, current) => current,
        }
    }

    /// Next path in duration order, skipping paths that ride a run twice or
    /// repeat an emitted run sequence.
    pub(crate) fn next(&mut self) -> Option<Path> {
        loop {
            let id = self.advance(self.root)?;
            let signature = self.arena.signature(id);
            let mut seen = HashSet::with_capacity(signature.len());
            if !signature.iter().all(|run| seen.insert(run)) {
                continue;
            }
            if self.used.insert(signature) {
                return Some(self.arena.path(id));
            }
        }
    }
}
