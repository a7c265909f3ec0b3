//! Ordered time index.

use std::collections::BTreeMap;
use std::ops::Bound::{self, Excluded, Included, Unbounded};

use crate::domain::Timestamp;

/// Values keyed by instant, iterated in ascending instant order.
///
/// Several values may share an instant; they are kept in insertion order.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use route_builder::schedule::Timeline;
///
/// let t = |m| Utc.with_ymd_and_hms(2017, 1, 1, 10, m, 0).unwrap();
/// let mut timeline = Timeline::new();
/// timeline.insert(t(30), "b");
/// timeline.insert(t(10), "a");
/// timeline.insert(t(50), "c");
///
/// let hits: Vec<_> = timeline.sub_map(t(10), true, t(30), true).map(|(_, v)| *v).collect();
/// assert_eq!(hits, vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline<V> {
    entries: BTreeMap<Timestamp, Vec<V>>,
    len: usize,
}

impl<V> Default for Timeline<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            len: 0,
        }
    }
}

impl<V> Timeline<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of values (not distinct instants).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, instant: Timestamp, value: V) {
        self.entries.entry(instant).or_default().push(value);
        self.len += 1;
    }

    /// All values in ascending instant order.
    pub fn iter(&self) -> impl Iterator<Item = (Timestamp, &V)> {
        self.range(Unbounded, Unbounded)
    }

    /// Values with instants between `from` and `to`.
    ///
    /// Inverted bounds, or equal bounds that are not both inclusive, yield
    /// nothing.
    pub fn sub_map(
        &self,
        from: Timestamp,
        from_inclusive: bool,
        to: Timestamp,
        to_inclusive: bool,
    ) -> impl Iterator<Item = (Timestamp, &V)> {
        let valid = from < to || (from == to && from_inclusive && to_inclusive);
        let (lower, upper) = if valid {
            (bound(from, from_inclusive), bound(to, to_inclusive))
        } else {
            // empty but well-formed for BTreeMap::range
            (Included(from), Excluded(from))
        };
        self.range(lower, upper)
    }

    /// Values with instants after `from`.
    pub fn tail_map(&self, from: Timestamp, inclusive: bool) -> impl Iterator<Item = (Timestamp, &V)> {
        self.range(bound(from, inclusive), Unbounded)
    }

    fn range(
        &self,
        lower: Bound<Timestamp>,
        upper: Bound<Timestamp>,
    ) -> impl Iterator<Item = (Timestamp, &V)> {
        self.entries
            .range((lower, upper))
            .flat_map(|(instant, values)| values.iter().map(move |v| (*instant, v)))
    }
}

fn bound(instant: Timestamp, inclusive: bool) -> Bound<Timestamp> {
    if inclusive {
        Included(instant)
    } else {
        Excluded(instant)
    }
}
