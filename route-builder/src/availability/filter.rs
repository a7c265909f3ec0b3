//! Availability filters: how many seats a profile can really offer.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::{AttributeValue, Category, DependencyGraph, Properties};

const DEFAULT_REQUIRED_QUANTITY: u32 = 1;
const DEFAULT_MAX_TRANSFERS: usize = 3;

/// How marked values restrict dependent categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilteringMode {
    /// Marked values are excluded.
    #[default]
    BlackList,
    /// Only marked values count; a category with no marks counts in full.
    WhiteList,
}

/// Constraints a caller puts on seat availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityFilter {
    /// Seats a path must be able to offer.
    pub required_quantity: u32,

    /// Maximum number of run changes.
    pub max_transfers: usize,

    /// Marked values per category, interpreted per `mode`.
    pub marked: BTreeMap<Category, BTreeSet<AttributeValue>>,

    pub mode: FilteringMode,
}

impl Default for AvailabilityFilter {
    fn default() -> Self {
        Self {
            required_quantity: DEFAULT_REQUIRED_QUANTITY,
            max_transfers: DEFAULT_MAX_TRANSFERS,
            marked: BTreeMap::new(),
            mode: FilteringMode::BlackList,
        }
    }
}

impl AvailabilityFilter {
    /// A filter every profile passes.
    pub fn unrestricted(max_transfers: usize) -> Self {
        Self {
            required_quantity: 0,
            max_transfers,
            ..Self::default()
        }
    }

    /// Returns a copy with `value` marked in `category`.
    pub fn mark(mut self, category: Category, value: impl Into<AttributeValue>) -> Self {
        self.marked.entry(category).or_default().insert(value.into());
        self
    }

    pub fn with_mode(mut self, mode: FilteringMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_required_quantity(mut self, required_quantity: u32) -> Self {
        self.required_quantity = required_quantity;
        self
    }

    /// Whether any value is marked.
    pub fn has_marks(&self) -> bool {
        self.marked.values().any(|values| !values.is_empty())
    }

    /// Whether the marks can be satisfied together. A blacklist always can;
    /// a whitelist can not when it marks a dependent value but leaves out
    /// the parent value it hangs off.
    pub fn is_consistent(&self, dependencies: &DependencyGraph) -> bool {
        match self.mode {
            FilteringMode::BlackList => true,
            FilteringMode::WhiteList => dependencies.check_whitelist(&self.marked),
        }
    }

    /// Maximum number of seats obtainable from `properties` under this
    /// filter, resolved through `dependencies` from the total quantity down.
    ///
    /// A category's count is capped by every dependent rollup: a train
    /// cannot offer more seats than its carriage types jointly hold.
    pub fn max_quantity(&self, properties: &Properties, dependencies: &DependencyGraph) -> u32 {
        let mut memo = HashMap::new();
        self.resolve(
            properties,
            dependencies,
            Category::Quantity,
            &AttributeValue::ANY,
            &mut memo,
        )
    }

    /// Whether `properties` offer at least the required quantity.
    pub fn test(&self, properties: &Properties, dependencies: &DependencyGraph) -> bool {
        self.max_quantity(properties, dependencies) >= self.required_quantity
    }

    fn resolve(
        &self,
        properties: &Properties,
        dependencies: &DependencyGraph,
        category: Category,
        value: &AttributeValue,
        memo: &mut HashMap<(Category, AttributeValue), u32>,
    ) -> u32 {
        let key = (category, value.clone());
        if let Some(&known) = memo.get(&key) {
            return known;
        }
        // Provisional entry so a cyclic graph terminates.
        memo.insert(key.clone(), 0);

        let mut quantity = properties.count(category, value);
        for link in dependencies.links(category, value) {
            let marked = self.marked.get(&link.dependent);
            let existing = properties
                .values(link.dependent)
                .into_iter()
                .flat_map(|values| values.keys());
            let mut counts = Vec::new();
            for candidate in existing {
                let is_marked = marked.is_some_and(|m| m.contains(candidate));
                let admitted = match self.mode {
                    FilteringMode::BlackList => !is_marked,
                    FilteringMode::WhiteList => marked.is_none_or(|m| m.is_empty()) || is_marked,
                };
                if admitted {
                    counts.push(self.resolve(properties, dependencies, link.dependent, candidate, memo));
                }
            }
            quantity = quantity.min(link.rollup.apply(counts));
        }

        memo.insert(key, quantity);
        quantity
    }
}
