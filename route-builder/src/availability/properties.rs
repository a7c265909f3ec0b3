//! Availability profiles.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

use super::{AttributeValue, Category};

/// Seat counts per category and value.
///
/// The empty profile means "no constraint recorded" and is the identity of
/// both [`Properties::min`] and [`Properties::max`]. Merges never leave a
/// category with an empty value map behind.
///
/// # Examples
///
/// ```
/// use route_builder::availability::{AttributeValue, Category, Properties};
///
/// let a = Properties::new().with(Category::Quantity, AttributeValue::ANY, 5);
/// let b = Properties::new().with(Category::Quantity, AttributeValue::ANY, 2);
/// assert_eq!(a.min(&b).count(Category::Quantity, &AttributeValue::ANY), 2);
/// assert_eq!(a.max(&b).count(Category::Quantity, &AttributeValue::ANY), 5);
/// assert_eq!(a.min(&Properties::new()), a);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<Category, BTreeMap<AttributeValue, u32>>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `count` recorded for `category = value`.
    pub fn with(mut self, category: Category, value: impl Into<AttributeValue>, count: u32) -> Self {
        self.insert(category, value, count);
        self
    }

    /// Records `count` for `category = value`, replacing any previous count.
    pub fn insert(&mut self, category: Category, value: impl Into<AttributeValue>, count: u32) {
        self.0.entry(category).or_default().insert(value.into(), count);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Count for `category = value`, zero when absent.
    pub fn count(&self, category: Category, value: &AttributeValue) -> u32 {
        self.values(category)
            .and_then(|values| values.get(value))
            .copied()
            .unwrap_or(0)
    }

    /// All recorded values of a category.
    pub fn values(&self, category: Category) -> Option<&BTreeMap<AttributeValue, u32>> {
        self.0.get(&category)
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.0.keys().copied()
    }

    /// Intersection: per category, the minimum count of values present on
    /// both sides. A category recorded on only one side is kept as is.
    pub fn min(&self, other: &Properties) -> Properties {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }

        let mut merged: BTreeMap<Category, BTreeMap<AttributeValue, u32>> = BTreeMap::new();
        for category in self.0.keys().chain(other.0.keys()) {
            if merged.contains_key(category) {
                continue;
            }
            let values = match (self.0.get(category), other.0.get(category)) {
                (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => a
                    .iter()
                    .filter_map(|(value, count)| b.get(value).map(|other| (value.clone(), *count.min(other))))
                    .collect(),
                (Some(a), Some(b)) if b.is_empty() => a.clone(),
                (Some(a), None) => a.clone(),
                (_, Some(b)) => b.clone(),
                (None, None) => BTreeMap::new(),
            };
            merged.insert(*category, values);
        }
        merged.retain(|_, values| !values.is_empty());
        Properties(merged)
    }

    /// Union: per category and value, the maximum count.
    pub fn max(&self, other: &Properties) -> Properties {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }

        let mut merged = self.0.clone();
        for (category, values) in &other.0 {
            let target = merged.entry(*category).or_default();
            for (value, count) in values {
                match target.entry(value.clone()) {
                    Entry::Occupied(mut slot) => {
                        let current = slot.get_mut();
                        *current = (*current).max(*count);
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(*count);
                    }
                }
            }
        }
        merged.retain(|_, values| !values.is_empty());
        Properties(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::{CarriageType, TransportType};

    fn any() -> AttributeValue {
        AttributeValue::ANY
    }

    #[test]
    fn min_intersects_values() {
        let a = Properties::new()
            .with(Category::CarriageType, CarriageType::Coupe, 4)
            .with(Category::CarriageType, CarriageType::OpenPlan, 10);
        let b = Properties::new()
            .with(Category::CarriageType, CarriageType::Coupe, 7)
            .with(Category::CarriageType, CarriageType::Local, 3);

        let merged = a.min(&b);
        assert_eq!(merged.count(Category::CarriageType, &CarriageType::Coupe.into()), 4);
        assert_eq!(merged.count(Category::CarriageType, &CarriageType::OpenPlan.into()), 0);
        assert_eq!(merged.values(Category::CarriageType).unwrap().len(), 1);
    }

    #[test]
    fn min_keeps_one_sided_categories() {
        let a = Properties::new().with(Category::Quantity, any(), 3);
        let b = Properties::new().with(Category::TransportType, TransportType::Train, 8);

        let merged = a.min(&b);
        assert_eq!(merged.count(Category::Quantity, &any()), 3);
        assert_eq!(merged.count(Category::TransportType, &TransportType::Train.into()), 8);
    }

    #[test]
    fn min_prunes_disjoint_categories() {
        let a = Properties::new()
            .with(Category::Quantity, any(), 3)
            .with(Category::TrainCarrier, AttributeValue::new("RZD"), 3);
        let b = Properties::new()
            .with(Category::Quantity, any(), 5)
            .with(Category::TrainCarrier, AttributeValue::new("TVZ"), 5);

        let merged = a.min(&b);
        assert_eq!(merged.values(Category::TrainCarrier), None);
        assert_eq!(merged.categories().collect::<Vec<_>>(), vec![Category::Quantity]);
    }

    #[test]
    fn max_unions_values() {
        let a = Properties::new()
            .with(Category::CarriageType, CarriageType::Coupe, 4)
            .with(Category::Quantity, any(), 4);
        let b = Properties::new()
            .with(Category::CarriageType, CarriageType::Coupe, 2)
            .with(Category::CarriageType, CarriageType::Local, 9);

        let merged = a.max(&b);
        assert_eq!(merged.count(Category::CarriageType, &CarriageType::Coupe.into()), 4);
        assert_eq!(merged.count(Category::CarriageType, &CarriageType::Local.into()), 9);
        assert_eq!(merged.count(Category::Quantity, &any()), 4);
    }

    #[test]
    fn empty_is_identity() {
        let a = Properties::new().with(Category::Quantity, any(), 1);
        assert_eq!(a.min(&Properties::new()), a);
        assert_eq!(Properties::new().min(&a), a);
        assert_eq!(a.max(&Properties::new()), a);
        assert_eq!(Properties::new().max(&a), a);
    }

    #[test]
    fn serde_shape() {
        let a = Properties::new()
            .with(Category::Quantity, any(), 2)
            .with(Category::TransportType, TransportType::Train, 2);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, r#"{"QUANTITY":{"ANY_VALUE":2},"TRANSPORT_TYPE":{"TRAIN":2}}"#);

        let back: Properties = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }
}
