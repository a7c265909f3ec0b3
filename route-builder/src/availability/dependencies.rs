//! Dependencies between attribute categories.
//!
//! A link from `(parent category, parent value)` to a dependent category
//! says how the dependent category's counts roll up into the parent's
//! achievable count. For example, the seats of a `TRAIN` can never exceed
//! the sum of its seats per carriage type.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::{AttributeValue, CarriageType, Category, TransportType};

/// How dependent counts combine into a parent count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rollup {
    /// Counts add up (disjoint sub-populations).
    Sum,
    /// The best single value (alternatives of the same seats); zero if none.
    Max,
}

impl Rollup {
    pub fn apply(self, counts: impl IntoIterator<Item = u32>) -> u32 {
        let mut counts = counts.into_iter();
        match self {
            Rollup::Sum => counts.fold(0u32, |acc, c| acc.saturating_add(c)),
            Rollup::Max => counts.max().unwrap_or(0),
        }
    }
}

/// A link to a dependent category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub dependent: Category,
    pub rollup: Rollup,
}

impl Link {
    pub fn new(dependent: Category, rollup: Rollup) -> Self {
        Self { dependent, rollup }
    }
}

/// Static rules linking categories to their dependents.
///
/// Built once at startup and shared read-only by every query.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    links: HashMap<Category, HashMap<AttributeValue, Vec<Link>>>,
}

impl DependencyGraph {
    /// A graph without links: quantity is read directly from the profile.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The rail hierarchy:
    /// quantity -> transport type -> carrier, number, brand, carriage type
    /// -> seat attributes.
    pub fn rail() -> Self {
        use Category as C;
        use Rollup::{Max, Sum};

        let train = TransportType::Train;
        let local_train = TransportType::LocalTrain;
        Self::empty()
            .link(C::Quantity, AttributeValue::ANY, C::TransportType, Max)
            .link(C::TransportType, train, C::TrainCarrier, Max)
            .link(C::TransportType, train, C::TrainNumber, Max)
            .link(C::TransportType, train, C::CarriageType, Sum)
            .link(C::TransportType, train, C::TrainBrand, Max)
            .link(C::TransportType, local_train, C::LocalTrainCarrier, Max)
            .link(C::TransportType, local_train, C::LocalTrainNumber, Max)
            .link(C::CarriageType, CarriageType::Coupe, C::CoupeBerth, Sum)
            .link(C::CarriageType, CarriageType::Coupe, C::CoupeWcProximity, Sum)
            .link(C::CarriageType, CarriageType::OpenPlan, C::OpenPlanSide, Sum)
            .link(C::CarriageType, CarriageType::OpenPlan, C::OpenPlanBerth, Sum)
            .link(C::CarriageType, CarriageType::OpenPlan, C::OpenPlanWcProximity, Sum)
            .link(C::CarriageType, CarriageType::Local, C::LocalSeatSide, Sum)
    }

    /// Adds a link from `parent = value` to `dependent`.
    ///
    /// Links registered under [`AttributeValue::ANY`] apply to every value
    /// of the parent category and shadow value-specific links.
    pub fn link(
        mut self,
        parent: Category,
        value: impl Into<AttributeValue>,
        dependent: Category,
        rollup: Rollup,
    ) -> Self {
        self.links
            .entry(parent)
            .or_default()
            .entry(value.into())
            .or_default()
            .push(Link::new(dependent, rollup));
        self
    }

    /// Links applying to `category = value`.
    pub fn links(&self, category: Category, value: &AttributeValue) -> &[Link] {
        let Some(by_value) = self.links.get(&category) else {
            return &[];
        };
        by_value
            .get(&AttributeValue::ANY)
            .or_else(|| by_value.get(value))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether a set of marked values respects the hierarchy: every marked
    /// dependent category has its parent category marked, and the specific
    /// parent value when the link is value-specific.
    pub fn check_consistency(&self, marked: &BTreeMap<Category, BTreeSet<AttributeValue>>) -> bool {
        self.links.iter().all(|(parent, by_value)| {
            by_value.iter().all(|(value, links)| {
                links.iter().all(|link| {
                    if !marked.contains_key(&link.dependent) {
                        return true;
                    }
                    match marked.get(parent) {
                        None => false,
                        Some(values) => *value == AttributeValue::ANY || values.contains(value),
                    }
                })
            })
        })
    }

    /// Consistency of a whitelist, where a category without marks admits
    /// every value: a marked dependent conflicts only with a marked parent
    /// category that leaves out the linked value.
    pub fn check_whitelist(&self, marked: &BTreeMap<Category, BTreeSet<AttributeValue>>) -> bool {
        let marks = |category: Category| marked.get(&category).filter(|values| !values.is_empty());
        self.links.iter().all(|(parent, by_value)| {
            by_value.iter().all(|(value, links)| {
                links.iter().all(|link| {
                    marks(link.dependent).is_none()
                        || *value == AttributeValue::ANY
                        || marks(*parent).is_none_or(|values| values.contains(value))
                })
            })
        })
    }
}
