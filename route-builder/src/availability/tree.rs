//! Availability trees: a profile laid out along the dependency hierarchy.

use std::collections::{BTreeMap, BTreeSet};

use super::{AttributeValue, Category, DependencyGraph, Properties};

/// A node `category = value` with its raw count and, per dependent
/// category, one child per value present in the profile.
///
/// Used to derive which attribute values a search result can actually
/// offer, so they can be echoed back to the caller as filter choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityTree {
    category: Category,
    value: AttributeValue,
    quantity: u32,
    children: BTreeMap<Category, Vec<AvailabilityTree>>,
}

impl AvailabilityTree {
    /// Builds the tree rooted at the total quantity.
    pub fn new(properties: &Properties, dependencies: &DependencyGraph) -> Self {
        let mut path = BTreeSet::new();
        Self::build(
            Category::Quantity,
            AttributeValue::ANY,
            properties,
            dependencies,
            &mut path,
        )
    }

    fn build(
        category: Category,
        value: AttributeValue,
        properties: &Properties,
        dependencies: &DependencyGraph,
        path: &mut BTreeSet<Category>,
    ) -> Self {
        path.insert(category);
        let mut children = BTreeMap::new();
        for link in dependencies.links(category, &value) {
            if path.contains(&link.dependent) {
                continue;
            }
            let nodes: Vec<_> = properties
                .values(link.dependent)
                .into_iter()
                .flat_map(|values| values.keys())
                .map(|child| Self::build(link.dependent, child.clone(), properties, dependencies, path))
                .collect();
            children.insert(link.dependent, nodes);
        }
        path.remove(&category);

        Self {
            quantity: properties.count(category, &value),
            category,
            value,
            children,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn children(&self, category: Category) -> &[AvailabilityTree] {
        self.children.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drops every subtree whose count is below `required`, and every
    /// dependent category left without children.
    pub fn prune(&mut self, required: u32) {
        for nodes in self.children.values_mut() {
            nodes.retain(|node| node.quantity >= required);
            for node in nodes.iter_mut() {
                node.prune(required);
            }
        }
        self.children.retain(|_, nodes| !nodes.is_empty());
    }

    /// Every value present below this node, grouped by category.
    pub fn property_values(&self) -> BTreeMap<Category, BTreeSet<AttributeValue>> {
        let mut values = BTreeMap::new();
        self.collect_values(&mut values);
        values
    }

    fn collect_values(&self, into: &mut BTreeMap<Category, BTreeSet<AttributeValue>>) {
        for (category, nodes) in &self.children {
            for node in nodes {
                into.entry(*category)
                    .or_insert_with(BTreeSet::new)
                    .insert(node.value.clone());
                node.collect_values(into);
            }
        }
    }
}
