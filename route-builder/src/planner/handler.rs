//! Caller-shaped results.
//!
//! The planner produces raw [`Path`]s; a [`ResponseHandler`] turns them
//! into the caller's offer type and wraps offers in the caller's response,
//! along with the filter the caller should see next.

use serde::Serialize;

use crate::availability::{AvailabilityFilter, AvailabilityTree, DependencyGraph, FilteringMode, Properties};
use crate::domain::Path;

/// What the planner needs to know about a caller's filter.
pub trait RouteFilter: Clone {
    /// Maximum number of run changes the caller accepts.
    fn max_transfers(&self) -> usize;

    /// Seats every offered path must be able to provide.
    fn required_quantity(&self) -> u32;
}

impl RouteFilter for AvailabilityFilter {
    fn max_transfers(&self) -> usize {
        self.max_transfers
    }

    fn required_quantity(&self) -> u32 {
        self.required_quantity
    }
}

/// Maps paths to offers and offers to a response.
pub trait ResponseHandler {
    type Offer;
    type Filter: RouteFilter;
    type Response;

    fn map_path(&self, path: Path) -> Self::Offer;

    /// Whether an offer is returned; rejected offers do not count towards
    /// the requested number of results.
    fn is_valid(&self, _offer: &Self::Offer) -> bool {
        true
    }

    /// Whether the caller left the filter open, so the planner should
    /// derive one from what the search found.
    fn is_empty(&self, filter: &Self::Filter) -> bool;

    /// The availability constraints applied while searching.
    fn availability_filter(&self, filter: &Self::Filter) -> AvailabilityFilter;

    /// A filter describing the choices the found paths offer.
    fn filter_from_properties(
        &self,
        properties: &Properties,
        dependencies: &DependencyGraph,
        max_transfers: usize,
        required_quantity: u32,
    ) -> Self::Filter;

    fn build_response(&self, offers: Vec<Self::Offer>, filter: Self::Filter, request_id: u64) -> Self::Response;

    /// Response for a request that never reached the search.
    fn default_response(&self, offers: Vec<Self::Offer>, request_id: u64) -> Self::Response;
}

/// Planner response carrying paths as offers.
#[derive(Debug, Clone, Serialize)]
pub struct RouteResponse<O, F> {
    pub offers: Vec<O>,
    /// Filter to show the caller; `None` when no search was run.
    pub filter: Option<F>,
    pub request_id: u64,
}

/// Offers raw paths and availability filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHandler;

impl ResponseHandler for DefaultHandler {
    type Offer = Path;
    type Filter = AvailabilityFilter;
    type Response = RouteResponse<Path, AvailabilityFilter>;

    fn map_path(&self, path: Path) -> Path {
        path
    }

    fn is_empty(&self, filter: &AvailabilityFilter) -> bool {
        !filter.has_marks()
    }

    fn availability_filter(&self, filter: &AvailabilityFilter) -> AvailabilityFilter {
        filter.clone()
    }

    /// Whitelists every value available in quantity `required_quantity`.
    fn filter_from_properties(
        &self,
        properties: &Properties,
        dependencies: &DependencyGraph,
        max_transfers: usize,
        required_quantity: u32,
    ) -> AvailabilityFilter {
        let mut tree = AvailabilityTree::new(properties, dependencies);
        tree.prune(required_quantity);
        AvailabilityFilter {
            required_quantity,
            max_transfers,
            marked: tree.property_values(),
            mode: FilteringMode::WhiteList,
        }
    }

    fn build_response(
        &self,
        offers: Vec<Path>,
        filter: AvailabilityFilter,
        request_id: u64,
    ) -> Self::Response {
        RouteResponse {
            offers,
            filter: Some(filter),
            request_id,
        }
    }

    fn default_response(&self, offers: Vec<Path>, request_id: u64) -> Self::Response {
        RouteResponse {
            offers,
            filter: None,
            request_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::{AttributeValue, CarriageType, Category, TransportType};

    fn profile() -> Properties {
        Properties::new()
            .with(Category::Quantity, AttributeValue::ANY, 4)
            .with(Category::TransportType, TransportType::Train, 4)
            .with(Category::CarriageType, CarriageType::Coupe, 3)
            .with(Category::CarriageType, CarriageType::OpenPlan, 1)
    }

    #[test]
    fn open_filter_is_empty() {
        let handler = DefaultHandler;
        assert!(handler.is_empty(&AvailabilityFilter::default()));
        let marked = AvailabilityFilter::default().mark(Category::CarriageType, CarriageType::Coupe);
        assert!(!handler.is_empty(&marked));
    }

    #[test]
    fn derived_filter_lists_available_values() {
        let filter = DefaultHandler.filter_from_properties(&profile(), &DependencyGraph::rail(), 2, 2);

        assert_eq!(filter.mode, FilteringMode::WhiteList);
        assert_eq!(filter.max_transfers, 2);
        assert_eq!(filter.required_quantity, 2);
        let carriages = &filter.marked[&Category::CarriageType];
        assert!(carriages.contains(&AttributeValue::from(CarriageType::Coupe)));
        assert!(!carriages.contains(&AttributeValue::from(CarriageType::OpenPlan)));
    }

    #[test]
    fn responses_echo_request_id() {
        let response = DefaultHandler.build_response(vec![], AvailabilityFilter::default(), 42);
        assert_eq!(response.request_id, 42);
        assert!(response.filter.is_some());

        let response = DefaultHandler.default_response(vec![], 7);
        assert_eq!(response.request_id, 7);
        assert!(response.filter.is_none());
        assert!(response.offers.is_empty());
    }
}
