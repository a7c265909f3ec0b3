//! Route queries and result presentation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{InstantInterval, PointId};

/// Order in which paths are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Number of run changes.
    Transfers,
    /// Total travel time.
    Duration,
    /// Departure instant.
    #[default]
    Departure,
    /// Arrival instant.
    Arrival,
}

/// Error returned when parsing an unknown sort order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order: {0}")]
pub struct UnknownSortOrder(String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "transfers" => Ok(SortOrder::Transfers),
            "duration" | "time" => Ok(SortOrder::Duration),
            "departure" => Ok(SortOrder::Departure),
            "arrival" => Ok(SortOrder::Arrival),
            _ => Err(UnknownSortOrder(s.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortOrder::Transfers => "transfers",
            SortOrder::Duration => "duration",
            SortOrder::Departure => "departure",
            SortOrder::Arrival => "arrival",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// How many results to return and in which order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultPresentation {
    pub sort_order: SortOrder,
    pub sort_direction: SortDirection,
    /// Requested result count. Negative counts are rejected.
    pub number_of_results: i64,
}

impl Default for ResultPresentation {
    fn default() -> Self {
        Self {
            sort_order: SortOrder::Departure,
            sort_direction: SortDirection::Asc,
            number_of_results: 10,
        }
    }
}

impl ResultPresentation {
    pub fn new(sort_order: SortOrder, sort_direction: SortDirection, number_of_results: i64) -> Self {
        Self {
            sort_order,
            sort_direction,
            number_of_results,
        }
    }
}

/// A point and the window in which to leave or reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTimeInterval {
    pub point: PointId,
    #[serde(default)]
    pub interval: InstantInterval,
}

impl PointTimeInterval {
    pub fn new(point: PointId, interval: InstantInterval) -> Self {
        Self { point, interval }
    }
}

/// A journey query, generic over the caller's filter type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteQuery<F> {
    pub departure: PointTimeInterval,
    pub arrival: PointTimeInterval,
    pub filter: F,
    #[serde(default)]
    pub presentation: ResultPresentation,
    /// Client request id; requests sharing a non-zero id page through the
    /// same search.
    #[serde(default)]
    pub request_id: u64,
}

impl<F> RouteQuery<F> {
    pub fn new(departure: PointTimeInterval, arrival: PointTimeInterval, filter: F) -> Self {
        Self {
            departure,
            arrival,
            filter,
            presentation: ResultPresentation::default(),
            request_id: 0,
        }
    }

    pub fn with_presentation(mut self, presentation: ResultPresentation) -> Self {
        self.presentation = presentation;
        self
    }

    pub fn with_request_id(mut self, request_id: u64) -> Self {
        self.request_id = request_id;
        self
    }
}

/// Rejected query shapes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Negative result count
    #[error("number of results can not be less than 0, got {0}")]
    NegativeResultCount(i64),

    /// Result count above the configured maximum
    #[error("current max number of results = {max}, so {requested} > {max}")]
    TooManyResults { requested: i64, max: usize },

    /// A whitelist marking values outside the parent values it also marks
    #[error("filter marks dependent values whose parent values are not marked")]
    InconsistentFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_presentation() {
        let presentation = ResultPresentation::default();
        assert_eq!(presentation.sort_order, SortOrder::Departure);
        assert_eq!(presentation.sort_direction, SortDirection::Asc);
        assert_eq!(presentation.number_of_results, 10);
    }

    #[test]
    fn parse_sort_order() {
        assert_eq!("transfers".parse::<SortOrder>().unwrap(), SortOrder::Transfers);
        assert_eq!("TIME".parse::<SortOrder>().unwrap(), SortOrder::Duration);
        assert_eq!("arrival".parse::<SortOrder>().unwrap(), SortOrder::Arrival);
        assert!("price".parse::<SortOrder>().is_err());

        for order in [
            SortOrder::Transfers,
            SortOrder::Duration,
            SortOrder::Departure,
            SortOrder::Arrival,
        ] {
            assert_eq!(order.to_string().parse::<SortOrder>().unwrap(), order);
        }
    }

    #[test]
    fn error_display() {
        assert_eq!(
            QueryError::NegativeResultCount(-1).to_string(),
            "number of results can not be less than 0, got -1"
        );
        assert_eq!(
            QueryError::TooManyResults {
                requested: 600,
                max: 500
            }
            .to_string(),
            "current max number of results = 500, so 600 > 500"
        );
    }

    #[test]
    fn deserialize_query() {
        let json = r#"{
            "departure": {"point": "MOW", "interval": {"since": "2017-01-01T00:00:00Z"}},
            "arrival": {"point": "SPB"},
            "filter": 3,
            "presentation": {"sort_order": "duration", "number_of_results": 5}
        }"#;
        let query: RouteQuery<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(query.departure.point.as_str(), "MOW");
        assert!(query.departure.interval.since.is_some());
        assert_eq!(query.arrival.interval.since, None);
        assert_eq!(query.filter, 3);
        assert_eq!(query.presentation.sort_order, SortOrder::Duration);
        assert_eq!(query.presentation.sort_direction, SortDirection::Asc);
        assert_eq!(query.presentation.number_of_results, 5);
        assert_eq!(query.request_id, 0);
    }
}
