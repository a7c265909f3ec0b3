//! Runs and their waypoints.

use crate::availability::{Properties, RangeAggregator};

use super::{DomainError, PointId, RunId, Timestamp};

/// A run's visit to a point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waypoint {
    pub point: PointId,
    pub arrival: Timestamp,
    pub departure: Timestamp,
}

impl Waypoint {
    pub fn new(point: PointId, arrival: Timestamp, departure: Timestamp) -> Self {
        Self {
            point,
            arrival,
            departure,
        }
    }

    /// A pass-through visit: no boarding or alighting happens here unless
    /// it is the first or last waypoint of its run.
    pub fn is_null_stop(&self) -> bool {
        self.arrival == self.departure
    }
}

/// One scheduled trip of a vehicle through an ordered list of waypoints.
///
/// Availability is stored per inter-waypoint segment: profile `i` describes
/// travel from waypoint `i` to waypoint `i + 1`. A run without recorded
/// availability answers every range query with the empty profile.
#[derive(Debug, Clone)]
pub struct Run {
    id: RunId,
    name: String,
    waypoints: Vec<Waypoint>,
    availability: RangeAggregator<Properties>,
}

impl Run {
    /// Create a validated run.
    ///
    /// Requires at least two waypoints, `arrival <= departure` at every
    /// waypoint, non-decreasing times between consecutive waypoints, and
    /// either no availability or exactly one profile per segment.
    pub fn new(
        id: RunId,
        name: impl Into<String>,
        waypoints: Vec<Waypoint>,
        availability: Vec<Properties>,
    ) -> Result<Self, DomainError> {
        if waypoints.len() < 2 {
            return Err(DomainError::InvalidRun("run needs at least two waypoints"));
        }
        if waypoints.iter().any(|w| w.arrival > w.departure) {
            return Err(DomainError::InvalidRun("arrival after departure"));
        }
        if waypoints.windows(2).any(|w| w[0].departure > w[1].arrival) {
            return Err(DomainError::InvalidRun("waypoint times go backwards"));
        }
        if !availability.is_empty() && availability.len() != waypoints.len() - 1 {
            return Err(DomainError::InvalidRun(
                "availability must have one profile per segment",
            ));
        }

        Ok(Self {
            id,
            name: name.into(),
            waypoints,
            availability: RangeAggregator::new(availability, Properties::default(), Properties::min),
        })
    }

    pub fn id(&self) -> &RunId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Offset of the last waypoint.
    pub fn last_offset(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// Intersection of the segment profiles for travel from waypoint `from`
    /// to waypoint `to`.
    pub fn availability(&self, from: usize, to: usize) -> Properties {
        self.availability.select(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::Category;
    use chrono::{TimeZone, Utc};

    fn at(h: u32, m: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2017, 1, 1, h, m, 0).unwrap()
    }

    fn point(s: &str) -> PointId {
        PointId::new(s).unwrap()
    }

    fn seats(n: u32) -> Properties {
        Properties::new().with(Category::Quantity, crate::availability::AttributeValue::ANY, n)
    }

    #[test]
    fn valid_run() {
        let run = Run::new(
            RunId::new("R1").unwrap(),
            "001A",
            vec![
                Waypoint::new(point("A"), at(10, 0), at(10, 0)),
                Waypoint::new(point("B"), at(11, 0), at(11, 5)),
                Waypoint::new(point("C"), at(12, 0), at(12, 0)),
            ],
            vec![seats(5), seats(3)],
        )
        .unwrap();

        assert_eq!(run.last_offset(), 2);
        assert_eq!(run.availability(0, 2), seats(3));
        assert_eq!(run.availability(0, 1), seats(5));
        assert!(run.availability(2, 2).is_empty());
    }

    #[test]
    fn reject_malformed_runs() {
        let id = RunId::new("R1").unwrap();
        let single = vec![Waypoint::new(point("A"), at(10, 0), at(10, 0))];
        assert!(Run::new(id.clone(), "", single, vec![]).is_err());

        let backwards = vec![
            Waypoint::new(point("A"), at(10, 0), at(10, 30)),
            Waypoint::new(point("B"), at(10, 15), at(10, 15)),
        ];
        assert_eq!(
            Run::new(id.clone(), "", backwards, vec![]).unwrap_err(),
            DomainError::InvalidRun("waypoint times go backwards")
        );

        let inverted = vec![
            Waypoint::new(point("A"), at(10, 0), at(10, 0)),
            Waypoint::new(point("B"), at(11, 0), at(10, 50)),
        ];
        assert!(Run::new(id.clone(), "", inverted, vec![]).is_err());

        let ok = vec![
            Waypoint::new(point("A"), at(10, 0), at(10, 0)),
            Waypoint::new(point("B"), at(11, 0), at(11, 0)),
        ];
        assert!(Run::new(id, "", ok, vec![seats(1), seats(1)]).is_err());
    }

    #[test]
    fn null_stop() {
        assert!(Waypoint::new(point("A"), at(10, 0), at(10, 0)).is_null_stop());
        assert!(!Waypoint::new(point("A"), at(10, 0), at(10, 1)).is_null_stop());
    }
}
