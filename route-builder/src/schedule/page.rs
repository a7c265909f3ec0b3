//! Per-point, per-day schedule pages.

use crate::domain::{PointId, StopLight, Timestamp, day_start};

use super::Timeline;

/// Identity of a schedule page: a point and a UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchedulePageId {
    point: PointId,
    day: Timestamp,
}

impl SchedulePageId {
    /// The page of `point` for the UTC day containing `instant`.
    pub fn new(point: PointId, instant: Timestamp) -> Self {
        Self {
            point,
            day: day_start(instant),
        }
    }

    pub fn point(&self) -> &PointId {
        &self.point
    }

    /// Start of the page's UTC day.
    pub fn day(&self) -> Timestamp {
        self.day
    }
}

/// Runs arriving at and departing from one point during one UTC day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePage {
    id: SchedulePageId,
    pub arrivals: Timeline<StopLight>,
    pub departures: Timeline<StopLight>,
}

impl SchedulePage {
    pub fn new(id: SchedulePageId) -> Self {
        Self {
            id,
            arrivals: Timeline::new(),
            departures: Timeline::new(),
        }
    }

    pub fn id(&self) -> &SchedulePageId {
        &self.id
    }
}
