//! Transfer discovery: the edges leaving a stop.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;
use tracing::trace;

use crate::availability::{AvailabilityFilter, DependencyGraph};
use crate::domain::{ForwardSegment, PointId, Run, Stop, StopLight, Timestamp, day_start};
use crate::schedule::{SchedulePage, SchedulePageId};
use crate::store::Repository;

use super::config::RouteBuilderConfig;
use super::search::SearchError;

/// Produces the forward segments leaving a stop.
///
/// `departures` are the query's departure points (never looped back into);
/// reaching one of `arrivals` ends the scan of the current run.
///
/// This abstraction allows the search to be tested on hand-built graphs.
pub trait Transfers {
    fn successors(
        &self,
        departures: &HashSet<PointId>,
        current: &Stop,
        arrivals: &HashSet<PointId>,
    ) -> Result<Vec<ForwardSegment>, SearchError>;
}

impl<F> Transfers for F
where
    F: Fn(&HashSet<PointId>, &Stop, &HashSet<PointId>) -> Result<Vec<ForwardSegment>, SearchError>,
{
    fn successors(
        &self,
        departures: &HashSet<PointId>,
        current: &Stop,
        arrivals: &HashSet<PointId>,
    ) -> Result<Vec<ForwardSegment>, SearchError> {
        self(departures, current, arrivals)
    }
}

/// Transfer discovery over a repository's runs and schedule pages.
pub struct ScheduleTransfers<R> {
    repository: Arc<R>,
    dependencies: Arc<DependencyGraph>,
    filter: AvailabilityFilter,
    min_transfer: Duration,
    max_transfer: Duration,
}

impl<R: Repository> ScheduleTransfers<R> {
    pub fn new(
        repository: Arc<R>,
        dependencies: Arc<DependencyGraph>,
        filter: AvailabilityFilter,
        config: &RouteBuilderConfig,
    ) -> Self {
        Self {
            repository,
            dependencies,
            filter,
            min_transfer: config.min_transfer(),
            max_transfer: config.max_transfer(),
        }
    }

    fn run(&self, stop: &StopLight) -> Result<Arc<Run>, SearchError> {
        self.repository
            .run(&stop.run)
            .ok_or_else(|| SearchError::MissingRun(stop.run.clone()))
    }

    /// Whether `run` from `offset` onward stops at any of `visited`.
    fn revisits(run: &Run, offset: usize, visited: &HashSet<PointId>) -> bool {
        let last = run.last_offset();
        run.waypoints()
            .iter()
            .enumerate()
            .skip(offset + 1)
            .filter(|(i, w)| *i == last || !w.is_null_stop())
            .any(|(_, w)| visited.contains(&w.point))
    }
}

/// Pages of `point` for every UTC day overlapping `[from, to]`.
pub(crate) fn fetch_pages<R: Repository + ?Sized>(
    repository: &R,
    point: &PointId,
    from: Timestamp,
    to: Timestamp,
) -> Vec<Arc<SchedulePage>> {
    let mut pages = Vec::with_capacity(2);
    let mut day = day_start(from);
    while day <= to {
        if let Some(page) = repository.schedule_page(&SchedulePageId::new(point.clone(), day)) {
            pages.push(page);
        }
        match day.checked_add_signed(Duration::days(1)) {
            Some(next) => day = next,
            None => break,
        }
    }
    pages
}

impl<R: Repository> Transfers for ScheduleTransfers<R> {
    fn successors(
        &self,
        departures: &HashSet<PointId>,
        current: &Stop,
        arrivals: &HashSet<PointId>,
    ) -> Result<Vec<ForwardSegment>, SearchError> {
        let run = self.run(&StopLight::new(current.offset, current.run.clone()))?;
        let last = run.last_offset();
        let mut segments = Vec::new();
        let mut visited = HashSet::new();

        for (i, waypoint) in run.waypoints().iter().enumerate().skip(current.offset + 1) {
            if i != last && waypoint.is_null_stop() {
                continue;
            }
            visited.insert(waypoint.point.clone());

            // never loop back through the departure region
            if departures.contains(&waypoint.point) {
                break;
            }

            let properties = run.availability(current.offset, i);
            let admitted = self.filter.test(&properties, &self.dependencies);
            let alight = Stop::new(i, run.id().clone(), waypoint.point.clone(), waypoint.arrival);

            if arrivals.contains(&waypoint.point) {
                if admitted {
                    segments.push(ForwardSegment::new(
                        current.clone(),
                        alight.clone(),
                        alight,
                        properties,
                    ));
                }
                break;
            }
            if !admitted {
                continue;
            }

            // windows past the end of representable time are cut short
            let Some(from) = waypoint.arrival.checked_add_signed(self.min_transfer) else {
                continue;
            };
            let to = waypoint
                .arrival
                .checked_add_signed(self.max_transfer)
                .unwrap_or(Timestamp::MAX_UTC);
            for page in fetch_pages(self.repository.as_ref(), &waypoint.point, from, to) {
                for (instant, light) in page.departures.sub_map(from, true, to, true) {
                    if light.run == current.run {
                        continue;
                    }
                    let next = self.run(light)?;
                    if Self::revisits(&next, light.offset, &visited) {
                        trace!(run = %light.run, point = %waypoint.point, "Skipping looping transfer");
                        continue;
                    }
                    segments.push(ForwardSegment::new(
                        current.clone(),
                        alight.clone(),
                        Stop::from_light(light, waypoint.point.clone(), instant),
                        properties.clone(),
                    ));
                }
            }
        }

        trace!(stop = ?current, segments = segments.len(), "Discovered successors");
        Ok(segments)
    }
}
