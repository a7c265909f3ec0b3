//! Registering runs in schedule pages.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{Run, StopLight, Timestamp};
use crate::store::Repository;

use super::{SchedulePage, SchedulePageId};

#[derive(Default)]
struct PendingPage {
    arrivals: Vec<(Timestamp, StopLight)>,
    departures: Vec<(Timestamp, StopLight)>,
}

/// Stores `runs` and indexes their waypoints in schedule pages.
///
/// Every waypoint except pass-through null stops is indexed: its departure
/// (unless it is the last waypoint) in the page of the departure's UTC day,
/// its arrival (unless it is the first) in the page of the arrival's UTC
/// day. Pages are created on demand. Returns the number of pages touched.
pub fn index_runs<R: Repository + ?Sized>(repository: &R, runs: impl IntoIterator<Item = Run>) -> usize {
    let mut pending: HashMap<SchedulePageId, PendingPage> = HashMap::new();
    let mut run_count = 0;

    for run in runs {
        let last = run.last_offset();
        for (i, waypoint) in run.waypoints().iter().enumerate() {
            if i != 0 && i != last && waypoint.is_null_stop() {
                continue;
            }
            let light = StopLight::new(i, run.id().clone());
            if i != last {
                pending
                    .entry(SchedulePageId::new(waypoint.point.clone(), waypoint.departure))
                    .or_default()
                    .departures
                    .push((waypoint.departure, light.clone()));
            }
            if i != 0 {
                pending
                    .entry(SchedulePageId::new(waypoint.point.clone(), waypoint.arrival))
                    .or_default()
                    .arrivals
                    .push((waypoint.arrival, light));
            }
        }
        repository.save_run(run);
        run_count += 1;
    }

    let page_count = pending.len();
    for (id, entries) in pending {
        let mut page = repository
            .schedule_page(&id)
            .map(|page| SchedulePage::clone(&page))
            .unwrap_or_else(|| SchedulePage::new(id.clone()));
        for (instant, light) in entries.departures {
            page.departures.insert(instant, light);
        }
        for (instant, light) in entries.arrivals {
            page.arrivals.insert(instant, light);
        }
        repository.save_schedule_page(page);
    }

    debug!(runs = run_count, pages = page_count, "Indexed runs");
    page_count
}
