//! Lookup of points, runs and schedule pages.
//!
//! The search reads the network through the [`Repository`] trait, so it can
//! be backed by anything from an in-memory map to a database. Lookups return
//! `None` on a miss; a miss is never an error at this layer.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::{Point, PointId, Run, RunId};
use crate::schedule::{SchedulePage, SchedulePageId};

/// Key-by-identifier store for the network.
///
/// Implementations must be safe to read from several searches at once.
pub trait Repository: Send + Sync {
    fn point(&self, id: &PointId) -> Option<Arc<Point>>;

    fn run(&self, id: &RunId) -> Option<Arc<Run>>;

    fn schedule_page(&self, id: &SchedulePageId) -> Option<Arc<SchedulePage>>;

    /// Creates or replaces a point.
    fn save_point(&self, point: Point);

    /// Creates or replaces a run.
    fn save_run(&self, run: Run);

    /// Creates or replaces a schedule page.
    fn save_schedule_page(&self, page: SchedulePage);
}

/// A [`Repository`] holding everything in memory.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    points: RwLock<HashMap<PointId, Arc<Point>>>,
    runs: RwLock<HashMap<RunId, Arc<Run>>>,
    pages: RwLock<HashMap<SchedulePageId, Arc<SchedulePage>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_count(&self) -> usize {
        read(&self.runs).len()
    }

    pub fn page_count(&self) -> usize {
        read(&self.pages).len()
    }
}

fn read<K, V>(lock: &RwLock<HashMap<K, V>>) -> std::sync::RwLockReadGuard<'_, HashMap<K, V>> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<K, V>(lock: &RwLock<HashMap<K, V>>) -> std::sync::RwLockWriteGuard<'_, HashMap<K, V>> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl Repository for InMemoryRepository {
    fn point(&self, id: &PointId) -> Option<Arc<Point>> {
        read(&self.points).get(id).cloned()
    }

    fn run(&self, id: &RunId) -> Option<Arc<Run>> {
        read(&self.runs).get(id).cloned()
    }

    fn schedule_page(&self, id: &SchedulePageId) -> Option<Arc<SchedulePage>> {
        read(&self.pages).get(id).cloned()
    }

    fn save_point(&self, point: Point) {
        write(&self.points).insert(point.id().clone(), Arc::new(point));
    }

    fn save_run(&self, run: Run) {
        write(&self.runs).insert(run.id().clone(), Arc::new(run));
    }

    fn save_schedule_page(&self, page: SchedulePage) {
        write(&self.pages).insert(page.id().clone(), Arc::new(page));
    }
}
