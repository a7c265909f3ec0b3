//! Search vertices.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::{PointId, RunId, Timestamp};

/// A run at a waypoint offset, as stored in schedule timelines.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StopLight {
    pub offset: usize,
    pub run: RunId,
}

impl StopLight {
    pub fn new(offset: usize, run: RunId) -> Self {
        Self { offset, run }
    }
}

/// A resolved occurrence of a run at a waypoint: the search vertex.
///
/// Identity is `(run, offset)`. The point and instant are denormalized from
/// the run for convenience and do not take part in equality or hashing.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use route_builder::domain::{PointId, RunId, Stop};
///
/// let run = RunId::new("R1").unwrap();
/// let a = Stop::new(2, run.clone(), PointId::new("A").unwrap(), Utc.timestamp_opt(0, 0).unwrap());
/// let b = Stop::new(2, run, PointId::new("B").unwrap(), Utc.timestamp_opt(60, 0).unwrap());
/// assert_eq!(a, b);
/// ```
#[derive(Clone)]
pub struct Stop {
    pub offset: usize,
    pub run: RunId,
    pub point: PointId,
    pub time: Timestamp,
}

impl Stop {
    pub fn new(offset: usize, run: RunId, point: PointId, time: Timestamp) -> Self {
        Self {
            offset,
            run,
            point,
            time,
        }
    }

    /// Builds a stop from a timeline entry found at `point`.
    pub fn from_light(light: &StopLight, point: PointId, time: Timestamp) -> Self {
        Self::new(light.offset, light.run.clone(), point, time)
    }
}

impl PartialEq for Stop {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.run == other.run
    }
}

impl Eq for Stop {}

impl Hash for Stop {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.run.hash(state);
        self.offset.hash(state);
    }
}

impl fmt::Debug for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stop({}#{} at {} {})",
            self.run,
            self.offset,
            self.point,
            self.time.format("%Y-%m-%d %H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    #[test]
    fn identity_ignores_point_and_time() {
        let run = RunId::new("R1").unwrap();
        let t0 = Utc.with_ymd_and_hms(2017, 1, 1, 10, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2017, 1, 1, 11, 0, 0).unwrap();
        let a = Stop::new(1, run.clone(), PointId::new("A").unwrap(), t0);
        let b = Stop::new(1, run.clone(), PointId::new("B").unwrap(), t1);
        let c = Stop::new(2, run, PointId::new("A").unwrap(), t0);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Stop> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn debug_format() {
        let stop = Stop::new(
            3,
            RunId::new("R7").unwrap(),
            PointId::new("SPB").unwrap(),
            Utc.with_ymd_and_hms(2017, 1, 1, 9, 5, 0).unwrap(),
        );
        assert_eq!(format!("{:?}", stop), "Stop(R7#3 at SPB 2017-01-01 09:05)");
    }
}
