//! Instants and instant intervals.
//!
//! All schedule instants are absolute UTC instants. Points carry their own
//! UTC offset for presentation only; the search never looks at local time.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// An absolute instant on the schedule.
pub type Timestamp = DateTime<Utc>;

/// Returns the start of the UTC day containing `instant`.
///
/// Schedule pages are bucketed by this value.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use route_builder::domain::day_start;
///
/// let t = Utc.with_ymd_and_hms(2017, 1, 1, 23, 59, 0).unwrap();
/// assert_eq!(day_start(t), Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap());
/// ```
pub fn day_start(instant: Timestamp) -> Timestamp {
    instant.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// A possibly open interval of instants.
///
/// A missing bound means "unbounded" until the route builder resolves it
/// against the current time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantInterval {
    /// Inclusive lower bound.
    #[serde(default)]
    pub since: Option<Timestamp>,

    /// Inclusive upper bound.
    #[serde(default)]
    pub till: Option<Timestamp>,
}

impl InstantInterval {
    /// Create an interval with both bounds set.
    pub fn new(since: Timestamp, till: Timestamp) -> Self {
        Self {
            since: Some(since),
            till: Some(till),
        }
    }

    /// An interval with no bounds.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Returns a copy with the lower bound replaced.
    pub fn with_since(self, since: Timestamp) -> Self {
        Self {
            since: Some(since),
            ..self
        }
    }

    /// Returns a copy with the upper bound replaced.
    pub fn with_till(self, till: Timestamp) -> Self {
        Self {
            till: Some(till),
            ..self
        }
    }

    /// Returns both bounds if the interval is fully resolved.
    pub fn bounds(&self) -> Option<(Timestamp, Timestamp)> {
        Some((self.since?, self.till?))
    }

    /// Whether `instant` lies inside the interval (open bounds always match).
    pub fn contains(&self, instant: Timestamp) -> bool {
        self.since.is_none_or(|since| since <= instant)
            && self.till.is_none_or(|till| instant <= till)
    }
}
