//! Network points.

use chrono::{DateTime, FixedOffset};

use super::{DomainError, PointId, Timestamp};

/// A timezone-aware location where runs stop.
///
/// Points are immutable and referenced by [`PointId`] everywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    id: PointId,
    name: String,
    offset: FixedOffset,
}

impl Point {
    /// Create a point with the given UTC offset in seconds (east positive).
    pub fn new(id: PointId, name: impl Into<String>, utc_offset_secs: i32) -> Result<Self, DomainError> {
        let offset = FixedOffset::east_opt(utc_offset_secs)
            .ok_or(DomainError::InvalidUtcOffset(utc_offset_secs))?;
        Ok(Self {
            id,
            name: name.into(),
            offset,
        })
    }

    pub fn id(&self) -> &PointId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Converts a schedule instant to this point's local time.
    pub fn local_time(&self, instant: Timestamp) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike, Utc};

    #[test]
    fn local_time_applies_offset() {
        let point = Point::new(PointId::new("MOW").unwrap(), "Moscow", 3 * 3600).unwrap();
        let t = Utc.with_ymd_and_hms(2017, 1, 1, 22, 30, 0).unwrap();
        let local = point.local_time(t);
        assert_eq!(local.hour(), 1);
        assert_eq!(local.minute(), 30);
        assert_eq!(point.name(), "Moscow");
    }

    #[test]
    fn reject_out_of_range_offset() {
        let result = Point::new(PointId::new("X").unwrap(), "X", 100_000);
        assert_eq!(result.unwrap_err(), DomainError::InvalidUtcOffset(100_000));
    }
}
