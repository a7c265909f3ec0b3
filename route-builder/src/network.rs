//! JSON network fixtures.
//!
//! A fixture lists points and runs:
//!
//! ```json
//! {
//!   "points": [{ "id": "MOW", "name": "Moscow", "utc_offset_secs": 10800 }],
//!   "runs": [{
//!     "id": "001A",
//!     "name": "Sapsan",
//!     "waypoints": [
//!       { "point": "MOW", "arrival": "2017-01-01T10:00:00Z", "departure": "2017-01-01T10:00:00Z" },
//!       { "point": "LED", "arrival": "2017-01-01T14:00:00Z", "departure": "2017-01-01T14:00:00Z" }
//!     ],
//!     "availability": [{ "QUANTITY": { "ANY_VALUE": 12 } }]
//!   }]
//! }
//! ```
//!
//! Availability is optional; when present it holds one profile per segment.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::availability::Properties;
use crate::domain::{DomainError, Point, PointId, Run, RunId, Timestamp, Waypoint};

/// Errors loading a fixture.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Reading the file failed
    #[error("failed to read network file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid fixture
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A point or run failed validation
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointRecord {
    pub id: PointId,
    pub name: String,
    #[serde(default)]
    pub utc_offset_secs: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaypointRecord {
    pub point: PointId,
    pub arrival: Timestamp,
    pub departure: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunRecord {
    pub id: RunId,
    pub name: String,
    pub waypoints: Vec<WaypointRecord>,
    #[serde(default)]
    pub availability: Vec<Properties>,
}

/// A parsed, not yet validated network.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NetworkFile {
    pub points: Vec<PointRecord>,
    pub runs: Vec<RunRecord>,
}

impl NetworkFile {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let network = Self::from_json(&contents)?;
        debug!(path = %path.as_ref().display(), "Loaded network file");
        Ok(network)
    }

    pub fn from_json(json: &str) -> Result<Self, NetworkError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates every record, failing on the first invalid one.
    pub fn into_parts(self) -> Result<(Vec<Point>, Vec<Run>), NetworkError> {
        let points = self
            .points
            .into_iter()
            .map(|p| Point::new(p.id, p.name, p.utc_offset_secs))
            .collect::<Result<Vec<_>, _>>()?;
        let runs = self
            .runs
            .into_iter()
            .map(|r| {
                let waypoints = r
                    .waypoints
                    .into_iter()
                    .map(|w| Waypoint::new(w.point, w.arrival, w.departure))
                    .collect();
                Run::new(r.id, r.name, waypoints, r.availability)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((points, runs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::{AttributeValue, Category};
    use std::io::Write;

    const FIXTURE: &str = r#"{
        "points": [
            { "id": "A", "name": "Alpha", "utc_offset_secs": 10800 },
            { "id": "B", "name": "Bravo" }
        ],
        "runs": [{
            "id": "R1",
            "name": "001A",
            "waypoints": [
                { "point": "A", "arrival": "2017-01-01T10:00:00Z", "departure": "2017-01-01T10:00:00Z" },
                { "point": "B", "arrival": "2017-01-01T11:00:00Z", "departure": "2017-01-01T11:00:00Z" }
            ],
            "availability": [{ "QUANTITY": { "ANY_VALUE": 12 } }]
        }]
    }"#;

    #[test]
    fn parses_fixture() {
        let (points, runs) = NetworkFile::from_json(FIXTURE).unwrap().into_parts().unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].offset().local_minus_utc(), 10800);
        assert_eq!(points[1].offset().local_minus_utc(), 0);

        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert_eq!(run.name(), "001A");
        assert_eq!(run.waypoints().len(), 2);
        assert_eq!(run.availability(0, 1).count(Category::Quantity, &AttributeValue::ANY), 12);
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let network = NetworkFile::from_path(file.path()).unwrap();
        assert_eq!(network.points.len(), 2);
        assert_eq!(network.runs.len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = NetworkFile::from_path(dir.path().join("missing.json"));
        assert!(matches!(result, Err(NetworkError::Io(_))));
    }

    #[test]
    fn invalid_records_are_rejected() {
        assert!(matches!(NetworkFile::from_json("{ not json"), Err(NetworkError::Json(_))));
        assert!(matches!(
            NetworkFile::from_json(r#"{ "points": [{ "id": "", "name": "x" }] }"#),
            Err(NetworkError::Json(_))
        ));

        let one_waypoint = r#"{ "runs": [{ "id": "R", "name": "R", "waypoints": [
            { "point": "A", "arrival": "2017-01-01T10:00:00Z", "departure": "2017-01-01T10:00:00Z" }
        ] }] }"#;
        let network = NetworkFile::from_json(one_waypoint).unwrap();
        assert!(matches!(network.into_parts(), Err(NetworkError::Domain(DomainError::InvalidRun(_)))));
    }
}
