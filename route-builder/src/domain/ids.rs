//! Identifiers for points and runs.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Error returned when constructing an identifier from an invalid string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier: {reason}")]
pub struct InvalidId {
    reason: &'static str,
}

/// Identifier of a point (station, stop area) in the network.
///
/// Point identifiers are opaque. The only validation is that they must be
/// non-empty. Cloning is cheap, so stops and segments carry them by value.
///
/// # Examples
///
/// ```
/// use route_builder::domain::PointId;
///
/// let id = PointId::new("MOW").unwrap();
/// assert_eq!(id.as_str(), "MOW");
///
/// // Empty strings are rejected
/// assert!(PointId::new("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PointId(Arc<str>);

impl PointId {
    /// Create a new point identifier.
    ///
    /// Returns an error if the string is empty.
    pub fn new(s: impl AsRef<str>) -> Result<Self, InvalidId> {
        let s = s.as_ref();
        if s.is_empty() {
            return Err(InvalidId {
                reason: "point id cannot be empty",
            });
        }
        Ok(PointId(Arc::from(s)))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PointId {
    type Error = InvalidId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        PointId::new(s)
    }
}

impl From<PointId> for String {
    fn from(id: PointId) -> Self {
        id.0.to_string()
    }
}

impl fmt::Debug for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PointId({})", self.0)
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a run (one scheduled trip of a vehicle).
///
/// # Examples
///
/// ```
/// use route_builder::domain::RunId;
///
/// let id = RunId::new("016A-2017-01-01").unwrap();
/// assert_eq!(id.to_string(), "016A-2017-01-01");
/// assert!(RunId::new("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RunId(Arc<str>);

impl RunId {
    /// Create a new run identifier.
    ///
    /// Returns an error if the string is empty.
    pub fn new(s: impl AsRef<str>) -> Result<Self, InvalidId> {
        let s = s.as_ref();
        if s.is_empty() {
            return Err(InvalidId {
                reason: "run id cannot be empty",
            });
        }
        Ok(RunId(Arc::from(s)))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RunId {
    type Error = InvalidId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        RunId::new(s)
    }
}

impl From<RunId> for String {
    fn from(id: RunId) -> Self {
        id.0.to_string()
    }
}

impl fmt::Debug for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RunId({})", self.0)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_empty() {
        assert!(PointId::new("").is_err());
        assert!(RunId::new("").is_err());
    }

    #[test]
    fn display_and_debug() {
        let point = PointId::new("SPB").unwrap();
        assert_eq!(format!("{}", point), "SPB");
        assert_eq!(format!("{:?}", point), "PointId(SPB)");

        let run = RunId::new("R1").unwrap();
        assert_eq!(format!("{}", run), "R1");
        assert_eq!(format!("{:?}", run), "RunId(R1)");
    }

    #[test]
    fn hash_consistent_with_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(RunId::new("R1").unwrap());
        assert!(set.contains(&RunId::new("R1").unwrap()));
        assert!(!set.contains(&RunId::new("R2").unwrap()));
    }

    #[test]
    fn serde_as_plain_string() {
        let id = PointId::new("MOW").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"MOW\"");

        let back: PointId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<RunId>("\"\"").is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any non-empty string can be used as an identifier
        #[test]
        fn nonempty_always_valid(s in ".+") {
            prop_assert!(PointId::new(&s).is_ok());
            prop_assert!(RunId::new(&s).is_ok());
        }

        /// Roundtrip: new then as_str returns the original
        #[test]
        fn roundtrip(s in ".+") {
            let id = RunId::new(&s).unwrap();
            prop_assert_eq!(id.as_str(), s.as_str());
        }
    }
}
