//! Attribute categories and values for seat availability.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A kind of attribute that availability is counted by.
///
/// Categories form a hierarchy through the dependency graph: quantity
/// depends on transport type, transport type on carriage type, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Total seats, keyed by [`AttributeValue::ANY`]
    Quantity,
    TransportType,
    TrainCarrier,
    TrainNumber,
    TrainBrand,
    CarriageType,
    LocalTrainCarrier,
    LocalTrainNumber,
    CoupeBerth,
    CoupeWcProximity,
    OpenPlanSide,
    OpenPlanBerth,
    OpenPlanWcProximity,
    LocalSeatSide,
}

/// A value within a category, e.g. a carrier name or `COUPE`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeValue(Cow<'static, str>);

impl AttributeValue {
    /// Wildcard value: the single key of [`Category::Quantity`] and the
    /// dependency-graph key matching every value of a category.
    pub const ANY: AttributeValue = AttributeValue(Cow::Borrowed("ANY_VALUE"));

    pub fn new(value: impl Into<String>) -> Self {
        AttributeValue(Cow::Owned(value.into()))
    }

    pub const fn from_static(value: &'static str) -> Self {
        AttributeValue(Cow::Borrowed(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! attribute_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl From<$name> for AttributeValue {
            fn from(value: $name) -> Self {
                AttributeValue::from_static(value.as_str())
            }
        }
    };
}

attribute_enum!(
    /// Values of [`Category::TransportType`].
    TransportType {
        Train => "TRAIN",
        LocalTrain => "LOCAL_TRAIN",
    }
);

attribute_enum!(
    /// Values of [`Category::CarriageType`].
    CarriageType {
        Coupe => "COUPE",
        OpenPlan => "OPEN_PLAN",
        Local => "LOCAL",
    }
);

attribute_enum!(
    /// Values of the berth categories.
    Berth {
        Upper => "UPPER",
        Lower => "LOWER",
    }
);

attribute_enum!(
    /// Values of the seat side categories.
    Side {
        Main => "MAIN",
        Side => "SIDE",
    }
);

attribute_enum!(
    /// Values of the WC proximity categories.
    WcProximity {
        Near => "NEAR",
        Far => "FAR",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_values_convert() {
        assert_eq!(AttributeValue::from(TransportType::Train).as_str(), "TRAIN");
        assert_eq!(AttributeValue::from(CarriageType::OpenPlan).as_str(), "OPEN_PLAN");
        assert_eq!(AttributeValue::from(Berth::Upper), AttributeValue::new("UPPER"));
    }

    #[test]
    fn any_value() {
        assert_eq!(AttributeValue::ANY.as_str(), "ANY_VALUE");
        assert_eq!(AttributeValue::ANY, AttributeValue::new("ANY_VALUE"));
    }

    #[test]
    fn serde_names() {
        let json = serde_json::to_string(&Category::CoupeWcProximity).unwrap();
        assert_eq!(json, "\"COUPE_WC_PROXIMITY\"");

        let value: AttributeValue = serde_json::from_str("\"RZD\"").unwrap();
        assert_eq!(value.as_str(), "RZD");
    }
}
