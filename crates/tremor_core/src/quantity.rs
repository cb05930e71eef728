use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A measured value with optional symmetric or bounded uncertainty,
/// after the QuakeML real-quantity shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RealQuantity {
    pub value: f64,
    pub uncertainty: Option<f64>,
    pub lower_uncertainty: Option<f64>,
    pub upper_uncertainty: Option<f64>,
    pub confidence_level: Option<f64>,
}

impl RealQuantity {
    pub fn from_value(value: f64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }
}

impl From<f64> for RealQuantity {
    fn from(value: f64) -> Self {
        Self::from_value(value)
    }
}

/// A point in time with optional uncertainty, after the QuakeML
/// time-quantity shape. Times are always UTC.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeQuantity {
    pub value: DateTime<Utc>,
    pub uncertainty: Option<f64>,
    pub lower_uncertainty: Option<f64>,
    pub upper_uncertainty: Option<f64>,
    pub confidence_level: Option<f64>,
}

impl TimeQuantity {
    pub fn from_value(value: DateTime<Utc>) -> Self {
        Self {
            value,
            uncertainty: None,
            lower_uncertainty: None,
            upper_uncertainty: None,
            confidence_level: None,
        }
    }
}

impl From<DateTime<Utc>> for TimeQuantity {
    fn from(value: DateTime<Utc>) -> Self {
        Self::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{RealQuantity, TimeQuantity};
    use chrono::{TimeZone, Utc};

    #[test]
    fn from_value_leaves_uncertainties_unset() {
        let q = RealQuantity::from_value(4.2);
        assert_eq!(q.value, 4.2);
        assert!(q.uncertainty.is_none());
        assert!(q.confidence_level.is_none());

        let t = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let tq = TimeQuantity::from_value(t);
        assert_eq!(tq.value, t);
        assert!(tq.uncertainty.is_none());
    }

    #[test]
    fn equality_is_structural() {
        let a = RealQuantity {
            value: 1.0,
            uncertainty: Some(0.1),
            ..RealQuantity::default()
        };
        let b = RealQuantity {
            value: 1.0,
            uncertainty: Some(0.1),
            ..RealQuantity::default()
        };
        assert_eq!(a, b);
        let c = RealQuantity::from_value(1.0);
        assert_ne!(a, c);
    }
}
