//! Built-in catalog of diseases and measurements.
//!
//! The gateway can also list diseases (`GET /diseases`); the built-in list is
//! the fallback used when the backend is not asked or is unreachable.

use serde::{Deserialize, Serialize};

/// Glucose [Mass/volume] in Serum or Plasma.
pub const GLUCOSE_ID: i64 = 3004501;

/// Hemoglobin [Mass/volume] in Blood.
pub const HEMOGLOBIN_ID: i64 = 3000963;

/// Default disease key.
pub const DEFAULT_DISEASE: &str = "diabetes";

/// A disease definition that can be selected for comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disease {
    pub key: String,
    pub label: String,
}

/// A clinical measurement whose values form the outcome distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub id: i64,
    pub label: &'static str,
}

/// Measurements offered by the picker, in display order.
pub const MEASUREMENTS: [Measurement; 2] = [
    Measurement {
        id: GLUCOSE_ID,
        label: "Glucose [Mass/volume] in Serum or Plasma",
    },
    Measurement {
        id: HEMOGLOBIN_ID,
        label: "Hemoglobin [Mass/volume] in Blood",
    },
];

/// Diseases known without asking the backend.
pub fn builtin_diseases() -> Vec<Disease> {
    vec![Disease {
        key: DEFAULT_DISEASE.to_string(),
        label: "Diabetes".to_string(),
    }]
}

/// Look up a catalog measurement.
pub fn measurement(id: i64) -> Option<&'static Measurement> {
    MEASUREMENTS.iter().find(|m| m.id == id)
}

/// Display label for a measurement id, used as the box plot's y-axis title.
pub fn measurement_label(id: i64) -> String {
    measurement(id)
        .map(|m| m.label.to_string())
        .unwrap_or_else(|| format!("Measurement {}", id))
}

/// The measurement after `id` in the picker, wrapping around.
///
/// Unknown ids start over at the first entry.
pub fn next_measurement(id: i64) -> i64 {
    match MEASUREMENTS.iter().position(|m| m.id == id) {
        Some(i) => MEASUREMENTS[(i + 1) % MEASUREMENTS.len()].id,
        None => MEASUREMENTS[0].id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_label_known_and_unknown() {
        assert_eq!(
            measurement_label(GLUCOSE_ID),
            "Glucose [Mass/volume] in Serum or Plasma"
        );
        assert_eq!(measurement_label(42), "Measurement 42");
    }

    #[test]
    fn test_next_measurement_wraps() {
        assert_eq!(next_measurement(GLUCOSE_ID), HEMOGLOBIN_ID);
        assert_eq!(next_measurement(HEMOGLOBIN_ID), GLUCOSE_ID);
        assert_eq!(next_measurement(1), GLUCOSE_ID);
    }

    #[test]
    fn test_builtin_diseases() {
        let diseases = builtin_diseases();
        assert_eq!(diseases.len(), 1);
        assert_eq!(diseases[0].key, "diabetes");
    }
}
