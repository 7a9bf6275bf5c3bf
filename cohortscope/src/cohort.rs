//! Cohort data model.
//!
//! Typed shapes for everything the gateway returns and the pipeline derives:
//! cohort counts, sparse age/sex count rows, raw and sanitized outcome rows,
//! and the user [`Selection`] that drives a fetch cycle.
//!
//! Rows are validated against these types at the gateway boundary, so the
//! rest of the crate never sees untyped JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two mutually exclusive patient groups being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cohort {
    /// Patients with the selected disease.
    #[serde(rename = "Disease")]
    Disease,
    /// Everyone else.
    #[serde(rename = "Non-Disease")]
    NonDisease,
}

impl Cohort {
    /// Both cohorts in display order.
    pub const ALL: [Cohort; 2] = [Cohort::Disease, Cohort::NonDisease];

    /// Wire label, as sent by the gateway.
    pub fn as_str(&self) -> &'static str {
        match self {
            Cohort::Disease => "Disease",
            Cohort::NonDisease => "Non-Disease",
        }
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patient sex as reported in age/sex rows.
///
/// The gateway may also emit `"Other"`; such rows do not belong to any of the
/// four charted series and are rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age bucket on the x-axis of the age/sex chart.
///
/// Labels use an en dash (`–`), matching the gateway exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "<20")]
    Under20,
    #[serde(rename = "20–40")]
    From20To40,
    #[serde(rename = "40–60")]
    From40To60,
    #[serde(rename = "60+")]
    Over60,
}

impl AgeGroup {
    /// The fixed, ordered x-axis.
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Under20,
        AgeGroup::From20To40,
        AgeGroup::From40To60,
        AgeGroup::Over60,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Under20 => "<20",
            AgeGroup::From20To40 => "20–40",
            AgeGroup::From40To60 => "40–60",
            AgeGroup::Over60 => "60+",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregate patient counts for the selected disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortCounts {
    /// Patients in the Disease cohort.
    pub case_count: u64,
    /// Patients in the Non-Disease cohort.
    pub control_count: u64,
    /// Total population, when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_people: Option<u64>,
}

/// One cell of the sparse age/sex count table.
///
/// Absence of a (cohort, sex, age group) triple means a count of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeSexRow {
    pub cohort: Cohort,
    pub sex: Sex,
    pub age_group: AgeGroup,
    pub count: u64,
}

/// A raw outcome value as it arrives on the wire.
///
/// Values are numeric-like but not guaranteed numeric: the backend may send
/// numbers or numeric strings. Coercion happens in [`crate::sanitize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawMeasurement {
    Number(f64),
    Text(String),
}

impl From<f64> for RawMeasurement {
    fn from(value: f64) -> Self {
        RawMeasurement::Number(value)
    }
}

impl From<&str> for RawMeasurement {
    fn from(value: &str) -> Self {
        RawMeasurement::Text(value.to_string())
    }
}

/// An unsanitized outcome row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRow {
    pub cohort: Cohort,
    #[serde(default)]
    pub value: Option<RawMeasurement>,
}

impl OutcomeRow {
    pub fn new(cohort: Cohort, value: Option<RawMeasurement>) -> Self {
        Self { cohort, value }
    }
}

/// A sanitized outcome value. `value` is always finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeValue {
    pub cohort: Cohort,
    pub value: f64,
}

/// The user's current choice of disease and measurement.
///
/// Every change invalidates all derived state and starts a new fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    pub disease_key: String,
    pub measurement_id: i64,
}

impl Selection {
    pub fn new(disease_key: impl Into<String>, measurement_id: i64) -> Self {
        Self {
            disease_key: disease_key.into(),
            measurement_id,
        }
    }

    /// Same disease, different measurement.
    pub fn with_measurement(&self, measurement_id: i64) -> Self {
        Self {
            disease_key: self.disease_key.clone(),
            measurement_id,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.disease_key, self.measurement_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cohort_wire_labels() {
        let c: Cohort = serde_json::from_str("\"Non-Disease\"").unwrap();
        assert_eq!(c, Cohort::NonDisease);
        assert_eq!(serde_json::to_string(&Cohort::Disease).unwrap(), "\"Disease\"");
    }

    #[test]
    fn test_age_group_uses_en_dash() {
        let g: AgeGroup = serde_json::from_str("\"20–40\"").unwrap();
        assert_eq!(g, AgeGroup::From20To40);
        assert!(serde_json::from_str::<AgeGroup>("\"20-40\"").is_err());
    }

    #[test]
    fn test_age_groups_are_ordered() {
        let labels: Vec<_> = AgeGroup::ALL.iter().map(|g| g.label()).collect();
        assert_eq!(labels, vec!["<20", "20–40", "40–60", "60+"]);
    }

    #[test]
    fn test_sex_rejects_other() {
        assert!(serde_json::from_str::<Sex>("\"Other\"").is_err());
    }

    #[test]
    fn test_outcome_row_accepts_number_string_and_null() {
        let rows: Vec<OutcomeRow> = serde_json::from_str(
            r#"[
                {"cohort": "Disease", "value": 5.5},
                {"cohort": "Disease", "value": "7.5"},
                {"cohort": "Non-Disease", "value": null},
                {"cohort": "Non-Disease"}
            ]"#,
        )
        .unwrap();

        assert_eq!(rows[0].value, Some(RawMeasurement::Number(5.5)));
        assert_eq!(rows[1].value, Some(RawMeasurement::Text("7.5".to_string())));
        assert_eq!(rows[2].value, None);
        assert_eq!(rows[3].value, None);
    }

    #[test]
    fn test_counts_total_is_optional() {
        let counts: CohortCounts =
            serde_json::from_str(r#"{"case_count": 3, "control_count": 7}"#).unwrap();
        assert_eq!(counts.total_people, None);

        let counts: CohortCounts = serde_json::from_str(
            r#"{"total_people": 10, "case_count": 3, "control_count": 7}"#,
        )
        .unwrap();
        assert_eq!(counts.total_people, Some(10));
    }

    #[test]
    fn test_selection_with_measurement_keeps_disease() {
        let s = Selection::new("diabetes", 3004501);
        let t = s.with_measurement(3000963);
        assert_eq!(t.disease_key, "diabetes");
        assert_eq!(t.measurement_id, 3000963);
        assert_eq!(t.to_string(), "diabetes/3000963");
    }
}
