//! Outcome row sanitizer.
//!
//! Turns raw outcome rows into finite, cohort-tagged numbers. Rows with a
//! null value, or a value that does not coerce to a finite number, are
//! dropped silently; survivors keep their relative order.

use crate::cohort::{Cohort, OutcomeRow, OutcomeValue, RawMeasurement};

/// Sanitize raw outcome rows.
///
/// An empty result is not an error here; the caller decides how to surface
/// "no data".
pub fn sanitize(rows: &[OutcomeRow]) -> Vec<OutcomeValue> {
    let kept: Vec<OutcomeValue> = rows
        .iter()
        .filter_map(|row| {
            let value = row.value.as_ref().and_then(coerce)?;
            Some(OutcomeValue {
                cohort: row.cohort,
                value,
            })
        })
        .collect();

    let dropped = rows.len() - kept.len();
    if dropped > 0 {
        tracing::debug!(
            total = rows.len(),
            kept = kept.len(),
            dropped,
            "Dropped null or non-numeric outcome rows"
        );
    }

    kept
}

/// Coerce a raw value to a finite `f64`.
///
/// Strings are trimmed before parsing; blank strings do not coerce.
/// Unsigned `0x`, `0o` and `0b` integer literals are accepted.
pub fn coerce(raw: &RawMeasurement) -> Option<f64> {
    let value = match raw {
        RawMeasurement::Number(n) => *n,
        RawMeasurement::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            parse_radix_literal(s).or_else(|| s.parse::<f64>().ok())?
        }
    };

    value.is_finite().then_some(value)
}

fn parse_radix_literal(s: &str) -> Option<f64> {
    let (radix, digits) = match s.get(..2)? {
        "0x" | "0X" => (16, &s[2..]),
        "0o" | "0O" => (8, &s[2..]),
        "0b" | "0B" => (2, &s[2..]),
        _ => return None,
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    // Fold as f64 so long literals lose precision instead of overflowing.
    Some(
        digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d)),
    )
}

/// Sanitized outcome values split by cohort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CohortValues {
    pub disease: Vec<f64>,
    pub non_disease: Vec<f64>,
}

impl CohortValues {
    /// Values for one cohort.
    pub fn get(&self, cohort: Cohort) -> &[f64] {
        match cohort {
            Cohort::Disease => &self.disease,
            Cohort::NonDisease => &self.non_disease,
        }
    }

    /// Total number of values across both cohorts.
    pub fn len(&self) -> usize {
        self.disease.len() + self.non_disease.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition sanitized values by cohort, preserving order within each.
pub fn partition_by_cohort(values: &[OutcomeValue]) -> CohortValues {
    let mut out = CohortValues::default();
    for v in values {
        match v.cohort {
            Cohort::Disease => out.disease.push(v.value),
            Cohort::NonDisease => out.non_disease.push(v.value),
        }
    }
    out
}
