//! Summary statistics engine.
//!
//! Computes n, median, P25 and P75 per cohort using a nearest-rank,
//! floor-indexed order statistic over the ascending sort:
//!
//! ```text
//! index = floor(p * (L - 1))      result = sorted[index]
//! ```
//!
//! This is deliberately not linear interpolation. Reference outputs depend
//! on the exact index formula.

use std::fmt;

use crate::cohort::Cohort;
use crate::sanitize::CohortValues;

/// Summary of one cohort's outcome distribution.
///
/// `None` is the "no data" sentinel and only occurs when `n == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub n: usize,
    pub median: Option<f64>,
    pub p25: Option<f64>,
    pub p75: Option<f64>,
}

impl SummaryStats {
    /// Stats for an empty cohort.
    pub const EMPTY: SummaryStats = SummaryStats {
        n: 0,
        median: None,
        p25: None,
        p75: None,
    };

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}

/// Formats a stat cell, rendering the sentinel as `-`.
pub struct StatCell(pub Option<f64>);

impl fmt::Display for StatCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => match f.precision() {
                Some(p) => write!(f, "{:.*}", p, v),
                None => write!(f, "{}", v),
            },
            None => f.write_str("-"),
        }
    }
}

/// Summarize a slice of finite values.
pub fn summarize(values: &[f64]) -> SummaryStats {
    if values.is_empty() {
        return SummaryStats::EMPTY;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    SummaryStats {
        n: sorted.len(),
        median: Some(quantile(&sorted, 0.5)),
        p25: Some(quantile(&sorted, 0.25)),
        p75: Some(quantile(&sorted, 0.75)),
    }
}

/// Order-statistic quantile over an ascending, non-empty slice.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    let index = (p * (sorted.len() - 1) as f64).floor() as usize;
    sorted[index.min(sorted.len() - 1)]
}

/// Per-cohort summary statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CohortStats {
    pub disease: SummaryStats,
    pub non_disease: SummaryStats,
}

impl CohortStats {
    pub fn from_values(values: &CohortValues) -> Self {
        Self {
            disease: summarize(&values.disease),
            non_disease: summarize(&values.non_disease),
        }
    }

    pub fn get(&self, cohort: Cohort) -> &SummaryStats {
        match cohort {
            Cohort::Disease => &self.disease,
            Cohort::NonDisease => &self.non_disease,
        }
    }
}

impl Default for CohortStats {
    fn default() -> Self {
        Self {
            disease: SummaryStats::EMPTY,
            non_disease: SummaryStats::EMPTY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_gives_sentinel() {
        let s = summarize(&[]);
        assert_eq!(s.n, 0);
        assert_eq!(s.median, None);
        assert_eq!(s.p25, None);
        assert_eq!(s.p75, None);
        assert!(s.is_empty());
    }

    #[test]
    fn test_four_values_use_floor_index() {
        let s = summarize(&[10.0, 20.0, 30.0, 40.0]);
        assert_eq!(s.n, 4);
        assert_eq!(s.p25, Some(10.0));
        assert_eq!(s.median, Some(20.0));
        assert_eq!(s.p75, Some(30.0));
    }

    #[test]
    fn test_single_value() {
        let s = summarize(&[7.5]);
        assert_eq!(s.n, 1);
        assert_eq!(s.p25, Some(7.5));
        assert_eq!(s.median, Some(7.5));
        assert_eq!(s.p75, Some(7.5));
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let s = summarize(&[5.0, 1.0, 4.0, 2.0, 3.0]);
        // L=5: p25 -> idx 1, median -> idx 2, p75 -> idx 3
        assert_eq!(s.p25, Some(2.0));
        assert_eq!(s.median, Some(3.0));
        assert_eq!(s.p75, Some(4.0));
    }

    #[test]
    fn test_no_interpolation_on_even_length() {
        let s = summarize(&[1.0, 2.0]);
        // Interpolation would give 1.5; the order statistic gives sorted[0].
        assert_eq!(s.median, Some(1.0));
        assert_eq!(s.p75, Some(1.0));
    }

    #[test]
    fn test_negative_values() {
        let s = summarize(&[-1.0, -10.0, 0.0]);
        assert_eq!(s.p25, Some(-10.0));
        assert_eq!(s.median, Some(-1.0));
        assert_eq!(s.p75, Some(-1.0));
    }

    #[test]
    fn test_stat_cell_formatting() {
        assert_eq!(StatCell(None).to_string(), "-");
        assert_eq!(StatCell(Some(7.5)).to_string(), "7.5");
        assert_eq!(format!("{:.2}", StatCell(Some(7.5))), "7.50");
        assert_eq!(format!("{:.2}", StatCell(None)), "-");
    }

    #[test]
    fn test_cohort_stats_from_values() {
        let values = CohortValues {
            disease: vec![3.0, 1.0, 2.0],
            non_disease: vec![],
        };
        let stats = CohortStats::from_values(&values);
        assert_eq!(stats.disease.median, Some(2.0));
        assert_eq!(stats.get(Cohort::NonDisease), &SummaryStats::EMPTY);
    }

    proptest! {
        /// Property: n always equals the input length.
        #[test]
        fn prop_n_matches_length(values in prop::collection::vec(-1e6f64..1e6f64, 1..200)) {
            prop_assert_eq!(summarize(&values).n, values.len());
        }

        /// Property: the result does not depend on input order.
        #[test]
        fn prop_order_independent(values in prop::collection::vec(-1e6f64..1e6f64, 1..200)) {
            let mut reversed = values.clone();
            reversed.reverse();
            prop_assert_eq!(summarize(&values), summarize(&reversed));
        }

        /// Property: quartiles are ordered and drawn from the input.
        #[test]
        fn prop_quartiles_ordered(values in prop::collection::vec(-1e6f64..1e6f64, 1..200)) {
            let s = summarize(&values);
            let (p25, median, p75) = (s.p25.unwrap(), s.median.unwrap(), s.p75.unwrap());
            prop_assert!(p25 <= median && median <= p75);
            prop_assert!(values.contains(&p25));
            prop_assert!(values.contains(&median));
            prop_assert!(values.contains(&p75));
        }
    }
}
