//! Age/sex series builder.
//!
//! Reshapes the sparse age/sex count rows into four dense series, one per
//! (cohort, sex) pair, each aligned to the fixed [`AgeGroup::ALL`] axis.
//! Missing cells are zero. If several rows share a triple, the first one
//! encountered wins.

use crate::cohort::{AgeGroup, AgeSexRow, Cohort, Sex};

/// Fixed series order for the grouped bar chart.
pub const SERIES_ORDER: [(Cohort, Sex); 4] = [
    (Cohort::Disease, Sex::Male),
    (Cohort::Disease, Sex::Female),
    (Cohort::NonDisease, Sex::Male),
    (Cohort::NonDisease, Sex::Female),
];

/// One bar series: counts per age group for a (cohort, sex) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeSexSeries {
    pub cohort: Cohort,
    pub sex: Sex,
    /// Count per age group, in [`AgeGroup::ALL`] order.
    pub counts: [u64; 4],
}

impl AgeSexSeries {
    /// Legend name, e.g. "Disease - Male".
    pub fn name(&self) -> String {
        format!("{} - {}", self.cohort, self.sex)
    }

    /// Pairs of (age group, count) in axis order.
    pub fn points(&self) -> impl Iterator<Item = (AgeGroup, u64)> + '_ {
        AgeGroup::ALL.iter().copied().zip(self.counts.iter().copied())
    }

    /// Largest count in this series.
    pub fn max(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Build the four dense series from sparse rows.
pub fn build_series(rows: &[AgeSexRow]) -> [AgeSexSeries; 4] {
    SERIES_ORDER.map(|(cohort, sex)| AgeSexSeries {
        cohort,
        sex,
        counts: AgeGroup::ALL.map(|age_group| lookup(rows, cohort, sex, age_group)),
    })
}

fn lookup(rows: &[AgeSexRow], cohort: Cohort, sex: Sex, age_group: AgeGroup) -> u64 {
    rows.iter()
        .find(|r| r.cohort == cohort && r.sex == sex && r.age_group == age_group)
        .map(|r| r.count)
        .unwrap_or(0)
}
