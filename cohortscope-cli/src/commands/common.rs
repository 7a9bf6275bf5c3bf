//! Common types and utilities shared across CLI commands.

use std::fmt::Write;

use clap::Args;
use cohortscope::catalog::measurement_label;
use cohortscope::cohort::{AgeGroup, Cohort, Selection};
use cohortscope::config::ConfigFile;
use cohortscope::refresh::{CohortView, DashboardSnapshot};
use cohortscope::stats::StatCell;

/// Disease and measurement overrides for commands that run a fetch cycle.
#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Disease key (default: selection.disease from config)
    #[arg(long)]
    pub disease: Option<String>,

    /// Measurement id (default: selection.measurement from config)
    #[arg(long)]
    pub measurement: Option<i64>,
}

impl SelectionArgs {
    /// Apply the overrides on top of the configured selection.
    pub fn resolve(&self, config: &ConfigFile) -> Selection {
        let base = config.selection();
        Selection::new(
            self.disease.clone().unwrap_or(base.disease_key),
            self.measurement.unwrap_or(base.measurement_id),
        )
    }
}

/// One-line description of a selection, e.g. `diabetes / Hemoglobin [...]`.
pub fn describe_selection(selection: &Selection) -> String {
    format!(
        "{} / {}",
        selection.disease_key,
        measurement_label(selection.measurement_id)
    )
}

/// Format a committed snapshot as the plain-text report printed by `build`.
pub fn format_report(snapshot: &DashboardSnapshot, user: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "User:        {}", user);
    if let Some(selection) = &snapshot.selection {
        let _ = writeln!(out, "Selection:   {}", describe_selection(selection));
    }
    let _ = writeln!(out, "Status:      {}", snapshot.phase);

    if let Some(view) = snapshot.view() {
        out.push('\n');
        write_counts(&mut out, view);
        out.push('\n');
        write_age_sex(&mut out, view);
        out.push('\n');
        write_stats(&mut out, view);
    }

    if let Some(message) = snapshot.message {
        out.push('\n');
        let _ = writeln!(out, "{}", message);
    }

    out
}

fn write_counts(out: &mut String, view: &CohortView) {
    let counts = &view.counts;
    let _ = writeln!(out, "Patient Counts");
    let _ = writeln!(out, "  Disease:      {}", counts.case_count);
    let _ = writeln!(out, "  Non-Disease:  {}", counts.control_count);
    if let Some(total) = counts.total_people {
        let _ = writeln!(out, "  Total:        {}", total);
    }
}

fn write_age_sex(out: &mut String, view: &CohortView) {
    let _ = writeln!(out, "Age / Sex Distribution");
    let _ = write!(out, "  {:<24}", "");
    for group in AgeGroup::ALL {
        let _ = write!(out, "{:>8}", group.label());
    }
    out.push('\n');

    for series in &view.series {
        let _ = write!(out, "  {:<24}", series.name());
        for count in series.counts {
            let _ = write!(out, "{:>8}", count);
        }
        out.push('\n');
    }
}

fn write_stats(out: &mut String, view: &CohortView) {
    let _ = writeln!(out, "Summary Statistics");
    let _ = writeln!(
        out,
        "  {:<14}{:>8}{:>12}{:>12}{:>12}",
        "Cohort", "N", "Median", "P25", "P75"
    );
    for cohort in Cohort::ALL {
        let stats = view.stats.get(cohort);
        let _ = writeln!(
            out,
            "  {:<14}{:>8}{:>12}{:>12}{:>12}",
            cohort.as_str(),
            stats.n,
            stat_cell(stats.median),
            stat_cell(stats.p25),
            stat_cell(stats.p75),
        );
    }
}

/// Two-decimal stat cell, `-` for the no-data sentinel.
pub fn stat_cell(value: Option<f64>) -> String {
    format!("{:.2}", StatCell(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohortscope::catalog::{GLUCOSE_ID, HEMOGLOBIN_ID};
    use cohortscope::cohort::{AgeSexRow, CohortCounts, OutcomeRow, RawMeasurement, Sex};
    use cohortscope::refresh::{RefreshPhase, StatusMessage};
    use std::sync::Arc;

    fn snapshot(outcomes: &[OutcomeRow]) -> DashboardSnapshot {
        let counts = CohortCounts {
            case_count: 4,
            control_count: 6,
            total_people: None,
        };
        let rows = [AgeSexRow {
            cohort: Cohort::Disease,
            sex: Sex::Male,
            age_group: AgeGroup::ALL[0],
            count: 5,
        }];
        let view = CohortView::derive(counts, &rows, outcomes);
        DashboardSnapshot {
            selection: Some(Selection::new("diabetes", HEMOGLOBIN_ID)),
            phase: RefreshPhase::Ready,
            message: (!view.has_outcomes()).then_some(StatusMessage::NoData),
            view: Some(Arc::new(view)),
            ..Default::default()
        }
    }

    #[test]
    fn test_selection_args_override_config() {
        let config = ConfigFile::default();
        let args = SelectionArgs {
            disease: None,
            measurement: Some(HEMOGLOBIN_ID),
        };

        let selection = args.resolve(&config);
        assert_eq!(selection.disease_key, config.selection.disease);
        assert_eq!(selection.measurement_id, HEMOGLOBIN_ID);

        let selection = SelectionArgs::default().resolve(&config);
        assert_eq!(selection.measurement_id, GLUCOSE_ID);
    }

    #[test]
    fn test_report_lists_counts_series_and_stats() {
        let rows = [
            OutcomeRow::new(Cohort::Disease, Some(RawMeasurement::Number(10.0))),
            OutcomeRow::new(Cohort::Disease, Some(RawMeasurement::Number(20.0))),
        ];
        let report = format_report(&snapshot(&rows), "ana@example.com");

        assert!(report.contains("User:        ana@example.com"));
        assert!(report.contains("Hemoglobin [Mass/volume] in Blood"));
        assert!(report.contains("Disease:      4"));
        assert!(report.contains("Disease - Male"));
        assert!(report.contains("10.00"));
        assert!(!report.contains("No data available"));
    }

    #[test]
    fn test_report_renders_sentinel_as_dash() {
        let report = format_report(&snapshot(&[]), "ana@example.com");

        let stats_row: Vec<&str> = report
            .lines()
            .skip_while(|l| !l.starts_with("Summary Statistics"))
            .find(|l| l.trim_start().starts_with("Non-Disease"))
            .unwrap()
            .split_whitespace()
            .collect();
        assert_eq!(stats_row, vec!["Non-Disease", "0", "-", "-", "-"]);
        assert!(report.contains("No data available for selected measurement."));
    }
}
