//! State types published by the refresh orchestrator.
//!
//! - [`CycleToken`] - Monotonic fetch cycle generation
//! - [`RefreshPhase`] - Idle / Loading / Ready / Failed
//! - [`StatusMessage`] - User-facing informational or error text
//! - [`CohortView`] - Derived data committed by one cycle
//! - [`DashboardSnapshot`] - Everything a consumer renders from

use std::fmt;
use std::sync::Arc;

use crate::cohort::{AgeSexRow, CohortCounts, OutcomeRow, Selection};
use crate::sanitize::{partition_by_cohort, sanitize, CohortValues};
use crate::series::{build_series, AgeSexSeries};
use crate::stats::CohortStats;

/// Generation counter for fetch cycles.
///
/// Incremented every time a cycle starts. A cycle may only commit while its
/// token is still the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CycleToken(pub u64);

impl CycleToken {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for CycleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Phase of the refresh state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPhase {
    /// No cycle has started yet.
    #[default]
    Idle,
    /// A cycle is in flight.
    Loading,
    /// The latest cycle committed its data.
    Ready,
    /// The latest cycle failed; no data is shown.
    Failed,
}

impl RefreshPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshPhase::Idle => "idle",
            RefreshPhase::Loading => "loading",
            RefreshPhase::Ready => "ready",
            RefreshPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for RefreshPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing message attached to a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    /// All requests succeeded but no outcome value survived sanitizing.
    NoData,
    /// A gateway request failed or the cycle timed out.
    LoadFailed,
}

impl StatusMessage {
    pub fn text(&self) -> &'static str {
        match self {
            StatusMessage::NoData => "No data available for selected measurement.",
            StatusMessage::LoadFailed => "Failed to load data.",
        }
    }

    /// Whether the message reports an error rather than information.
    pub fn is_error(&self) -> bool {
        matches!(self, StatusMessage::LoadFailed)
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Derived, read-only data committed by one successful cycle.
///
/// Counts, series, outcome values and stats always come from the same
/// cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortView {
    pub counts: CohortCounts,
    pub series: [AgeSexSeries; 4],
    pub outcomes: CohortValues,
    pub stats: CohortStats,
}

impl CohortView {
    /// Derive the view from the three raw responses.
    pub fn derive(counts: CohortCounts, age_sex: &[AgeSexRow], outcomes: &[OutcomeRow]) -> Self {
        let outcomes = partition_by_cohort(&sanitize(outcomes));
        let stats = CohortStats::from_values(&outcomes);

        Self {
            counts,
            series: build_series(age_sex),
            outcomes,
            stats,
        }
    }

    /// Whether any outcome value survived sanitizing.
    pub fn has_outcomes(&self) -> bool {
        !self.outcomes.is_empty()
    }
}

/// Immutable snapshot of the orchestrator state.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    /// Token of the most recently started cycle.
    pub token: CycleToken,
    /// Selection of the most recently started cycle.
    pub selection: Option<Selection>,
    pub phase: RefreshPhase,
    /// Committed data. Only present in [`RefreshPhase::Ready`].
    pub view: Option<Arc<CohortView>>,
    pub message: Option<StatusMessage>,
    /// Error detail of the last failed cycle, for diagnostics.
    pub last_error: Option<String>,
}

impl DashboardSnapshot {
    pub fn is_loading(&self) -> bool {
        self.phase == RefreshPhase::Loading
    }

    /// The committed view, if the latest cycle is ready.
    pub fn view(&self) -> Option<&CohortView> {
        self.view.as_deref()
    }
}
