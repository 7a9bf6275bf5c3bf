//! Refresh orchestration.
//!
//! Turns selection changes into fetch cycles and publishes immutable
//! [`DashboardSnapshot`]s that every view renders from.
//!
//! ```text
//!            select / refresh
//!   Idle ─────────────────────► Loading ──(all three ok)──► Ready
//!                                  ▲  └──(any failure)────► Failed
//!                                  └──── select / refresh ──┘
//! ```

mod orchestrator;
mod state;

pub use orchestrator::{CycleOutcome, RefreshConfig, RefreshOrchestrator, DEFAULT_CYCLE_TIMEOUT};
pub use state::{CohortView, CycleToken, DashboardSnapshot, RefreshPhase, StatusMessage};
