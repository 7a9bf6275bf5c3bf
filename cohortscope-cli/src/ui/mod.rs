//! Terminal UI for cohortscope.
//!
//! Provides a live dashboard comparing the disease and non-disease cohorts
//! of the current selection.

pub mod dashboard;

pub use dashboard::{Dashboard, DashboardEvent, DashboardState};
