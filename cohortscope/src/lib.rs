//! cohortscope - Disease vs. non-disease cohort comparison
//!
//! This library fetches cohort data from a REST backend and derives what a
//! comparison dashboard shows: patient counts, age/sex distributions and
//! per-cohort summary statistics of a clinical measurement.
//!
//! # Pipeline
//!
//! ```text
//! Selection ─► RefreshOrchestrator ─► CohortGateway (3 concurrent reads)
//!                     │
//!                     ├─ sanitize  ─► partitioned outcome values ─► stats
//!                     ├─ series    ─► four age/sex series
//!                     └─ DashboardSnapshot (watch channel) ─► UI / export
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cohortscope::cohort::Selection;
//! use cohortscope::gateway::{AsyncReqwestClient, HttpCohortGateway};
//! use cohortscope::refresh::{RefreshConfig, RefreshOrchestrator};
//!
//! let gateway = HttpCohortGateway::new(AsyncReqwestClient::new()?, "http://localhost:8000")?;
//! let orchestrator = RefreshOrchestrator::new(gateway, RefreshConfig::default());
//! orchestrator.select(Selection::new("diabetes", 3004501)).await;
//!
//! if let Some(view) = orchestrator.snapshot().view() {
//!     println!("median: {:?}", view.stats.disease.median);
//! }
//! ```

pub mod catalog;
pub mod cohort;
pub mod config;
pub mod export;
pub mod gateway;
pub mod logging;
pub mod refresh;
pub mod sanitize;
pub mod series;
pub mod session;
pub mod stats;

/// Version of the cohortscope library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
