//! Refresh orchestrator.
//!
//! Drives the Idle → Loading → {Ready, Failed} state machine. Each
//! selection change or manual refresh starts a new fetch cycle with a fresh
//! [`CycleToken`]; the three gateway requests run concurrently and are
//! joined before anything is committed. A cycle only commits if its token is
//! still current when it resolves, so the last selection always wins.
//!
//! State is published through a `tokio::sync::watch` channel. The token is
//! part of the published snapshot, which makes "check token, then write" a
//! single step under the channel's lock.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::state::{CohortView, CycleToken, DashboardSnapshot, RefreshPhase, StatusMessage};
use crate::cohort::Selection;
use crate::gateway::{CohortGateway, GatewayError};

/// Default time budget for one whole fetch cycle.
pub const DEFAULT_CYCLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Orchestrator configuration.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Time budget for the joined requests of one cycle. Exceeding it fails
    /// the cycle.
    pub cycle_timeout: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            cycle_timeout: DEFAULT_CYCLE_TIMEOUT,
        }
    }
}

/// How a fetch cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The cycle was current and committed this phase.
    Committed(RefreshPhase),
    /// A newer cycle started first; the result was discarded.
    Superseded {
        token: CycleToken,
        current: CycleToken,
    },
}

/// Coordinates fetch cycles against a [`CohortGateway`].
pub struct RefreshOrchestrator<G: CohortGateway> {
    gateway: G,
    config: RefreshConfig,
    state: watch::Sender<DashboardSnapshot>,
}

impl<G: CohortGateway> RefreshOrchestrator<G> {
    pub fn new(gateway: G, config: RefreshConfig) -> Self {
        let (state, _) = watch::channel(DashboardSnapshot::default());
        Self {
            gateway,
            config,
            state,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Latest published state.
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.state.borrow().clone()
    }

    /// Receive every published state change.
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.state.subscribe()
    }

    /// Start a new cycle for `selection` and enter Loading.
    ///
    /// Clears the previous data and message. Any cycle still in flight is
    /// superseded from this point on.
    pub fn begin(&self, selection: Selection) -> CycleToken {
        let mut token = CycleToken::default();
        let label = selection.to_string();

        self.state.send_modify(|s| {
            s.token = s.token.next();
            token = s.token;
            s.selection = Some(selection);
            s.phase = RefreshPhase::Loading;
            s.view = None;
            s.message = None;
            s.last_error = None;
        });

        debug!(cycle = %token, selection = %label, "Fetch cycle started");
        token
    }

    /// Fetch, derive and commit the cycle identified by `token`.
    pub async fn run_cycle(&self, token: CycleToken, selection: &Selection) -> CycleOutcome {
        let disease = selection.disease_key.as_str();
        let fetch = async {
            tokio::try_join!(
                self.gateway.cohort_counts(disease),
                self.gateway.age_sex_rows(disease),
                self.gateway.outcome_rows(disease, selection.measurement_id),
            )
        };

        let result = match tokio::time::timeout(self.config.cycle_timeout, fetch).await {
            Ok(joined) => joined,
            Err(_) => Err(GatewayError::Timeout(self.config.cycle_timeout)),
        };

        let derived = result.map(|(counts, age_sex, outcomes)| {
            CohortView::derive(counts, &age_sex, &outcomes)
        });

        self.commit(token, derived)
    }

    /// Start and run a cycle for `selection`.
    pub async fn select(&self, selection: Selection) -> CycleOutcome {
        let token = self.begin(selection.clone());
        self.run_cycle(token, &selection).await
    }

    /// Re-run the current selection. Returns `None` if nothing has been
    /// selected yet.
    pub async fn refresh(&self) -> Option<CycleOutcome> {
        let selection = self.state.borrow().selection.clone()?;
        Some(self.select(selection).await)
    }

    fn commit(&self, token: CycleToken, result: Result<CohortView, GatewayError>) -> CycleOutcome {
        let error = result.as_ref().err().map(ToString::to_string);
        let mut outcome = CycleOutcome::Superseded {
            token,
            current: token,
        };
        let mut committed = None;

        self.state.send_if_modified(|s| {
            if s.token != token {
                outcome = CycleOutcome::Superseded {
                    token,
                    current: s.token,
                };
                return false;
            }

            match result {
                Ok(view) => {
                    s.phase = RefreshPhase::Ready;
                    s.message = (!view.has_outcomes()).then_some(StatusMessage::NoData);
                    committed = Some((view.counts, view.outcomes.len()));
                    s.view = Some(Arc::new(view));
                    s.last_error = None;
                }
                Err(_) => {
                    s.phase = RefreshPhase::Failed;
                    s.message = Some(StatusMessage::LoadFailed);
                    s.view = None;
                    s.last_error = error.clone();
                }
            }

            outcome = CycleOutcome::Committed(s.phase);
            true
        });

        match outcome {
            CycleOutcome::Superseded { token, current } => {
                debug!(cycle = %token, current = %current, "Discarding superseded cycle");
            }
            CycleOutcome::Committed(RefreshPhase::Failed) => {
                warn!(
                    cycle = %token,
                    error = error.as_deref().unwrap_or("unknown"),
                    "Fetch cycle failed"
                );
            }
            CycleOutcome::Committed(phase) => {
                if let Some((counts, outcomes)) = committed {
                    info!(
                        cycle = %token,
                        phase = %phase,
                        cases = counts.case_count,
                        controls = counts.control_count,
                        outcomes,
                        "Fetch cycle committed"
                    );
                }
            }
        }

        outcome
    }
}

impl<G: CohortGateway + 'static> RefreshOrchestrator<G> {
    /// Start a cycle now and run it on the tokio runtime.
    ///
    /// The cycle enters Loading before this returns, so a later call always
    /// supersedes an earlier one regardless of completion order.
    pub fn spawn_select(self: &Arc<Self>, selection: Selection) -> JoinHandle<CycleOutcome> {
        let token = self.begin(selection.clone());
        let this = Arc::clone(self);
        tokio::spawn(async move { this.run_cycle(token, &selection).await })
    }

    /// Spawned variant of [`refresh`](Self::refresh).
    pub fn spawn_refresh(self: &Arc<Self>) -> Option<JoinHandle<CycleOutcome>> {
        let selection = self.state.borrow().selection.clone()?;
        Some(self.spawn_select(selection))
    }
}
