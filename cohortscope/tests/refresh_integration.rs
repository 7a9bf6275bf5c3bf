//! Integration tests for the refresh pipeline.
//!
//! These tests drive the full path from HTTP bodies to committed snapshots:
//! - HttpCohortGateway → row validation → sanitize / series / stats
//! - Last-selection-wins when an older cycle resolves late
//! - All-or-nothing failure when one of the three requests fails
//! - Export of the committed box plot
//!
//! Run with: `cargo test --test refresh_integration`

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;

use cohortscope::cohort::Selection;
use cohortscope::export::{BoxPlotSurface, ChartExporter, StandardExporter};
use cohortscope::gateway::{AsyncHttpClient, GatewayError, HttpCohortGateway};
use cohortscope::refresh::{
    CycleOutcome, CycleToken, RefreshConfig, RefreshOrchestrator, RefreshPhase, StatusMessage,
};

// ============================================================================
// Test Helpers
// ============================================================================

const GLUCOSE: i64 = 3004501;
const HEMOGLOBIN: i64 = 3000963;

const PATIENTS: &str = r#"{"total_people": 10, "case_count": 4, "control_count": 6}"#;

const AGE_SEX: &str = r#"{"rows": [
    {"cohort": "Disease", "sex": "Male", "age_group": "<20", "count": 5},
    {"cohort": "Disease", "sex": "Other", "age_group": "<20", "count": 1},
    {"cohort": "Non-Disease", "sex": "Female", "age_group": "60+", "count": 2}
]}"#;

const GLUCOSE_ROWS: &str = r#"{"rows": [
    {"cohort": "Disease", "value": 140},
    {"cohort": "Disease", "value": "120.5"},
    {"cohort": "Disease", "value": null},
    {"cohort": "Non-Disease", "value": 95},
    {"cohort": "Non-Disease", "value": "n/a"}
]}"#;

const HEMOGLOBIN_ROWS: &str = r#"{"rows": [
    {"cohort": "Disease", "value": 10},
    {"cohort": "Disease", "value": 20},
    {"cohort": "Disease", "value": 30},
    {"cohort": "Disease", "value": 40},
    {"cohort": "Non-Disease", "value": 14.2}
]}"#;

struct Route {
    pattern: String,
    response: Result<String, GatewayError>,
    gate: Option<Arc<Notify>>,
}

/// HTTP client serving canned bodies, optionally held behind a gate.
#[derive(Default)]
struct StubHttpClient {
    routes: Mutex<Vec<Route>>,
}

impl StubHttpClient {
    fn backend() -> Self {
        let stub = Self::default();
        stub.route("/patients", Ok(PATIENTS));
        stub.route("/age-sex", Ok(AGE_SEX));
        stub.route(&format!("measurement_id={}", GLUCOSE), Ok(GLUCOSE_ROWS));
        stub.route(
            &format!("measurement_id={}", HEMOGLOBIN),
            Ok(HEMOGLOBIN_ROWS),
        );
        stub
    }

    /// Register a route. Later routes take precedence.
    fn route(&self, pattern: &str, response: Result<&str, GatewayError>) {
        self.routes.lock().unwrap().insert(
            0,
            Route {
                pattern: pattern.to_string(),
                response: response.map(str::to_string),
                gate: None,
            },
        );
    }

    /// Hold responses for `pattern` until the returned gate is notified.
    fn gate(&self, pattern: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        let mut routes = self.routes.lock().unwrap();
        for route in routes.iter_mut().filter(|r| r.pattern == pattern) {
            route.gate = Some(Arc::clone(&gate));
        }
        gate
    }
}

impl AsyncHttpClient for StubHttpClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, GatewayError> {
        let (response, gate) = {
            let routes = self.routes.lock().unwrap();
            match routes.iter().find(|r| url.contains(&r.pattern)) {
                Some(r) => (r.response.clone(), r.gate.clone()),
                None => (Err(GatewayError::Http(format!("HTTP 404 from {}", url))), None),
            }
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }
        response.map(String::into_bytes)
    }
}

fn orchestrator(stub: StubHttpClient) -> RefreshOrchestrator<HttpCohortGateway<StubHttpClient>> {
    let gateway = HttpCohortGateway::new(stub, "http://backend.test").unwrap();
    RefreshOrchestrator::new(
        gateway,
        RefreshConfig {
            cycle_timeout: Duration::from_secs(5),
        },
    )
}

// ============================================================================
// Full cycle
// ============================================================================

#[tokio::test]
async fn test_full_cycle_derives_consistent_view() {
    let orch = orchestrator(StubHttpClient::backend());

    let outcome = orch.select(Selection::new("diabetes", GLUCOSE)).await;
    assert_eq!(outcome, CycleOutcome::Committed(RefreshPhase::Ready));

    let snap = orch.snapshot();
    assert_eq!(snap.message, None);
    let view = snap.view().unwrap();

    assert_eq!(view.counts.case_count, 4);
    assert_eq!(view.counts.total_people, Some(10));

    // "Other" sex row is dropped at the boundary.
    assert_eq!(view.series[0].counts, [5, 0, 0, 0]);
    assert_eq!(view.series[1].counts, [0, 0, 0, 0]);
    assert_eq!(view.series[3].counts, [0, 0, 0, 2]);

    assert_eq!(view.outcomes.disease, vec![140.0, 120.5]);
    assert_eq!(view.outcomes.non_disease, vec![95.0]);
    assert_eq!(view.stats.disease.n, 2);
    assert_eq!(view.stats.disease.median, Some(120.5));
    assert_eq!(view.stats.non_disease.p75, Some(95.0));
}

#[tokio::test]
async fn test_quartiles_use_floor_index() {
    let orch = orchestrator(StubHttpClient::backend());
    orch.select(Selection::new("diabetes", HEMOGLOBIN)).await;

    let snap = orch.snapshot();
    let stats = snap.view().unwrap().stats.disease;
    assert_eq!(stats.n, 4);
    assert_eq!(stats.p25, Some(10.0));
    assert_eq!(stats.median, Some(20.0));
    assert_eq!(stats.p75, Some(30.0));
}

#[tokio::test]
async fn test_no_outcomes_is_ready_with_message() {
    let stub = StubHttpClient::backend();
    stub.route("/outcomes", Ok(r#"{"rows": [{"cohort": "Disease", "value": null}]}"#));
    let orch = orchestrator(stub);

    let outcome = orch.select(Selection::new("diabetes", GLUCOSE)).await;
    assert_eq!(outcome, CycleOutcome::Committed(RefreshPhase::Ready));

    let snap = orch.snapshot();
    assert_eq!(snap.message, Some(StatusMessage::NoData));
    let view = snap.view().unwrap();
    assert_eq!(view.counts.control_count, 6);
    assert_eq!(view.series[0].counts, [5, 0, 0, 0]);
    assert!(view.stats.disease.median.is_none());
}

#[tokio::test]
async fn test_out_of_range_value_drops_only_its_row() {
    let stub = StubHttpClient::backend();
    stub.route(
        "/outcomes",
        Ok(r#"{"rows": [{"cohort": "Disease", "value": 1e400}, {"cohort": "Disease", "value": 5}]}"#),
    );
    let orch = orchestrator(stub);

    let outcome = orch.select(Selection::new("diabetes", GLUCOSE)).await;
    assert_eq!(outcome, CycleOutcome::Committed(RefreshPhase::Ready));

    let snap = orch.snapshot();
    assert_eq!(snap.view().unwrap().outcomes.disease, vec![5.0]);
}

// ============================================================================
// Failure isolation
// ============================================================================

#[tokio::test]
async fn test_age_sex_failure_fails_cycle() {
    let stub = StubHttpClient::backend();
    stub.route("/age-sex", Err(GatewayError::Http("HTTP 500".to_string())));
    let orch = orchestrator(stub);

    let outcome = orch.select(Selection::new("diabetes", GLUCOSE)).await;
    assert_eq!(outcome, CycleOutcome::Committed(RefreshPhase::Failed));

    let snap = orch.snapshot();
    assert!(snap.view.is_none());
    assert_eq!(snap.message, Some(StatusMessage::LoadFailed));
    assert_eq!(snap.message.unwrap().text(), "Failed to load data.");
}

#[tokio::test]
async fn test_malformed_envelope_fails_cycle() {
    let stub = StubHttpClient::backend();
    stub.route("/outcomes", Ok(r#"{"rows": "oops"}"#));
    let orch = orchestrator(stub);

    let outcome = orch.select(Selection::new("diabetes", GLUCOSE)).await;
    assert_eq!(outcome, CycleOutcome::Committed(RefreshPhase::Failed));
}

#[tokio::test]
async fn test_recovery_after_failure() {
    let stub = StubHttpClient::backend();
    stub.route(
        &format!("measurement_id={}", HEMOGLOBIN),
        Err(GatewayError::Http("HTTP 502".to_string())),
    );
    let orch = orchestrator(stub);

    orch.select(Selection::new("diabetes", HEMOGLOBIN)).await;
    assert_eq!(orch.snapshot().phase, RefreshPhase::Failed);

    orch.select(Selection::new("diabetes", GLUCOSE)).await;
    let snap = orch.snapshot();
    assert_eq!(snap.phase, RefreshPhase::Ready);
    assert!(snap.last_error.is_none());
}

// ============================================================================
// Last selection wins
// ============================================================================

#[tokio::test]
async fn test_late_stale_cycle_never_commits() {
    let stub = StubHttpClient::backend();
    let glucose_gate = stub.gate(&format!("measurement_id={}", GLUCOSE));
    let orch = Arc::new(orchestrator(stub));
    let mut rx = orch.subscribe();

    // Cycle A (glucose) is in flight and held.
    let stale = orch.spawn_select(Selection::new("diabetes", GLUCOSE));
    tokio::task::yield_now().await;

    // Cycle B (hemoglobin) starts and completes first.
    let current = orch.select(Selection::new("diabetes", HEMOGLOBIN)).await;
    assert_eq!(current, CycleOutcome::Committed(RefreshPhase::Ready));

    // A resolves late and must be discarded.
    glucose_gate.notify_one();
    assert_eq!(
        stale.await.unwrap(),
        CycleOutcome::Superseded {
            token: CycleToken(1),
            current: CycleToken(2),
        }
    );

    let snap = rx.borrow_and_update().clone();
    assert_eq!(snap.token, CycleToken(2));
    assert_eq!(snap.selection.as_ref().unwrap().measurement_id, HEMOGLOBIN);
    assert_eq!(snap.view().unwrap().stats.disease.n, 4);
}

#[tokio::test]
async fn test_rapid_selections_commit_only_the_last() {
    let orch = Arc::new(orchestrator(StubHttpClient::backend()));

    let handles: Vec<_> = [GLUCOSE, HEMOGLOBIN, GLUCOSE, HEMOGLOBIN]
        .into_iter()
        .map(|id| orch.spawn_select(Selection::new("diabetes", id)))
        .collect();

    let mut committed = 0;
    for handle in handles {
        if let CycleOutcome::Committed(_) = handle.await.unwrap() {
            committed += 1;
        }
    }

    assert_eq!(committed, 1);
    let snap = orch.snapshot();
    assert_eq!(snap.token, CycleToken(4));
    assert_eq!(snap.selection.as_ref().unwrap().measurement_id, HEMOGLOBIN);
    assert_eq!(snap.phase, RefreshPhase::Ready);
}

// ============================================================================
// Export
// ============================================================================

#[tokio::test]
async fn test_export_committed_box_plot() {
    let orch = orchestrator(StubHttpClient::backend());
    orch.select(Selection::new("diabetes", HEMOGLOBIN)).await;

    let surface = BoxPlotSurface::from_snapshot(&orch.snapshot()).unwrap();
    let exporter = StandardExporter::default();

    let png = exporter.export_png(&surface).unwrap();
    assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));

    let pdf = exporter.export_pdf(&surface).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
}
