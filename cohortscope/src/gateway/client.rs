//! Cohort gateway trait and HTTP implementation.
//!
//! The [`CohortGateway`] trait is the seam the refresh orchestrator fetches
//! through. [`HttpCohortGateway`] talks to the REST backend using any
//! [`AsyncHttpClient`], so tests can run it against canned responses.

use std::future::Future;

use reqwest::Url;
use tracing::debug;

use super::error::GatewayError;
use super::http::AsyncHttpClient;
use super::wire::{parse_json, parse_rows, DiseasesResponse, HealthResponse};
use crate::catalog::Disease;
use crate::cohort::{AgeSexRow, CohortCounts, OutcomeRow};

/// Read-only access to the remote cohort backend.
///
/// All operations are idempotent and side-effect free.
pub trait CohortGateway: Send + Sync {
    /// `GET /cohort/{disease}/patients`
    fn cohort_counts(
        &self,
        disease_key: &str,
    ) -> impl Future<Output = Result<CohortCounts, GatewayError>> + Send;

    /// `GET /cohort/{disease}/age-sex`
    fn age_sex_rows(
        &self,
        disease_key: &str,
    ) -> impl Future<Output = Result<Vec<AgeSexRow>, GatewayError>> + Send;

    /// `GET /cohort/{disease}/outcomes?measurement_id={id}`
    fn outcome_rows(
        &self,
        disease_key: &str,
        measurement_id: i64,
    ) -> impl Future<Output = Result<Vec<OutcomeRow>, GatewayError>> + Send;

    /// `GET /health`, returning the reported status string.
    fn health(&self) -> impl Future<Output = Result<String, GatewayError>> + Send;

    /// `GET /diseases`
    fn diseases(&self) -> impl Future<Output = Result<Vec<Disease>, GatewayError>> + Send;
}

/// Gateway backed by the cohort REST API.
pub struct HttpCohortGateway<C: AsyncHttpClient> {
    http: C,
    base_url: Url,
    outcome_limit: Option<u32>,
}

impl<C: AsyncHttpClient> HttpCohortGateway<C> {
    /// Create a gateway rooted at `base_url` (e.g. `http://localhost:8000`).
    pub fn new(http: C, base_url: &str) -> Result<Self, GatewayError> {
        let base_url =
            Url::parse(base_url).map_err(|e| GatewayError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            http,
            base_url,
            outcome_limit: None,
        })
    }

    /// Cap the number of outcome rows the backend returns.
    pub fn with_outcome_limit(mut self, limit: Option<u32>) -> Self {
        self.outcome_limit = limit;
        self
    }

    /// The base URL requests are built from.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments.
    ///
    /// Segments are percent-encoded, so a disease key cannot escape its
    /// path position.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl<C: AsyncHttpClient> CohortGateway for HttpCohortGateway<C> {
    async fn cohort_counts(&self, disease_key: &str) -> Result<CohortCounts, GatewayError> {
        let url = self.endpoint(&["cohort", disease_key, "patients"])?;
        let body = self.http.get(url.as_str()).await?;
        let counts: CohortCounts = parse_json(&body, "patients")?;

        debug!(
            disease = disease_key,
            cases = counts.case_count,
            controls = counts.control_count,
            "Cohort counts fetched"
        );
        Ok(counts)
    }

    async fn age_sex_rows(&self, disease_key: &str) -> Result<Vec<AgeSexRow>, GatewayError> {
        let url = self.endpoint(&["cohort", disease_key, "age-sex"])?;
        let body = self.http.get(url.as_str()).await?;
        let parsed = parse_rows::<AgeSexRow>(&body, "age-sex")?;

        debug!(
            disease = disease_key,
            rows = parsed.rows.len(),
            dropped = parsed.dropped,
            "Age/sex rows fetched"
        );
        Ok(parsed.rows)
    }

    async fn outcome_rows(
        &self,
        disease_key: &str,
        measurement_id: i64,
    ) -> Result<Vec<OutcomeRow>, GatewayError> {
        let mut url = self.endpoint(&["cohort", disease_key, "outcomes"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("measurement_id", &measurement_id.to_string());
            if let Some(limit) = self.outcome_limit {
                query.append_pair("limit", &limit.to_string());
            }
        }

        let body = self.http.get(url.as_str()).await?;
        let parsed = parse_rows::<OutcomeRow>(&body, "outcomes")?;

        debug!(
            disease = disease_key,
            measurement_id,
            rows = parsed.rows.len(),
            dropped = parsed.dropped,
            "Outcome rows fetched"
        );
        Ok(parsed.rows)
    }

    async fn health(&self) -> Result<String, GatewayError> {
        let url = self.endpoint(&["health"])?;
        let body = self.http.get(url.as_str()).await?;
        let health: HealthResponse = parse_json(&body, "health")?;
        Ok(health.status)
    }

    async fn diseases(&self) -> Result<Vec<Disease>, GatewayError> {
        let url = self.endpoint(&["diseases"])?;
        let body = self.http.get(url.as_str()).await?;
        let response: DiseasesResponse = parse_json(&body, "diseases")?;
        Ok(response.diseases)
    }
}
