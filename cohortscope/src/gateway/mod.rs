//! Remote data gateway.
//!
//! Fetches cohort counts, age/sex rows and outcome rows from the cohort REST
//! backend. Responses are validated row by row at this boundary, so callers
//! only ever see typed rows.
//!
//! # Endpoints
//!
//! | Request | Result |
//! |---|---|
//! | `GET /cohort/{disease}/patients` | [`CohortCounts`](crate::cohort::CohortCounts) |
//! | `GET /cohort/{disease}/age-sex` | `{ rows: AgeSexRow[] }` |
//! | `GET /cohort/{disease}/outcomes?measurement_id={id}` | `{ rows: OutcomeRow[] }` |
//! | `GET /health` | `{ status }` |
//! | `GET /diseases` | `{ diseases: [{key, label}] }` |

mod client;
mod error;
mod http;
mod wire;

pub use client::{CohortGateway, HttpCohortGateway};
pub use error::GatewayError;
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use wire::{parse_rows, ParsedRows};
