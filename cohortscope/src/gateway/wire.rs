//! Row-level validation of gateway responses.
//!
//! Row responses arrive as `{ "rows": [...] }`. Each row is validated
//! independently against its typed schema; rows that fail are dropped and
//! counted instead of failing the whole response. Only a broken envelope is
//! an error.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;
use tracing::{debug, trace};

use super::error::GatewayError;
use crate::catalog::Disease;

/// Rows that survived validation, plus how many were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRows<T> {
    pub rows: Vec<T>,
    pub dropped: usize,
}

/// Parse a `{ "rows": [...] }` envelope, validating each row.
///
/// A missing or null `rows` field is treated as an empty list. Anything
/// other than a JSON object at the top level, or a non-array `rows`, is a
/// [`GatewayError::Json`].
pub fn parse_rows<T: DeserializeOwned>(
    body: &[u8],
    endpoint: &str,
) -> Result<ParsedRows<T>, GatewayError> {
    // Rows stay unparsed here so a bad number only fails its own row.
    let mut fields: HashMap<String, Box<RawValue>> = serde_json::from_slice(body)
        .map_err(|e| GatewayError::Json(format!("{}: expected a JSON object: {}", endpoint, e)))?;

    let items: Vec<Box<RawValue>> = match fields.remove("rows") {
        None => Vec::new(),
        Some(raw) if raw.get().trim() == "null" => Vec::new(),
        Some(raw) => serde_json::from_str(raw.get()).map_err(|_| {
            GatewayError::Json(format!("{}: `rows` is not an array", endpoint))
        })?,
    };

    let total = items.len();
    let mut rows = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_str::<T>(item.get()) {
            Ok(row) => rows.push(row),
            Err(e) => trace!(endpoint, index, error = %e, "Dropping malformed row"),
        }
    }

    let dropped = total - rows.len();
    if dropped > 0 {
        debug!(endpoint, total, dropped, "Dropped malformed rows");
    }

    Ok(ParsedRows { rows, dropped })
}

/// Parse a single JSON document into `T`.
pub fn parse_json<T: DeserializeOwned>(body: &[u8], endpoint: &str) -> Result<T, GatewayError> {
    serde_json::from_slice(body).map_err(|e| GatewayError::Json(format!("{}: {}", endpoint, e)))
}

/// `GET /health` body.
#[derive(Debug, Deserialize)]
pub(crate) struct HealthResponse {
    pub status: String,
}

/// `GET /diseases` body.
#[derive(Debug, Deserialize)]
pub(crate) struct DiseasesResponse {
    #[serde(default)]
    pub diseases: Vec<Disease>,
}
