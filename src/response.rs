//! Bridge multi-status responses and their reconciliation.
//!
//! A state-change PUT answers with a JSON array in which every element
//! reports success or failure for one requested attribute. The functions
//! here collapse that array into a single aggregated result or a single
//! authoritative error.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Attribute paths mapped to the values the bridge reports having applied.
pub type AppliedChanges = HashMap<String, Value>;

/// A structured error reported by the bridge itself.
///
/// Passed through to the caller verbatim as the authoritative failure
/// reason; the numeric `kind` is the bridge's error type code.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub address: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: u16,
}

/// One entry of the bridge's multi-status response array.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponseItem {
    success: Option<AppliedChanges>,
    error: Option<ApiError>,
}

/// Aggregate a multi-status response into one map of applied changes.
///
/// The bridge must emit at least one item per request; an empty array is a
/// protocol violation. The first item carrying an error short-circuits the
/// aggregation and discards any successes collected so far. Duplicate
/// attribute paths across items overwrite in array order.
pub(crate) fn reconcile(items: Vec<ApiResponseItem>) -> Result<AppliedChanges> {
    if items.is_empty() {
        return Err(Error::NotSuccessful);
    }

    let mut applied = AppliedChanges::new();
    for item in items {
        if let Some(error) = item.error {
            return Err(Error::Bridge(error));
        }
        match item.success {
            Some(changes) => applied.extend(changes),
            None => return Err(Error::NotSuccessful),
        }
    }
    Ok(applied)
}

/// Reconcile a response that must consist of exactly one item.
///
/// Used for single-result operations such as renaming a light, where a
/// different item count is itself a protocol violation regardless of the
/// items' content.
pub(crate) fn reconcile_single(items: Vec<ApiResponseItem>) -> Result<AppliedChanges> {
    if items.len() != 1 {
        return Err(Error::UnexpectedResponseCount {
            expected: 1,
            actual: items.len(),
        });
    }
    reconcile(items)
}
