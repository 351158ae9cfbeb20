//! JSON framing shared by the REST server and its HTTP clients.
//!
//! Success: `{ "success": true, "message": "...", "data": ... }`.
//! Failure: `{ "success": false, "message": "...", "error": "...", "errors": { field: reason } }`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name to human readable reason.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Machine readable failure code or redacted internal detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: Option<T>) -> Self {
        Self { success: true, message: message.into(), data, error: None, errors: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), data: None, error: None, errors: None }
    }
}
