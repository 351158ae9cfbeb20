use crate::envelope::Envelope;
pub use crate::envelope::FieldErrors;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt::Display;
use tracing::error;

/// Replaces internal error text in 500 responses unless debug mode is on.
pub const GENERIC_INTERNAL_ERROR: &str = "Internal server error";

/// A successful reply: status code plus `{ success: true, message, data? }`.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    body: Envelope<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self { status: StatusCode::OK, body: Envelope::success(message, Some(data)) }
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self { status: StatusCode::CREATED, body: Envelope::success(message, Some(data)) }
    }
}

impl ApiResponse<()> {
    /// 200 with a message and no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self { status: StatusCode::OK, body: Envelope::success(message, None) }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// A failed reply: status code plus `{ success: false, message, error?, errors? }`.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    body: Envelope<()>,
}

impl ApiFailure {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, body: Envelope::failure(message) }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 422 carrying a failure code and the per-field reasons.
    pub fn unprocessable(message: impl Into<String>, code: &str, errors: FieldErrors) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message).with_code(code).with_errors(errors)
    }

    /// 500. `detail` is logged and only echoed to the caller when `debug` is set.
    pub fn internal(message: impl Into<String>, detail: impl Display, debug: bool) -> Self {
        let detail = detail.to_string();
        error!(%detail, "Request failed with an internal error");
        let error = if debug { detail } else { GENERIC_INTERNAL_ERROR.to_owned() };
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message).with_code(error)
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.body.error = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.body.errors = Some(errors);
        self
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub const fn body(&self) -> &Envelope<()> {
        &self.body
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_detail_is_redacted_outside_debug() {
        let failure = ApiFailure::internal("Failed to create client", "disk on fire", false);
        assert_eq!(failure.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failure.body().error.as_deref(), Some(GENERIC_INTERNAL_ERROR));
        assert!(!failure.body().success);
    }

    #[test]
    fn internal_detail_is_echoed_in_debug() {
        let failure = ApiFailure::internal("Failed to create client", "disk on fire", true);
        assert_eq!(failure.body().error.as_deref(), Some("disk on fire"));
    }

    #[test]
    fn unprocessable_carries_field_errors() {
        let errors = FieldErrors::from([("email".to_owned(), "Email is required".to_owned())]);
        let failure = ApiFailure::unprocessable("Validation failed", "validation_failed", errors);
        assert_eq!(failure.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(failure.body().error.as_deref(), Some("validation_failed"));
        assert_eq!(failure.body().errors.as_ref().map(FieldErrors::len), Some(1));
    }
}
