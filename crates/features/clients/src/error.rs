use crate::rules::{Field, ValidationReport};
use std::borrow::Cow;

/// Envelope `error` code for field rule failures.
pub const VALIDATION_FAILED_CODE: &str = "validation_failed";
/// Envelope `error` code for a unique value already held by the store.
pub const DUPLICATE_KEY_CODE: &str = "duplicate_key";

/// Failures of the client directory, grouped by where they are recovered.
#[rolo_derive::rolo_error]
pub enum ClientError {
    /// One or more fields broke a rule. Recovered per field by the caller.
    #[error("Validation failed{}: {report}", format_context(.context))]
    Validation { report: ValidationReport, context: Option<Cow<'static, str>> },

    /// The store already holds a record with this unique value.
    #[error("Duplicate {field}{}: {message}", format_context(.context))]
    DuplicateKey { field: Field, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Network or protocol failure talking to the gateway.
    #[error("Transport error{}: {message}", format_context(.context))]
    Transport { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Client not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[cfg(feature = "server")]
    #[error("Storage error{}: {source}", format_context(.context))]
    Storage { source: rolo_database::DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Internal client directory error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ClientError {
    pub(crate) fn duplicate_email() -> Self {
        Self::DuplicateKey {
            field: Field::Email,
            message: crate::duplicates::EMAIL_TAKEN.into(),
            context: None,
        }
    }

    pub(crate) fn not_found(id: &crate::model::ClientId) -> Self {
        Self::NotFound { message: id.to_string().into(), context: None }
    }

    /// Field level failures, if this error carries any.
    #[must_use]
    pub fn field_errors(&self) -> Option<ValidationReport> {
        match self {
            Self::Validation { report, .. } => Some(report.clone()),
            Self::DuplicateKey { field, message, .. } => Some(ValidationReport::single(
                *field,
                crate::rules::ViolationKind::Duplicate,
                message.clone(),
            )),
            _ => None,
        }
    }
}

impl From<ValidationReport> for ClientError {
    fn from(report: ValidationReport) -> Self {
        Self::Validation { report, context: None }
    }
}
