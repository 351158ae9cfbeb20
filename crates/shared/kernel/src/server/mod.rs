//! Shared HTTP plumbing: application state, the JSON envelope and system routes.

mod health;
mod response;
mod router;
mod state;

pub use response::{ApiFailure, ApiResponse, FieldErrors, GENERIC_INTERNAL_ERROR};
pub use router::system_router;
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateErrorExt, ApiStateInner};
