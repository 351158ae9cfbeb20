//! # Clients
//!
//! The client directory feature slice. Pure rule tables, duplicate checks and the
//! paginated list view sit at the bottom; the [`ClientGateway`] trait abstracts the
//! store; [`ClientDirectory`] ties them together for front ends.
//!
//! Features:
//! * `server`: SurrealDB store and the Axum handlers under `/clientes`.
//! * `client`: the `reqwest` gateway that talks to those handlers.

mod error;

pub mod directory;
pub mod duplicates;
pub mod gateway;
pub mod model;
pub mod rules;
pub mod view;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "client")]
pub mod http;
#[cfg(feature = "server")]
pub mod store;

pub use crate::directory::{ClientDirectory, UiState};
pub use crate::error::{ClientError, ClientErrorExt, DUPLICATE_KEY_CODE, VALIDATION_FAILED_CODE};
pub use crate::gateway::{ClientGateway, MemoryGateway};
pub use crate::model::{ClientCandidate, ClientId, ClientRecord, NewClient};
pub use crate::rules::{Field, RuleSet, ValidationReport, Violation, ViolationKind};
pub use crate::view::{ListView, PageLink, PageSummary};

#[cfg(feature = "client")]
pub use crate::http::HttpGateway;
#[cfg(feature = "server")]
pub use crate::store::{MIGRATIONS, SurrealGateway};

use rolo_kernel::domain::config::DirectoryConfig;
use rolo_kernel::domain::registry::InitializedSlice;
use std::sync::Arc;

/// Client directory state shared by the handlers.
#[rolo_derive::rolo_slice]
pub struct Clients {
    pub gateway: Arc<dyn ClientGateway>,
    pub rules: RuleSet,
    pub page_size: usize,
}

/// Builds the slice around an already connected gateway.
///
/// # Errors
/// Returns [`ClientError::Internal`] for a zero page size.
pub fn init(
    config: &DirectoryConfig,
    gateway: Arc<dyn ClientGateway>,
) -> Result<InitializedSlice, ClientError> {
    if config.page_size == 0 {
        return Err("directory.page_size must be greater than zero".into());
    }

    let rules = RuleSet::with_phone_format(config.phone_format);
    tracing::info!(
        page_size = config.page_size,
        phone_format = ?config.phone_format,
        "Clients slice initialized"
    );

    Ok(InitializedSlice::new(Clients::new(ClientsInner {
        gateway,
        rules,
        page_size: config.page_size,
    })))
}
