//! Facade crate for the Rolo slices and shared modules.
//! Re-exports domain/kernel primitives and aggregates slice initialization.
//! Keep this crate thin: it composes other crates, it does not implement business logic.
//!
//! ## Usage
//! - Add `rolo` with the desired feature flags (`server`/`client`).
//! - Call [`init`] (server) to register the slices, after connecting the database
//!   with [`migrations`] applied.

pub use rolo_domain as domain;
pub use rolo_kernel as kernel;

#[cfg(feature = "server")]
use rolo_clients::{ClientError, ClientGateway, MemoryGateway, SurrealGateway};
#[cfg(feature = "server")]
use rolo_database::{Database, Migration};
#[cfg(feature = "server")]
use rolo_domain::config::{ApiConfig, StoreKind};
#[cfg(feature = "server")]
use std::sync::Arc;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use rolo_clients::api::router as clients_router;
        pub use rolo_kernel::server::system_router;
    }
}

/// Slice registry for runtime introspection.
pub mod features {
    pub use rolo_clients as clients;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "clients",
        #[cfg(feature = "server")]
        "server",
        #[cfg(feature = "client")]
        "client",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Schema migrations of every slice, in application order.
#[cfg(feature = "server")]
#[must_use]
pub fn migrations() -> Vec<Migration> {
    rolo_clients::MIGRATIONS.to_vec()
}

/// Picks the record store configured under `directory.store`.
///
/// # Errors
/// Returns [`ClientError::Internal`] if the `SurrealDB` store is selected without a connection.
#[cfg(feature = "server")]
pub fn clients_gateway(
    config: &ApiConfig,
    database: Option<&Database>,
) -> Result<Arc<dyn ClientGateway>, ClientError> {
    match (config.directory.store, database) {
        (StoreKind::Memory, _) => {
            tracing::warn!("Using the in-memory client store; records are lost on restart");
            Ok(Arc::new(MemoryGateway::new()))
        },
        (StoreKind::Surreal, Some(db)) => Ok(Arc::new(SurrealGateway::new(db.clone()))),
        (StoreKind::Surreal, None) => {
            Err("directory.store = \"surreal\" requires a database connection".into())
        },
    }
}

/// Initialize all enabled slices for server mode.
///
/// # Errors
/// Returns an error if any slice initialization fails.
#[cfg(feature = "server")]
pub fn init(
    config: &ApiConfig,
    database: Option<&Database>,
) -> Result<Vec<domain::registry::InitializedSlice>, ClientError> {
    let mut slices = Vec::new();

    // Clients
    let gateway = clients_gateway(config, database)?;
    slices.push(features::clients::init(&config.directory, gateway)?);

    Ok(slices)
}
