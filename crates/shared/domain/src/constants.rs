//! Names shared by the server, the stores and the API documentation.

pub const APP_NAME: &str = "rolo";

/// Mount point of the versioned REST API.
pub const API_PREFIX: &str = "/api/v1";
/// Collection path of the client resource, relative to [`API_PREFIX`].
pub const CLIENTS_PATH: &str = "/clientes";

pub const SYSTEM_TAG: &str = "System";
pub const CLIENTS_TAG: &str = "Clients";

pub const CLIENT_TABLE: &str = "client";
pub const CLIENTS_SLICE: &str = "clients";
