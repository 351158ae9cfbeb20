//! SurrealDB-backed record store.
//!
//! Records live in the `client` table. `uid` carries the public [`ClientId`];
//! unique indexes on `uid` and `email` make the database the authority on
//! duplicates, so concurrent creates cannot both succeed.

use crate::error::ClientError;
use crate::gateway::ClientGateway;
use crate::model::{ClientId, ClientRecord, NewClient};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rolo_database::{Database, DatabaseError, DatabaseErrorExt, Migration};
use rolo_kernel::domain::constants::CLIENTS_SLICE;
use surrealdb::types::SurrealValue;
use tracing::{debug, instrument, warn};

const SCHEMA: &str = "DEFINE TABLE IF NOT EXISTS client SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS client_uid ON client FIELDS uid UNIQUE;
    DEFINE INDEX IF NOT EXISTS client_email ON client FIELDS email UNIQUE;
    DEFINE INDEX IF NOT EXISTS client_created ON client FIELDS created_at;";

/// Schema migrations owned by the clients slice.
pub const MIGRATIONS: [Migration; 1] = [Migration::new(CLIENTS_SLICE, "0001_client_table", SCHEMA)];

const EMAIL_INDEX: &str = "client_email";
const LIST_CLIENTS: &str =
    "SELECT uid, name, email, phone, created_at FROM client ORDER BY created_at DESC";

#[derive(Debug, SurrealValue)]
struct ClientRow {
    uid: String,
    name: String,
    email: String,
    phone: Option<String>,
    /// Microseconds since the Unix epoch.
    created_at: i64,
}

impl TryFrom<ClientRow> for ClientRecord {
    type Error = ClientError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        let created_at = DateTime::<Utc>::from_timestamp_micros(row.created_at).ok_or_else(|| {
            ClientError::Internal {
                message: format!("Invalid timestamp {} on client {}", row.created_at, row.uid)
                    .into(),
                context: Some("Decoding client row".into()),
            }
        })?;

        Ok(Self {
            id: ClientId::from(row.uid),
            name: row.name,
            email: row.email,
            phone: row.phone,
            created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SurrealGateway {
    db: Database,
}

impl SurrealGateway {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClientGateway for SurrealGateway {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<ClientRecord>, ClientError> {
        let rows = self
            .db
            .query(LIST_CLIENTS)
            .await
            .context("Listing clients")?
            .take::<Vec<ClientRow>>(0)
            .context("Decoding clients")?;

        debug!(count = rows.len(), "Clients loaded");
        rows.into_iter().map(ClientRecord::try_from).collect()
    }

    #[instrument(skip_all, fields(email = %client.email()))]
    async fn create(&self, client: NewClient) -> Result<ClientRecord, ClientError> {
        let record = client.into_record(ClientId::generate(), Utc::now());

        let checked = self
            .db
            .query(
                "CREATE client SET uid = $uid, name = $name, email = $email, phone = $phone, \
                 created_at = $created_at",
            )
            .bind(("uid", record.id.to_string()))
            .bind(("name", record.name.clone()))
            .bind(("email", record.email.clone()))
            .bind(("phone", record.phone.clone()))
            .bind(("created_at", record.created_at.timestamp_micros()))
            .await
            .context("Creating client")?
            .check()
            .map_err(surrealdb::Error::from);

        if let Err(err) = checked {
            if is_email_conflict(&err) {
                warn!("Email already stored");
                return Err(ClientError::duplicate_email());
            }
            return Err(DatabaseError::from(err).into());
        }

        debug!(id = %record.id, "Client stored");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &ClientId) -> Result<(), ClientError> {
        let existing = self
            .db
            .query("SELECT VALUE uid FROM client WHERE uid = $uid; DELETE client WHERE uid = $uid;")
            .bind(("uid", id.to_string()))
            .await
            .context("Deleting client")?
            .take::<Vec<String>>(0)
            .context("Decoding deleted client")?;

        if existing.is_empty() {
            return Err(ClientError::not_found(id));
        }
        Ok(())
    }
}

fn is_email_conflict(err: &surrealdb::Error) -> bool {
    let message = err.to_string();
    message.contains(EMAIL_INDEX) && message.contains("already contains")
}
