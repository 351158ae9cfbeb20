//! # Record Gateway
//!
//! Create, list and delete against whatever holds the records. The core logic only
//! sees this trait; the memory store, the SurrealDB store and the HTTP client all
//! implement it.

use crate::error::ClientError;
use crate::model::{ClientId, ClientRecord, NewClient};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, instrument};

#[async_trait]
pub trait ClientGateway: Debug + Send + Sync {
    /// Every record, newest first.
    async fn list(&self) -> Result<Vec<ClientRecord>, ClientError>;

    /// Persists `client`. Fails with [`ClientError::DuplicateKey`] if the email is taken.
    async fn create(&self, client: NewClient) -> Result<ClientRecord, ClientError>;

    /// Fails with [`ClientError::NotFound`] for unknown ids.
    async fn delete(&self, id: &ClientId) -> Result<(), ClientError>;
}

#[async_trait]
impl<G: ClientGateway + ?Sized> ClientGateway for Arc<G> {
    async fn list(&self) -> Result<Vec<ClientRecord>, ClientError> {
        (**self).list().await
    }

    async fn create(&self, client: NewClient) -> Result<ClientRecord, ClientError> {
        (**self).create(client).await
    }

    async fn delete(&self, id: &ClientId) -> Result<(), ClientError> {
        (**self).delete(id).await
    }
}

/// Process-local store. Writers are serialized, so email uniqueness holds under concurrency.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    records: RwLock<Vec<ClientRecord>>,
}

impl MemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store. Records are reordered newest first.
    #[must_use]
    pub fn with_records(mut records: Vec<ClientRecord>) -> Self {
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { records: RwLock::new(records) }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl ClientGateway for MemoryGateway {
    async fn list(&self) -> Result<Vec<ClientRecord>, ClientError> {
        Ok(self.records.read().clone())
    }

    #[instrument(skip_all, fields(email = %client.email()))]
    async fn create(&self, client: NewClient) -> Result<ClientRecord, ClientError> {
        let mut records = self.records.write();
        let email = client.email().to_lowercase();
        if records.iter().any(|record| record.email.to_lowercase() == email) {
            return Err(ClientError::duplicate_email());
        }

        let record = client.into_record(ClientId::generate(), Utc::now());
        records.insert(0, record.clone());
        debug!(id = %record.id, "Client stored in memory");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &ClientId) -> Result<(), ClientError> {
        let mut records = self.records.write();
        let index = records
            .iter()
            .position(|record| &record.id == id)
            .ok_or_else(|| ClientError::not_found(id))?;
        records.remove(index);
        Ok(())
    }
}
