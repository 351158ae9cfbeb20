//! The client-side controller: owns the snapshot and list view, drives the
//! gateway, and exposes the request flags a front end renders.

use crate::duplicates::DuplicateChecker;
use crate::error::ClientError;
use crate::gateway::ClientGateway;
use crate::model::{ClientCandidate, ClientId, ClientRecord, NewClient};
use crate::rules::{Field, RuleSet, ValidationReport, Violation, ViolationKind};
use crate::view::{ListView, PageLink, PageSummary};
use tracing::{debug, info, warn};

pub const DELETE_FAILED: &str = "Failed to delete client. The list has been refreshed.";

/// Request flags and the page-level error banner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub loading: bool,
    pub submitting: bool,
    /// Id of the record whose delete is in flight.
    pub deleting: Option<ClientId>,
    pub error: Option<String>,
}

impl UiState {
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.loading || self.submitting || self.deleting.is_some()
    }
}

#[derive(Debug)]
pub struct ClientDirectory<G> {
    gateway: G,
    rules: RuleSet,
    view: ListView,
    ui: UiState,
}

impl<G: ClientGateway> ClientDirectory<G> {
    pub fn new(gateway: G, rules: RuleSet, page_size: usize) -> Self {
        Self { gateway, rules, view: ListView::new(page_size), ui: UiState::default() }
    }

    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub const fn view(&self) -> &ListView {
        &self.view
    }

    pub const fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn clear_error(&mut self) {
        self.ui.error = None;
    }

    /// Replaces the snapshot with the gateway's current records.
    ///
    /// # Errors
    /// Returns the gateway error after recording it in [`UiState::error`].
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.ui.loading = true;
        self.ui.error = None;
        let result = self.gateway.list().await;
        self.ui.loading = false;

        match result {
            Ok(records) => {
                debug!(count = records.len(), "Snapshot refreshed");
                self.view.replace(records);
                Ok(())
            },
            Err(err) => {
                warn!(error = %err, "Failed to load clients");
                self.ui.error = Some(err.to_string());
                Err(err)
            },
        }
    }

    /// Validates `candidate`, rejects collisions with the snapshot, then creates
    /// the record and reloads the list.
    ///
    /// Field failures are returned as [`ClientError::Validation`] or
    /// [`ClientError::DuplicateKey`] and leave the banner untouched.
    ///
    /// # Errors
    /// Field failures before any gateway call, or the gateway's error.
    pub async fn create(
        &mut self,
        candidate: &ClientCandidate,
    ) -> Result<ClientRecord, ClientError> {
        let client = self.prepare(candidate)?;

        self.ui.submitting = true;
        self.ui.error = None;
        let result = self.gateway.create(client).await;
        self.ui.submitting = false;

        let record = match result {
            Ok(record) => record,
            Err(err) => {
                if err.field_errors().is_none() {
                    self.ui.error = Some(err.to_string());
                }
                return Err(err);
            },
        };

        info!(id = %record.id, "Client created");
        if let Err(err) = self.refresh().await {
            debug!(error = %err, "Reload after create failed");
        }
        Ok(record)
    }

    /// Deletes `id`. On success the record is dropped from the snapshot and the
    /// page re-clamped. A missing record triggers a reload and a generic banner.
    ///
    /// # Errors
    /// Returns the gateway error.
    pub async fn delete(&mut self, id: &ClientId) -> Result<(), ClientError> {
        self.ui.deleting = Some(id.clone());
        self.ui.error = None;
        let result = self.gateway.delete(id).await;
        self.ui.deleting = None;

        match result {
            Ok(()) => {
                self.view.remove(id);
                info!(%id, "Client deleted");
                Ok(())
            },
            Err(err @ ClientError::NotFound { .. }) => {
                warn!(%id, "Client vanished before delete");
                if let Err(err) = self.refresh().await {
                    debug!(error = %err, "Reload after failed delete failed");
                }
                self.ui.error.get_or_insert_with(|| DELETE_FAILED.to_owned());
                Err(err)
            },
            Err(err) => {
                self.ui.error = Some(err.to_string());
                Err(err)
            },
        }
    }

    /// Checks one field the way a form does while typing: rules first, then collisions.
    ///
    /// # Errors
    /// The first [`Violation`] for the field.
    pub fn check_field(&self, field: Field, raw: &str) -> Result<(), Violation> {
        self.rules.validate_field(field, raw)?;
        let collides = match field {
            Field::Name => self.name_exists(raw),
            Field::Email => self.email_exists(raw),
            Field::Phone => self.phone_exists(raw),
        };
        if collides {
            let reason = match field {
                Field::Name => crate::duplicates::NAME_TAKEN,
                Field::Email => crate::duplicates::EMAIL_TAKEN,
                Field::Phone => crate::duplicates::PHONE_TAKEN,
            };
            return Err(Violation::new(field, ViolationKind::Duplicate, reason));
        }
        Ok(())
    }

    pub fn email_exists(&self, email: &str) -> bool {
        self.checker().email_exists(email)
    }

    pub fn name_exists(&self, name: &str) -> bool {
        self.checker().name_exists(name)
    }

    pub fn phone_exists(&self, phone: &str) -> bool {
        crate::rules::normalize_phone(phone)
            .is_some_and(|phone| self.checker().phone_exists(&phone))
    }

    pub fn search(&self, query: &str) -> Vec<&ClientRecord> {
        self.view.search(query)
    }

    pub fn set_page(&mut self, page: usize) -> usize {
        self.view.set_page(page)
    }

    pub fn page(&self) -> &[ClientRecord] {
        self.view.page()
    }

    pub fn page_links(&self) -> Vec<PageLink> {
        self.view.page_links()
    }

    pub fn summary(&self) -> PageSummary {
        self.view.summary()
    }

    fn checker(&self) -> DuplicateChecker<'_> {
        DuplicateChecker::new(self.view.snapshot().records())
    }

    /// Rule violations win over collisions on the same field.
    fn prepare(&self, candidate: &ClientCandidate) -> Result<NewClient, ValidationReport> {
        let checker = self.checker();
        match self.rules.validate(candidate) {
            Ok(client) => {
                let collisions = checker.check(&client);
                if collisions.is_empty() {
                    Ok(client)
                } else {
                    Err(collisions.into_iter().collect())
                }
            },
            Err(mut report) => {
                for violation in checker.check_candidate(candidate) {
                    report.push(violation);
                }
                Err(report)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;

    async fn seeded() -> ClientDirectory<MemoryGateway> {
        let mut directory = ClientDirectory::new(MemoryGateway::new(), RuleSet::standard(), 2);
        for (name, email) in
            [("Ana Pérez", "ana@x.com"), ("Luis Gómez", "luis@y.org"), ("Marta Ruiz", "marta@z.es")]
        {
            directory.create(&ClientCandidate::new(name, email)).await.unwrap();
        }
        directory
    }

    #[tokio::test]
    async fn created_records_appear_first() {
        let directory = seeded().await;
        assert_eq!(directory.view().total_items(), 3);
        assert_eq!(directory.page()[0].name, "Marta Ruiz");
        assert_eq!(directory.ui(), &UiState::default());
    }

    #[tokio::test]
    async fn rule_failures_keep_collisions_for_other_fields() {
        let mut directory = seeded().await;
        let candidate = ClientCandidate::new("Ana Pérez", "broken");
        let err = directory.create(&candidate).await.unwrap_err();
        let report = err.field_errors().unwrap();
        assert_eq!(report.get(Field::Name).map(|v| v.kind), Some(ViolationKind::Duplicate));
        assert_eq!(report.get(Field::Email).map(|v| v.kind), Some(ViolationKind::Format));
        assert_eq!(directory.gateway().len(), 3);
    }

    #[tokio::test]
    async fn deleting_the_last_item_reclamps_the_page() {
        let mut directory = seeded().await;
        assert_eq!(directory.set_page(2), 2);
        let last = directory.page()[0].id.clone();

        directory.delete(&last).await.unwrap();
        assert_eq!(directory.view().current_page(), 1);
        assert_eq!(directory.view().total_pages(), 1);
        assert!(directory.view().snapshot().get(&last).is_none());
    }

    #[tokio::test]
    async fn unknown_delete_refreshes_and_sets_banner() {
        let mut directory = seeded().await;
        let err = directory.delete(&ClientId::from("missing00000")).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound { .. }));
        assert_eq!(directory.ui().error.as_deref(), Some(DELETE_FAILED));
        assert_eq!(directory.view().total_items(), 3);

        directory.clear_error();
        assert!(directory.ui().error.is_none());
    }

    #[tokio::test]
    async fn check_field_reports_collisions_after_rules() {
        let directory = seeded().await;
        assert_eq!(
            directory.check_field(Field::Email, "ANA@x.com").map_err(|v| v.kind),
            Err(ViolationKind::Duplicate)
        );
        assert_eq!(
            directory.check_field(Field::Email, "ana@").map_err(|v| v.kind),
            Err(ViolationKind::Format)
        );
        assert!(directory.check_field(Field::Email, "nuevo@x.com").is_ok());
    }
}
