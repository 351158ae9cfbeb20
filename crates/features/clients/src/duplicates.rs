//! Advisory collision checks against a snapshot of existing records.
//!
//! The store stays the authority for email uniqueness; these checks only let a
//! caller reject obvious duplicates before a round trip.

use crate::model::{ClientCandidate, ClientRecord, NewClient};
use crate::rules::{
    Field, NAME_MIN_LEN, PHONE_MIN_LEN, Violation, ViolationKind, is_email_format, normalize_email,
    normalize_name, normalize_phone,
};

pub const EMAIL_TAKEN: &str = "This email is already registered";
pub const NAME_TAKEN: &str = "A client with this name already exists";
pub const PHONE_TAKEN: &str = "This phone number is already registered";

#[derive(Debug, Clone, Copy)]
pub struct DuplicateChecker<'a> {
    records: &'a [ClientRecord],
}

impl<'a> DuplicateChecker<'a> {
    #[must_use]
    pub const fn new(records: &'a [ClientRecord]) -> Self {
        Self { records }
    }

    /// Case-insensitive. Malformed emails never collide.
    #[must_use]
    pub fn email_exists(&self, email: &str) -> bool {
        if !is_email_format(email) {
            return false;
        }
        let email = email.trim().to_lowercase();
        self.records.iter().any(|record| record.email.to_lowercase() == email)
    }

    /// Case-insensitive after trimming both sides. Names shorter than two characters never collide.
    #[must_use]
    pub fn name_exists(&self, name: &str) -> bool {
        let name = name.trim();
        if name.chars().count() < NAME_MIN_LEN {
            return false;
        }
        let name = name.to_lowercase();
        self.records.iter().any(|record| record.name.trim().to_lowercase() == name)
    }

    /// Exact comparison. Phones shorter than eight characters never collide.
    #[must_use]
    pub fn phone_exists(&self, phone: &str) -> bool {
        if phone.chars().count() < PHONE_MIN_LEN {
            return false;
        }
        self.records.iter().any(|record| record.phone.as_deref() == Some(phone))
    }

    /// Every field of `client` that collides with the snapshot.
    #[must_use]
    pub fn check(&self, client: &NewClient) -> Vec<Violation> {
        let mut violations = Vec::new();
        if self.name_exists(client.name()) {
            violations.push(Violation::new(Field::Name, ViolationKind::Duplicate, NAME_TAKEN));
        }
        if self.email_exists(client.email()) {
            violations.push(Violation::new(Field::Email, ViolationKind::Duplicate, EMAIL_TAKEN));
        }
        if client.phone().is_some_and(|phone| self.phone_exists(phone)) {
            violations.push(Violation::new(Field::Phone, ViolationKind::Duplicate, PHONE_TAKEN));
        }
        violations
    }

    /// Same as [`Self::check`] for raw input that has not passed validation yet.
    #[must_use]
    pub fn check_candidate(&self, candidate: &ClientCandidate) -> Vec<Violation> {
        let name = normalize_name(&candidate.name);
        let email = normalize_email(&candidate.email);
        let phone = candidate.phone.as_deref().and_then(normalize_phone);
        self.check(&NewClient::new(name, email, phone))
    }
}
