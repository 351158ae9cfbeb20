//! Record shapes exchanged with the gateways.
//!
//! Wire names follow the public resource (`nombre`, `telefono`); the English
//! names are accepted as aliases on input.

use chrono::{DateTime, Utc};
use rolo_kernel::safe_nanoid;
use serde::{Deserialize, Serialize};
use std::fmt;

const ID_LEN: usize = 12;

/// Store-assigned identity of a client record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    #[must_use]
    pub fn generate() -> Self {
        Self(safe_nanoid!(ID_LEN))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `false` for ids no store could have produced.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        rolo_kernel::is_safe_nanoid(&self.0, ID_LEN)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ClientId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ClientId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// A persisted client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct ClientRecord {
    pub id: ClientId,
    #[serde(rename = "nombre", alias = "name")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono", alias = "phone", default)]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ClientRecord {
    /// Case-insensitive substring match on name, email or phone.
    ///
    /// `needle` must already be trimmed and lower-cased.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
            || self.phone.as_deref().is_some_and(|phone| phone.to_lowercase().contains(needle))
    }
}

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct ClientCandidate {
    #[serde(rename = "nombre", alias = "name", default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "telefono", alias = "phone", default)]
    pub phone: Option<String>,
}

impl ClientCandidate {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into(), phone: None }
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// A normalized candidate that passed every rule.
///
/// Only [`RuleSet::validate`](crate::rules::RuleSet::validate) builds one, so a
/// gateway can never be handed unchecked input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewClient {
    #[serde(rename = "nombre")]
    name: String,
    email: String,
    #[serde(rename = "telefono")]
    phone: Option<String>,
}

impl NewClient {
    pub(crate) const fn new(name: String, email: String, phone: Option<String>) -> Self {
        Self { name, email, phone }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Turns the validated input into a stored record.
    #[must_use]
    pub fn into_record(self, id: ClientId, created_at: DateTime<Utc>) -> ClientRecord {
        ClientRecord { id, name: self.name, email: self.email, phone: self.phone, created_at }
    }
}
