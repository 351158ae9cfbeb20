//! # Validation Engine
//!
//! Field rules are declared as ordered tables of named predicates. Within a field the
//! first failing rule is reported; fields are evaluated independently, so one report can
//! carry a violation for every field at once.
//!
//! Every value is normalized before its rules run:
//!
//! * name: trimmed, lower-cased, then every word title-cased (`"  ANA  pérez"` → `"Ana  Pérez"`).
//! * email: trimmed and lower-cased.
//! * phone: trimmed; an empty result means "no phone". The phone rules see the text as
//!   typed, so letters are a format violation. [`strip_phone`] is the server-side pass
//!   that drops foreign characters before validation.

use crate::model::{ClientCandidate, NewClient};
use regex::Regex;
use rolo_kernel::domain::config::PhoneFormat;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 255;
pub const EMAIL_MAX_LEN: usize = 255;
pub const PHONE_MIN_LEN: usize = 8;
pub const PHONE_MAX_LEN: usize = 20;
/// A name may repeat one character at most this many times in a row.
pub const NAME_MAX_RUN: usize = 3;
/// A phone may repeat one digit at most this many times in a row.
pub const PHONE_MAX_RUN: usize = 4;

static NAME_CHARSET: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zÁÉÍÓÚáéíóúñÑ\s]+$").ok());
static EMAIL_FORMAT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());
static PHONE_PERMISSIVE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-\s()]+$").ok());
static PHONE_STRICT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[0-9]+$").ok());

fn is_match(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(value))
}

/// Form fields, named on the wire as in the public resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "nombre")]
    Name,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "telefono")]
    Phone,
}

impl Field {
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Phone];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "nombre",
            Self::Email => "email",
            Self::Phone => "telefono",
        }
    }

    /// Accepts wire names and their English spellings.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "nombre" | "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "telefono" | "phone" => Some(Self::Phone),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    Required,
    Length,
    Format,
    Quality,
    Duplicate,
}

/// A failed rule: which field, what kind of failure, and a reason a person can read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: Field,
    pub kind: ViolationKind,
    pub reason: Cow<'static, str>,
}

impl Violation {
    pub fn new(field: Field, kind: ViolationKind, reason: impl Into<Cow<'static, str>>) -> Self {
        Self { field, kind, reason: reason.into() }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// At most one violation per field, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: BTreeMap<Field, Violation>,
}

impl ValidationReport {
    #[must_use]
    pub fn single(field: Field, kind: ViolationKind, reason: impl Into<Cow<'static, str>>) -> Self {
        let mut report = Self::default();
        report.push(Violation::new(field, kind, reason));
        report
    }

    /// Records `violation` unless its field already failed.
    pub fn push(&mut self, violation: Violation) {
        self.violations.entry(violation.field).or_insert(violation);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&Violation> {
        self.violations.get(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.values()
    }

    /// `true` if every violation is of `kind`.
    #[must_use]
    pub fn all_of(&self, kind: ViolationKind) -> bool {
        !self.is_empty() && self.iter().all(|v| v.kind == kind)
    }

    /// Wire shape: field name to reason.
    #[must_use]
    pub fn to_field_errors(&self) -> BTreeMap<String, String> {
        self.iter().map(|v| (v.field.as_str().to_owned(), v.reason.to_string())).collect()
    }
}

impl FromIterator<Violation> for ValidationReport {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        let mut report = Self::default();
        for violation in iter {
            report.push(violation);
        }
        report
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    kind: ViolationKind,
    reason: &'static str,
    passes: fn(&str) -> bool,
}

const NAME_RULES: &[Rule] = &[
    Rule { kind: ViolationKind::Required, reason: "Name is required", passes: not_blank },
    Rule {
        kind: ViolationKind::Length,
        reason: "Name must be at least 2 characters",
        passes: |v| v.chars().count() >= NAME_MIN_LEN,
    },
    Rule {
        kind: ViolationKind::Length,
        reason: "Name may not be greater than 255 characters",
        passes: |v| v.chars().count() <= NAME_MAX_LEN,
    },
    Rule {
        kind: ViolationKind::Format,
        reason: "Name can only contain letters and spaces",
        passes: |v| is_match(&NAME_CHARSET, v),
    },
    Rule {
        kind: ViolationKind::Quality,
        reason: "Name cannot have more than 3 consecutive identical letters",
        passes: |v| longest_run(v.chars().flat_map(char::to_lowercase)) <= NAME_MAX_RUN,
    },
    Rule {
        kind: ViolationKind::Quality,
        reason: "Name must contain at least 2 consecutive letters",
        passes: has_letter_pair,
    },
];

const EMAIL_RULES: &[Rule] = &[
    Rule { kind: ViolationKind::Required, reason: "Email is required", passes: not_blank },
    Rule {
        kind: ViolationKind::Format,
        reason: "Email format is invalid",
        passes: |v| is_match(&EMAIL_FORMAT, v),
    },
    Rule {
        kind: ViolationKind::Length,
        reason: "Email may not be greater than 255 characters",
        passes: |v| v.chars().count() <= EMAIL_MAX_LEN,
    },
];

const PHONE_LENGTH_RULES: [Rule; 2] = [
    Rule {
        kind: ViolationKind::Length,
        reason: "Phone must be at least 8 digits",
        passes: |v| v.chars().count() >= PHONE_MIN_LEN,
    },
    Rule {
        kind: ViolationKind::Length,
        reason: "Phone may not be greater than 20 characters",
        passes: |v| v.chars().count() <= PHONE_MAX_LEN,
    },
];

const PHONE_QUALITY_RULES: [Rule; 2] = [
    Rule {
        kind: ViolationKind::Quality,
        reason: "Phone cannot have more than 4 consecutive identical digits",
        passes: |v| longest_digit_run(v) <= PHONE_MAX_RUN,
    },
    Rule {
        kind: ViolationKind::Quality,
        reason: "Phone cannot be all zeros",
        passes: |v| !is_all_zeros(v),
    },
];

const PHONE_RULES_PERMISSIVE: &[Rule] = &[
    PHONE_LENGTH_RULES[0],
    PHONE_LENGTH_RULES[1],
    Rule {
        kind: ViolationKind::Format,
        reason: "Phone may only contain numbers, spaces and + - ( )",
        passes: |v| is_match(&PHONE_PERMISSIVE, v),
    },
    Rule {
        kind: ViolationKind::Format,
        reason: "Phone must contain digits",
        passes: |v| v.chars().any(|c| c.is_ascii_digit()),
    },
    PHONE_QUALITY_RULES[0],
    PHONE_QUALITY_RULES[1],
];

const PHONE_RULES_STRICT: &[Rule] = &[
    PHONE_LENGTH_RULES[0],
    PHONE_LENGTH_RULES[1],
    Rule {
        kind: ViolationKind::Format,
        reason: "Phone can only contain numbers",
        passes: |v| is_match(&PHONE_STRICT, v),
    },
    PHONE_QUALITY_RULES[0],
    PHONE_QUALITY_RULES[1],
];

fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Length of the longest run of equal items.
fn longest_run(items: impl Iterator<Item = char>) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous = None;
    for item in items {
        current = if previous == Some(item) { current + 1 } else { 1 };
        longest = longest.max(current);
        previous = Some(item);
    }
    longest
}

/// Longest run of one repeated digit. Non-digits break a run.
fn longest_digit_run(value: &str) -> usize {
    value
        .split(|c: char| !c.is_ascii_digit())
        .map(|chunk| longest_run(chunk.chars()))
        .max()
        .unwrap_or(0)
}

/// `false` for a value without digits.
fn is_all_zeros(value: &str) -> bool {
    let mut digits = value.chars().filter(char::is_ascii_digit).peekable();
    digits.peek().is_some() && digits.all(|c| c == '0')
}

fn has_letter_pair(value: &str) -> bool {
    let letters: Vec<bool> = value.chars().map(char::is_alphabetic).collect();
    letters.windows(2).any(|pair| pair[0] && pair[1])
}

fn first_failure(field: Field, rules: &[Rule], value: &str) -> Result<(), Violation> {
    rules
        .iter()
        .find(|rule| !(rule.passes)(value))
        .map_or(Ok(()), |rule| Err(Violation::new(field, rule.kind, rule.reason)))
}

/// Trims, lower-cases and title-cases each word. Inner spacing is kept as typed.
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut word_start = true;
    for ch in raw.trim().chars().flat_map(char::to_lowercase) {
        if word_start && !ch.is_whitespace() {
            normalized.extend(ch.to_uppercase());
        } else {
            normalized.push(ch);
        }
        word_start = ch.is_whitespace();
    }
    normalized
}

#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Trims. `None` when nothing is left.
#[must_use]
pub fn normalize_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Drops every character outside digits, `+ - ( )` and whitespace.
///
/// Applied by the REST handler before validation, never by [`RuleSet`].
#[must_use]
pub fn strip_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')') || c.is_whitespace())
        .collect()
}

/// `true` if `email` (after normalization) looks like `local@domain.tld`.
#[must_use]
pub fn is_email_format(email: &str) -> bool {
    is_match(&EMAIL_FORMAT, &normalize_email(email))
}

/// The rule tables applied to candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleSet {
    phone_format: PhoneFormat,
}

impl RuleSet {
    /// Permissive phone format: digits plus `+ - ( )` and spaces.
    #[must_use]
    pub const fn standard() -> Self {
        Self { phone_format: PhoneFormat::Permissive }
    }

    /// Digits-only phone format.
    #[must_use]
    pub const fn strict() -> Self {
        Self { phone_format: PhoneFormat::Strict }
    }

    #[must_use]
    pub const fn with_phone_format(phone_format: PhoneFormat) -> Self {
        Self { phone_format }
    }

    #[must_use]
    pub const fn phone_format(&self) -> PhoneFormat {
        self.phone_format
    }

    const fn phone_rules(&self) -> &'static [Rule] {
        match self.phone_format {
            PhoneFormat::Permissive => PHONE_RULES_PERMISSIVE,
            PhoneFormat::Strict => PHONE_RULES_STRICT,
        }
    }

    /// Normalizes `raw` for `field` and reports its first failing rule.
    ///
    /// # Errors
    /// Returns the first [`Violation`] of the field's rule table.
    pub fn validate_field(&self, field: Field, raw: &str) -> Result<(), Violation> {
        match field {
            Field::Name => first_failure(field, NAME_RULES, &normalize_name(raw)),
            Field::Email => first_failure(field, EMAIL_RULES, &normalize_email(raw)),
            Field::Phone => normalize_phone(raw)
                .map_or(Ok(()), |phone| first_failure(field, self.phone_rules(), &phone)),
        }
    }

    /// Validates every field and returns the normalized client.
    ///
    /// # Errors
    /// Returns a [`ValidationReport`] with one entry per failing field.
    pub fn validate(&self, candidate: &ClientCandidate) -> Result<NewClient, ValidationReport> {
        let name = normalize_name(&candidate.name);
        let email = normalize_email(&candidate.email);
        let phone = candidate.phone.as_deref().and_then(normalize_phone);

        let report: ValidationReport = [
            first_failure(Field::Name, NAME_RULES, &name).err(),
            first_failure(Field::Email, EMAIL_RULES, &email).err(),
            phone.as_deref().and_then(|p| first_failure(Field::Phone, self.phone_rules(), p).err()),
        ]
        .into_iter()
        .flatten()
        .collect();

        if report.is_empty() { Ok(NewClient::new(name, email, phone)) } else { Err(report) }
    }
}
