// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub mod parser;

/// Field names accepted as the recipient address column, in lookup order.
/// The match is deliberately case-sensitive and limited to these two
/// spellings; no other casings are recognized.
pub const ADDRESS_FIELDS: [&str; 2] = ["email", "Email"];

/// One row of the recipient source, with fields kept in the order the header
/// row declared them. Keys are case-sensitive exactly as they appear in the
/// source file.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct RecipientRecord {
    fields: Vec<(String, String)>,
}

impl RecipientRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    /// The first value stored under `key`; later duplicate columns are kept
    /// for iteration but never shadow the first.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }

    /// Resolves the recipient address: the first non-empty of `email` then
    /// `Email`, exact case.
    pub fn address(&self) -> Option<&str> {
        ADDRESS_FIELDS
            .iter()
            .filter_map(|key| self.get(key))
            .find(|value| !value.trim().is_empty())
            .map(str::trim)
    }

    /// Whether an address column is present at all, regardless of its value.
    pub fn has_address_field(&self) -> bool {
        ADDRESS_FIELDS.iter().any(|key| self.get(key).is_some())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// How this record is named in a report: the resolved address when one
    /// exists, otherwise an echo of the raw fields.
    pub fn identifier(&self) -> String {
        match self.address() {
            Some(address) => address.to_string(),
            None => self
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_prefers_lowercase_then_capitalized() {
        let mut record = RecipientRecord::new();
        record.push("Email", "upper@example.com");
        record.push("email", "lower@example.com");
        assert_eq!(record.address(), Some("lower@example.com"));
    }

    #[test]
    fn address_skips_empty_values() {
        let mut record = RecipientRecord::new();
        record.push("email", "  ");
        record.push("Email", "fallback@example.com");
        assert_eq!(record.address(), Some("fallback@example.com"));
        assert!(record.has_address_field());
    }

    #[test]
    fn other_casings_are_not_addresses() {
        let mut record = RecipientRecord::new();
        record.push("EMAIL", "shouty@example.com");
        record.push("eMail", "odd@example.com");
        assert_eq!(record.address(), None);
        assert!(!record.has_address_field());
    }

    #[test]
    fn first_duplicate_column_wins_on_lookup() {
        let mut record = RecipientRecord::new();
        record.push("name", "first");
        record.push("name", "second");
        assert_eq!(record.get("name"), Some("first"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn identifier_echoes_fields_without_address() {
        let mut record = RecipientRecord::new();
        record.push("name", "Ada");
        record.push("city", "London");
        assert_eq!(record.identifier(), "name=Ada, city=London");
    }
}
