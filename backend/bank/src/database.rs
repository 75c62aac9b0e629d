//! # Carbon Database
//!
//! Fixed lookup table of kg CO2-equivalent per serving-unit.
//!
//! ## Requirements
//!
//! - Built once, read-only afterwards, safe for any number of readers
//! - Keys are lowercase, single-spaced, already in canonical form
//! - Always holds the `unknown` sentinel so every lookup has an answer
//!
//! ## Implementation
//!
//! - `BTreeMap` so iteration order is lexicographic, which makes the
//!   substring matcher deterministic when two keys tie on length
//! - Values are literal two-decimal numbers, never interpolated
use std::{collections::BTreeMap, sync::LazyLock};

use thiserror::Error;

pub const UNKNOWN: &str = "unknown";

const FOOTPRINTS: &[(&str, f64)] = &[
    ("beef", 6.61),
    ("lamb", 5.84),
    ("pork", 1.72),
    ("chicken", 1.26),
    ("turkey", 1.34),
    ("fish", 1.34),
    ("salmon", 1.21),
    ("shrimp", 2.68),
    ("egg", 0.45),
    ("cheese", 2.39),
    ("milk", 0.63),
    ("butter", 1.2),
    ("yogurt", 0.39),
    ("rice", 0.8),
    ("wheat", 0.28),
    ("pasta", 0.35),
    ("bread", 0.32),
    ("potato", 0.09),
    ("tomato", 0.21),
    ("onion", 0.08),
    ("lettuce", 0.07),
    ("carrot", 0.06),
    ("beans", 0.18),
    ("tofu", 0.4),
    ("olive oil", 0.54),
    ("oil", 0.42),
    ("sugar", 0.32),
    (UNKNOWN, 0.5),
];

pub static CARBON_DATABASE: LazyLock<CarbonDatabase> = LazyLock::new(CarbonDatabase::builtin);

#[derive(Error, Debug, PartialEq)]
pub enum DatabaseError {
    #[error("Missing required `{UNKNOWN}` entry")]
    MissingUnknown,

    #[error("Invalid footprint for {key}: {value}")]
    InvalidValue { key: String, value: f64 },
}

#[derive(Debug, Clone)]
pub struct CarbonDatabase {
    entries: BTreeMap<String, f64>,
}

impl CarbonDatabase {
    pub fn new<I, K>(entries: I) -> Result<Self, DatabaseError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut map = BTreeMap::new();

        for (key, value) in entries {
            let key = key.into();

            if !value.is_finite() || value < 0.0 {
                return Err(DatabaseError::InvalidValue { key, value });
            }

            map.insert(key, value);
        }

        if !map.contains_key(UNKNOWN) {
            return Err(DatabaseError::MissingUnknown);
        }

        Ok(Self { entries: map })
    }

    fn builtin() -> Self {
        Self {
            entries: FOOTPRINTS
                .iter()
                .map(|&(key, value)| (key.to_string(), value))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.get(key).copied()
    }

    pub fn entry(&self, key: &str) -> Option<(&str, f64)> {
        self.entries
            .get_key_value(key)
            .map(|(key, &value)| (key.as_str(), value))
    }

    /// Total accessor, anything missing reads as the `unknown` footprint.
    pub fn get_or_unknown(&self, key: &str) -> f64 {
        self.get(key).unwrap_or_else(|| self.unknown())
    }

    pub fn unknown(&self) -> f64 {
        self.entries[UNKNOWN]
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(key, &value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let rebuilt = CarbonDatabase::new(FOOTPRINTS.iter().copied()).unwrap();

        assert_eq!(rebuilt.len(), CARBON_DATABASE.len());
        assert_eq!(CARBON_DATABASE.len(), 28);
        assert!(CARBON_DATABASE.contains(UNKNOWN));
    }

    #[test]
    fn test_keys_are_canonical() {
        for (key, _) in CARBON_DATABASE.iter() {
            assert_eq!(key, key.trim());
            assert!(!key.contains("  "));
            assert!(key.chars().all(|c| c.is_ascii_lowercase() || c == ' '));
        }
    }

    #[test]
    fn test_get_or_unknown() {
        assert_eq!(CARBON_DATABASE.get_or_unknown("rice"), 0.8);
        assert_eq!(CARBON_DATABASE.get_or_unknown("dragonfruit"), 0.5);
        assert_eq!(CARBON_DATABASE.get("dragonfruit"), None);
    }

    #[test]
    fn test_missing_unknown() {
        let result = CarbonDatabase::new([("rice", 0.8)]);

        assert_eq!(result.unwrap_err(), DatabaseError::MissingUnknown);
    }

    #[test]
    fn test_negative_value() {
        let result = CarbonDatabase::new([("rice", -1.0), (UNKNOWN, 0.5)]);

        assert!(matches!(result, Err(DatabaseError::InvalidValue { .. })));
    }

    #[test]
    fn test_iteration_is_lexicographic() {
        let keys: Vec<&str> = CARBON_DATABASE.iter().map(|(key, _)| key).collect();
        let mut sorted = keys.clone();
        sorted.sort();

        assert_eq!(keys, sorted);
    }
}
