//! # Footprint Matcher
//!
//! Resolves a canonical key to a database entry, first rule wins:
//!
//! 1. Exact key, confidence 1.0
//! 2. Substring either way, longest key wins, confidence 0.8
//! 3. `unknown`, confidence 0.3
//!
//! Exact is checked on its own so it always beats a longer incidental
//! substring collision. Equal-length substring candidates resolve to the
//! lexicographically smallest key.
use tracing::debug;

use crate::database::{CarbonDatabase, UNKNOWN};

pub const EXACT_CONFIDENCE: f64 = 1.0;
pub const PARTIAL_CONFIDENCE: f64 = 0.8;
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    Exact,
    Partial,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub key: &'a str,
    pub kind: MatchKind,
}

impl Match<'_> {
    pub fn confidence(&self) -> f64 {
        match self.kind {
            MatchKind::Exact => EXACT_CONFIDENCE,
            MatchKind::Partial => PARTIAL_CONFIDENCE,
            MatchKind::Fallback => FALLBACK_CONFIDENCE,
        }
    }
}

pub fn find_match<'a>(canonical_key: &str, database: &'a CarbonDatabase) -> Match<'a> {
    if let Some((key, _)) = database.entry(canonical_key) {
        return Match {
            key,
            kind: MatchKind::Exact,
        };
    }

    if !canonical_key.is_empty() {
        let mut best: Option<&str> = None;

        for (key, _) in database.iter() {
            if key == UNKNOWN {
                continue;
            }

            if !(canonical_key.contains(key) || key.contains(canonical_key)) {
                continue;
            }

            // strictly longer only, iteration is sorted so ties keep the smaller key
            if best.is_none_or(|current| key.len() > current.len()) {
                best = Some(key);
            }
        }

        if let Some(key) = best {
            return Match {
                key,
                kind: MatchKind::Partial,
            };
        }
    }

    debug!("No footprint entry for {canonical_key:?}, using {UNKNOWN}");

    Match {
        key: UNKNOWN,
        kind: MatchKind::Fallback,
    }
}
