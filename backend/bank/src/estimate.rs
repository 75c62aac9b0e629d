//! # Carbon Estimate
//!
//! Turns a list of extracted ingredients into a full estimate.
//!
//! ## Rounding
//!
//! - Each ingredient's footprint and confidence are rounded to 2 decimals first
//! - The total is the sum of the rounded line items, rounded once more to
//!   absorb float drift, so line items always add up to the total
//!
//! ## Confidence
//!
//! Matcher confidence multiplied by the extractor's confidence, 0.8 when the
//! extractor gave none.
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{database::CarbonDatabase, matcher::find_match, normalize::normalize};

pub const DEFAULT_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Text,
    Image,
}

/// Ingredient as reported by an extractor, untrusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawIngredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl RawIngredient {
    pub fn new(name: impl Into<String>, confidence: Option<f64>) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }

    fn reported_confidence(&self) -> f64 {
        match self.confidence {
            Some(confidence) if !confidence.is_nan() => confidence.clamp(0.0, 1.0),
            _ => DEFAULT_CONFIDENCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedIngredient {
    pub name: String,
    pub carbon_kg: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonEstimate {
    pub dish: String,
    pub estimated_carbon_kg: f64,
    pub ingredients: Vec<ResolvedIngredient>,
    pub metadata: Metadata,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Non-negative whole milliseconds, NaN reads as zero.
fn whole_millis(ms: f64) -> u64 {
    // float to int casts saturate, so huge values clamp to u64::MAX
    ms.max(0.0).round() as u64
}

pub fn resolve(raw: &RawIngredient, database: &CarbonDatabase) -> ResolvedIngredient {
    let canonical_key = normalize(&raw.name);
    let found = find_match(&canonical_key, database);

    ResolvedIngredient {
        name: raw.name.clone(),
        carbon_kg: round2(database.get_or_unknown(found.key)),
        confidence: round2(found.confidence() * raw.reported_confidence()),
    }
}

pub fn aggregate(
    dish: &str,
    raw_ingredients: &[RawIngredient],
    source: Source,
    prior_processing_time_ms: Option<f64>,
    database: &CarbonDatabase,
) -> CarbonEstimate {
    let start = Instant::now();

    let ingredients: Vec<ResolvedIngredient> = raw_ingredients
        .iter()
        .map(|raw| resolve(raw, database))
        .collect();

    let estimated_carbon_kg = round2(ingredients.iter().map(|i| i.carbon_kg).sum());

    let elapsed_ms = whole_millis(start.elapsed().as_secs_f64() * 1000.0);
    let processing_time_ms = prior_processing_time_ms
        .map_or(0, whole_millis)
        .saturating_add(elapsed_ms);

    info!(
        dish,
        ingredients = ingredients.len(),
        estimated_carbon_kg,
        processing_time_ms,
        "Computed carbon estimate"
    );

    CarbonEstimate {
        dish: dish.to_string(),
        estimated_carbon_kg,
        ingredients,
        metadata: Metadata {
            processing_time_ms: Some(processing_time_ms),
            source,
        },
    }
}
