//! # Bank
//!
//! Carbon footprint lookup and aggregation.
//!
//! ## Flow
//!
//! - Ingredient names come from an external extractor, untrusted
//! - Each name is normalized into a canonical key
//! - The key is matched against the fixed footprint table
//! - Line items are rounded, then summed into the estimate
//!
//! Everything here is pure and synchronous. The only shared state is the
//! read-only [`CARBON_DATABASE`].
pub mod database;
pub mod estimate;
pub mod matcher;
pub mod normalize;

pub use database::{CARBON_DATABASE, CarbonDatabase, DatabaseError, UNKNOWN};
pub use estimate::{
    CarbonEstimate, Metadata, RawIngredient, ResolvedIngredient, Source, aggregate,
};
pub use matcher::{Match, MatchKind, find_match};
pub use normalize::normalize;

/// Estimate against the built-in footprint table.
pub fn compute_estimate(
    dish: &str,
    raw_ingredients: &[RawIngredient],
    source: Source,
    prior_processing_time_ms: Option<f64>,
) -> CarbonEstimate {
    aggregate(
        dish,
        raw_ingredients,
        source,
        prior_processing_time_ms,
        &CARBON_DATABASE,
    )
}
