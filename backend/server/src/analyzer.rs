//! # Analyzer
//!
//! External AI collaborator that extracts ingredients from a dish name or a
//! photo. Everything it returns is untrusted and goes through the estimator's
//! normalization and matching.
//!
//! ## Endpoints
//!
//! - `POST {ANALYZER_URL}/ingredients` with `{ "dish": string }`
//! - `POST {ANALYZER_URL}/vision` with `{ "image": base64, "mimetype": string }`
//!
//! Both answer with an [`Analysis`]. No retries here, the client timeout is
//! the only bound.
use async_trait::async_trait;
use bank::RawIngredient;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default = "recognized")]
    pub is_food: bool,
    #[serde(default)]
    pub dish: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<RawIngredient>,
    /// Fractional values are allowed, the estimator rounds them.
    #[serde(default)]
    pub processing_time_ms: Option<f64>,
}

fn recognized() -> bool {
    true
}

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Analyzer request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Analyzer responded with {0}")]
    Status(StatusCode),
}

#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn extract_ingredients(&self, dish: &str) -> Result<Analysis, AnalyzerError>;

    async fn analyze_image(&self, image: &[u8], mimetype: &str)
    -> Result<Analysis, AnalyzerError>;
}

pub struct RemoteAnalyzer {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RemoteAnalyzer {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.analyzer_timeout).build()?;

        Ok(Self {
            client,
            base_url: config.analyzer_url.trim_end_matches('/').to_string(),
            api_key: config.analyzer_key.clone(),
        })
    }

    async fn post(
        &self,
        path: &str,
        payload: serde_json::Value,
    ) -> Result<Analysis, AnalyzerError> {
        let mut request = self
            .client
            .post(format!("{}/{path}", self.base_url))
            .json(&payload);

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyzerError::Status(status));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl Analyzer for RemoteAnalyzer {
    async fn extract_ingredients(&self, dish: &str) -> Result<Analysis, AnalyzerError> {
        self.post("ingredients", json!({ "dish": dish })).await
    }

    async fn analyze_image(
        &self,
        image: &[u8],
        mimetype: &str,
    ) -> Result<Analysis, AnalyzerError> {
        let payload = json!({
            "image": STANDARD.encode(image),
            "mimetype": mimetype,
        });

        self.post("vision", payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_defaults() {
        let analysis: Analysis =
            serde_json::from_str(r#"{ "ingredients": [{ "name": "rice" }] }"#).unwrap();

        assert!(analysis.is_food);
        assert_eq!(analysis.dish, None);
        assert_eq!(analysis.ingredients, vec![RawIngredient::new("rice", None)]);
        assert_eq!(analysis.processing_time_ms, None);
    }

    #[test]
    fn test_analysis_not_food() {
        let analysis: Analysis = serde_json::from_str(
            r#"{ "is_food": false, "dish": "Shoe", "ingredients": [], "processing_time_ms": 812 }"#,
        )
        .unwrap();

        assert!(!analysis.is_food);
        assert_eq!(analysis.dish.as_deref(), Some("Shoe"));
        assert_eq!(analysis.processing_time_ms, Some(812.0));
    }

    #[test]
    fn test_analysis_fractional_processing_time() {
        let analysis: Analysis = serde_json::from_str(
            r#"{ "ingredients": [{ "name": "rice", "confidence": 0.7 }], "processing_time_ms": 812.4 }"#,
        )
        .unwrap();

        assert_eq!(analysis.processing_time_ms, Some(812.4));

        let estimate = bank::compute_estimate(
            "Rice",
            &analysis.ingredients,
            bank::Source::Text,
            analysis.processing_time_ms,
        );

        assert!(estimate.metadata.processing_time_ms.unwrap() >= 812);
        assert_eq!(estimate.ingredients[0].carbon_kg, 0.8);
    }
}
