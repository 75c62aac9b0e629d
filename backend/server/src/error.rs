use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{analyzer::AnalyzerError, validation::Rejection};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Input was not recognized as food")]
    NotFood,

    #[error("Ingredient analysis is unavailable")]
    Analyzer(#[from] AnalyzerError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Rejected { .. } => StatusCode::BAD_REQUEST,
            AppError::MalformedPayload => StatusCode::BAD_REQUEST,
            AppError::NotFood => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Analyzer(err) => {
                error!("Analyzer failure: {err}");
                StatusCode::BAD_GATEWAY
            }
        };

        let body = match &self {
            AppError::Rejected(rejection) => json!({
                "error": rejection.to_string(),
                "code": rejection.code(),
                "field": rejection.field(),
            }),
            AppError::MalformedPayload => json!({
                "error": self.to_string(),
                "code": "malformed_payload",
            }),
            AppError::NotFood => json!({
                "error": self.to_string(),
                "code": "not_food",
            }),
            AppError::Analyzer(_) => json!({
                "error": self.to_string(),
                "code": "analyzer_unavailable",
            }),
        };

        (status, Json(body)).into_response()
    }
}
