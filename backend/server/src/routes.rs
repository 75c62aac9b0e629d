use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::IntoResponse,
};
use bank::{CarbonEstimate, Source, compute_estimate};
use serde_json::{Value, json};

use crate::{
    error::AppError,
    state::AppState,
    validation::{
        Rejection, UploadedFile,
        file::IMAGE_FIELD,
        validate_file, validate_text,
    },
};

pub const UNKNOWN_DISH: &str = "Unknown dish";

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

pub async fn estimate_text_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CarbonEstimate>, AppError> {
    // a missing body is rejected as a non-object by the validator
    let payload: Value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|_| AppError::MalformedPayload)?
    };

    let request = validate_text(&payload)?;

    let analysis = state.analyzer.extract_ingredients(&request.dish).await?;
    if !analysis.is_food {
        return Err(AppError::NotFood);
    }

    Ok(Json(compute_estimate(
        &request.dish,
        &analysis.ingredients,
        Source::Text,
        analysis.processing_time_ms,
    )))
}

pub async fn estimate_image_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<CarbonEstimate>, AppError> {
    let max_size = state.config.max_file_size;

    let upload = read_image(&mut multipart, max_size).await?;
    let file = validate_file(upload.as_ref(), max_size)?;

    let analysis = state
        .analyzer
        .analyze_image(&file.bytes, &file.mimetype)
        .await?;

    if !analysis.is_food {
        return Err(AppError::NotFood);
    }

    let dish = analysis
        .dish
        .as_deref()
        .map(str::trim)
        .filter(|dish| !dish.is_empty())
        .unwrap_or(UNKNOWN_DISH);

    Ok(Json(compute_estimate(
        dish,
        &analysis.ingredients,
        Source::Image,
        analysis.processing_time_ms,
    )))
}

async fn read_image(
    multipart: &mut Multipart,
    max_size: usize,
) -> Result<Option<UploadedFile>, AppError> {
    let upload_error = |err: MultipartError| {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::Rejected(Rejection::FileTooLarge { max: max_size })
        } else {
            AppError::MalformedPayload
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let original_name = field.file_name().map(str::to_string);
        let mimetype = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(upload_error)?;

        return Ok(Some(UploadedFile {
            size: bytes.len(),
            bytes,
            mimetype,
            original_name,
        }));
    }

    Ok(None)
}
