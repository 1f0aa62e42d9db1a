//! ルートハンドラ

use super::error::ApiError;
use super::AppState;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use ecosort_common::{
    validate_image, validate_text, ClassificationResult, ClassifyImageRequest, ClassifyTextRequest,
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// multipartのファイルフィールド名
const IMAGE_FIELD: &str = "image";

pub const SERVICE_NAME: &str = "EcoSort AI Waste Classifier";

/// Health check endpoint.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    }))
}

pub async fn classify_text(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyTextRequest>, JsonRejection>,
) -> Result<Json<ClassificationResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected text request body");
        ApiError::invalid_body(rejection.body_text())
    })?;

    validate_text(&request)?;

    let (scores, result) = state.classifier.classify_text_with_scores(&request.text);

    info!(
        label = %result.label,
        confidence = result.confidence,
        recyclable = scores.recyclable,
        biodegradable = scores.biodegradable,
        hazardous = scores.hazardous,
        "Classified text"
    );

    Ok(Json(result))
}

pub async fn classify_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ClassificationResult>, ApiError> {
    // multipartでないリクエストはファイルなしと同じ扱い
    let mut multipart = multipart.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Not a multipart request");
        ApiError::MissingFile
    })?;

    let request = read_image_field(&mut multipart)
        .await?
        .ok_or(ApiError::MissingFile)?;

    validate_image(&request)?;

    let result = {
        let mut rng = state.rng.lock().await;
        state
            .classifier
            .classify_image(&request.filename, request.size, &request.mimetype, &mut *rng)
    };

    info!(
        filename = %request.filename,
        size = request.size,
        mimetype = %request.mimetype,
        label = %result.label,
        confidence = result.confidence,
        "Classified image"
    );

    Ok(Json(result))
}

/// `image`フィールドを探し、ファイル名・サイズ・MIMEタイプを取り出す
async fn read_image_field(
    multipart: &mut Multipart,
) -> Result<Option<ClassifyImageRequest>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        // filenameのないフィールドはファイルではない
        let Some(filename) = field.file_name().map(str::to_string) else {
            debug!("Skipping non-file image field");
            continue;
        };
        let mimetype = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(upload_error)?;

        return Ok(Some(ClassifyImageRequest {
            filename,
            size: data.len() as u64,
            mimetype,
        }));
    }

    Ok(None)
}

fn upload_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::BadUpload(err.body_text())
    }
}
