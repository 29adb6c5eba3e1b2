// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Emotion analysis endpoint handler

use axum::{extract::State, Json};
use axum_extra::extract::{multipart::MultipartRejection, Multipart};
use tracing::{debug, info, warn};

use super::request::read_image_field;
use super::response::AnalyzeResponse;
use super::scores::normalize_scores;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::decode_rgb_image;

/// POST /analyze - Predict the emotion shown by the face in an uploaded image
///
/// Accepts a multipart form with a file field named `image` and returns the
/// dominant emotion label together with a normalized probability per label.
///
/// # Request
/// - `image`: raw image bytes (PNG, JPEG, WebP, GIF or BMP), required
///
/// # Response
/// - `emotion`: dominant emotion label, as designated by the classifier
/// - `probabilities`: emotion label -> probability, values summing to 1.0
///
/// # Errors
/// - 400 Bad Request: missing/empty `image` field or undecodable bytes
/// - 500 Internal Server Error: classification failed (e.g. no face found)
/// - 503 Service Unavailable: classifier sidecar unreachable
pub async fn analyze_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let mut multipart = multipart
        .map_err(|e| ApiError::MissingInput(format!("invalid multipart request: {}", e)))?;

    // 1. Extract the uploaded image field
    let bytes = read_image_field(&mut multipart).await?;
    debug!("Received image upload: {} bytes", bytes.len());

    // 2. Decode into an RGB pixel matrix
    let (image, image_info) = decode_rgb_image(&bytes).map_err(|e| {
        warn!("Image decode failed: {}", e);
        ApiError::from(e)
    })?;
    debug!(
        "Decoded image: {}x{}, {:?}",
        image_info.width, image_info.height, image_info.format
    );

    // 3. Run emotion classification; the first face analysis carries the result
    let analyses = state.classifier.analyze(&image).await.map_err(|e| {
        warn!("Emotion classification failed: {}", e);
        ApiError::from(e)
    })?;

    let analysis = analyses.into_iter().next().ok_or_else(|| {
        ApiError::ClassificationFailed("classifier returned no face analyses".to_string())
    })?;

    // 4. Normalize raw scores into a probability distribution
    let probabilities = normalize_scores(&analysis.emotions).map_err(|e| {
        warn!("Score normalization failed: {}", e);
        ApiError::ClassificationFailed(e.to_string())
    })?;

    info!(
        "Analysis complete: dominant emotion '{}' over {} labels",
        analysis.dominant_emotion,
        probabilities.len()
    );

    // 5. Dominant label passes through from the classifier unchanged
    Ok(Json(AnalyzeResponse::new(
        analysis.dominant_emotion,
        probabilities,
    )))
}
