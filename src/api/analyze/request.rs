// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart extraction for the analyze endpoint

use axum_extra::extract::Multipart;
use bytes::Bytes;

use crate::api::errors::ApiError;

/// Multipart field that carries the uploaded image
pub const IMAGE_FIELD: &str = "image";

/// Read the image bytes out of the multipart body.
///
/// The first field named `image` wins; other fields are ignored. A missing
/// or empty field, or a body that fails multipart parsing, is a client
/// error.
pub async fn read_image_field(multipart: &mut Multipart) -> Result<Bytes, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::MissingInput(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let bytes = field.bytes().await.map_err(|e| {
            ApiError::MissingInput(format!("failed to read field '{}': {}", IMAGE_FIELD, e))
        })?;

        if bytes.is_empty() {
            return Err(ApiError::MissingInput(format!(
                "field '{}' is empty",
                IMAGE_FIELD
            )));
        }

        return Ok(bytes);
    }

    Err(ApiError::MissingInput(format!(
        "missing multipart field '{}'",
        IMAGE_FIELD
    )))
}
