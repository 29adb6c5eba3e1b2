// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Emotion sidecar client for facial-emotion analysis over HTTP

use anyhow::Result;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbImage};
use reqwest::Client;
use std::io::Cursor;
use std::time::Duration;
use tracing::{debug, info};

use super::{ClassifierError, EmotionClassifier, EmotionScores, FaceAnalysis};

// --- Sidecar wire structs ---

#[derive(serde::Serialize)]
struct SidecarRequest {
    image: String,
}

#[derive(serde::Deserialize)]
struct SidecarResponse {
    results: Vec<SidecarFace>,
}

#[derive(serde::Deserialize)]
struct SidecarFace {
    emotion: EmotionScores,
    dominant_emotion: String,
}

#[derive(serde::Deserialize)]
struct SidecarFailure {
    error: String,
}

/// Client for the emotion classifier sidecar service
///
/// The sidecar owns face detection and the emotion model; this client only
/// ships frames to it and validates what comes back.
pub struct SidecarClassifier {
    client: Client,
    endpoint: String,
}

impl SidecarClassifier {
    /// Create a new sidecar client
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!("Emotion sidecar client configured: endpoint={}", endpoint);

        Ok(Self { client, endpoint })
    }

    /// Base URL of the sidecar
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Check if the sidecar is healthy
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.endpoint))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Sidecar health check failed: {}", e);
                false
            }
        }
    }
}

/// Re-encode the RGB frame as PNG and base64 it for the wire
fn encode_frame(image: &RgbImage) -> Result<String, ClassifierError> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| ClassifierError::Encode(e.to_string()))?;
    Ok(STANDARD.encode(&buf))
}

#[async_trait]
impl EmotionClassifier for SidecarClassifier {
    async fn analyze(&self, image: &RgbImage) -> Result<Vec<FaceAnalysis>, ClassifierError> {
        let request = SidecarRequest {
            image: encode_frame(image)?,
        };

        let response = self
            .client
            .post(format!("{}/analyze", self.endpoint))
            .json(&request)
            .send()
            .await
            .map_err(|e| ClassifierError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            // The sidecar reports failures (e.g. no face detected) as
            // {"error": "..."} with a non-2xx status
            let status = response.status();
            let message = match response.json::<SidecarFailure>().await {
                Ok(failure) => failure.error,
                Err(_) => format!("classifier returned status {}", status),
            };
            return Err(ClassifierError::Rejected { message });
        }

        let body: SidecarResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::InvalidResponse(e.to_string()))?;

        if body.results.is_empty() {
            return Err(ClassifierError::InvalidResponse(
                "classifier returned no face analyses".to_string(),
            ));
        }

        let analyses: Vec<FaceAnalysis> = body
            .results
            .into_iter()
            .map(|face| FaceAnalysis {
                emotions: face.emotion,
                dominant_emotion: face.dominant_emotion,
            })
            .collect();

        for analysis in &analyses {
            analysis.validate()?;
        }

        debug!("Classifier returned {} face analyses", analyses.len());

        Ok(analyses)
    }
}
