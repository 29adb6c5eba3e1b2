// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Facial-emotion classifier boundary
//!
//! The classifier itself is an external collaborator; this module owns the
//! typed seam to it. [`EmotionClassifier`] is the trait request handlers
//! depend on, [`FaceAnalysis`] is the per-face result record validated as
//! soon as it crosses the boundary, and [`SidecarClassifier`] is the
//! production implementation talking to the sidecar service over HTTP.

pub mod sidecar;

use async_trait::async_trait;
use image::RgbImage;
use std::collections::HashMap;
use thiserror::Error;

pub use sidecar::SidecarClassifier;

/// Mapping from emotion label to non-negative raw score
pub type EmotionScores = HashMap<String, f64>;

/// Errors raised at the classifier boundary
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The classifier service could not be reached at the transport level
    #[error("classifier service unreachable: {0}")]
    Unreachable(String),

    /// The classifier reported a failure (e.g. no face detected).
    /// The message is surfaced to API clients verbatim.
    #[error("{message}")]
    Rejected { message: String },

    /// The classifier answered with a payload that violates its contract
    #[error("invalid classifier response: {0}")]
    InvalidResponse(String),

    /// The image could not be encoded for transport to the classifier
    #[error("failed to encode image for classifier: {0}")]
    Encode(String),
}

/// One per-face analysis record returned by the classifier
#[derive(Debug, Clone, PartialEq)]
pub struct FaceAnalysis {
    /// Raw (non-normalized) score per emotion label
    pub emotions: EmotionScores,
    /// The label the classifier designates as most likely. Passed through
    /// to clients unchanged, never recomputed from the scores.
    pub dominant_emotion: String,
}

impl FaceAnalysis {
    /// Validate the record against the collaborator contract: a non-empty
    /// score map, finite non-negative scores, and a dominant label drawn
    /// from the returned label set.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.emotions.is_empty() {
            return Err(ClassifierError::InvalidResponse(
                "empty emotion score map".to_string(),
            ));
        }

        for (label, score) in &self.emotions {
            if !score.is_finite() {
                return Err(ClassifierError::InvalidResponse(format!(
                    "score for '{}' is not finite",
                    label
                )));
            }
            if *score < 0.0 {
                return Err(ClassifierError::InvalidResponse(format!(
                    "score for '{}' is negative",
                    label
                )));
            }
        }

        if self.dominant_emotion.is_empty() {
            return Err(ClassifierError::InvalidResponse(
                "missing dominant emotion label".to_string(),
            ));
        }

        if !self.emotions.contains_key(&self.dominant_emotion) {
            return Err(ClassifierError::InvalidResponse(format!(
                "dominant emotion '{}' not among returned labels",
                self.dominant_emotion
            )));
        }

        Ok(())
    }
}

/// Emotion classification over a decoded RGB frame.
///
/// Implementations return an ordered, non-empty sequence of per-face
/// analyses; callers use the first entry (single-face contract).
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    async fn analyze(&self, image: &RgbImage) -> Result<Vec<FaceAnalysis>, ClassifierError>;
}
