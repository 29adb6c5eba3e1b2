// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Normalization of raw emotion scores into a probability distribution

use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while normalizing a raw score map
#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error("emotion scores sum to zero")]
    ZeroTotal,

    #[error("emotion score for '{0}' is negative")]
    NegativeScore(String),

    #[error("emotion score for '{0}' is not finite")]
    NonFinite(String),
}

/// Rescale raw scores so they sum to 1.0, preserving the label set.
///
/// An all-zero (or empty) map is an error rather than a division by zero;
/// a zero total carries no information to distribute.
pub fn normalize_scores(raw: &HashMap<String, f64>) -> Result<HashMap<String, f64>, ScoreError> {
    for (label, score) in raw {
        if !score.is_finite() {
            return Err(ScoreError::NonFinite(label.clone()));
        }
        if *score < 0.0 {
            return Err(ScoreError::NegativeScore(label.clone()));
        }
    }

    let total: f64 = raw.values().sum();
    if total == 0.0 {
        return Err(ScoreError::ZeroTotal);
    }

    Ok(raw
        .iter()
        .map(|(label, score)| (label.clone(), score / total))
        .collect())
}
