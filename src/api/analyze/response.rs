// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze response types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Response from facial-emotion analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Dominant emotion label, exactly as the classifier designated it
    pub emotion: String,
    /// Normalized probability per emotion label (values sum to 1.0)
    pub probabilities: HashMap<String, f64>,
}

impl AnalyzeResponse {
    pub fn new(emotion: String, probabilities: HashMap<String, f64>) -> Self {
        Self {
            emotion,
            probabilities,
        }
    }
}
