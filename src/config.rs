// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration parsed from environment variables

use std::env;
use std::time::Duration;

/// Default API listen port
pub const DEFAULT_API_PORT: u16 = 8080;

/// Default classifier sidecar endpoint
pub const DEFAULT_CLASSIFIER_ENDPOINT: &str = "http://127.0.0.1:8501";

/// Default classifier request timeout in seconds
pub const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration for the node
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Port the HTTP server listens on
    pub api_port: u16,
    /// Base URL of the emotion classifier sidecar
    pub classifier_endpoint: String,
    /// Transport timeout for classifier requests
    pub classifier_timeout: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            api_port: DEFAULT_API_PORT,
            classifier_endpoint: DEFAULT_CLASSIFIER_ENDPOINT.to_string(),
            classifier_timeout: Duration::from_secs(DEFAULT_CLASSIFIER_TIMEOUT_SECS),
        }
    }
}

impl NodeConfig {
    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    ///
    /// Recognized variables: `BIND_ADDR`, `API_PORT`, `CLASSIFIER_ENDPOINT`,
    /// `CLASSIFIER_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());

        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(DEFAULT_API_PORT);

        let classifier_endpoint = env::var("CLASSIFIER_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_CLASSIFIER_ENDPOINT.to_string());

        let classifier_timeout = env::var("CLASSIFIER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_CLASSIFIER_TIMEOUT_SECS));

        Self {
            bind_addr,
            api_port,
            classifier_endpoint,
            classifier_timeout,
        }
    }
}
