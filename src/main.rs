// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use emotion_node::{
    api::http_server::{start_server, AppState},
    classifier::SidecarClassifier,
    config::NodeConfig,
};
use std::{env, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = NodeConfig::from_env();
    tracing::info!(
        "Starting emotion analysis node on {}:{}",
        config.bind_addr,
        config.api_port
    );

    let classifier = SidecarClassifier::new(&config.classifier_endpoint, config.classifier_timeout)?;
    if classifier.health_check().await {
        tracing::info!(
            "Classifier sidecar reachable at {}",
            config.classifier_endpoint
        );
    } else {
        tracing::warn!(
            "Classifier sidecar not reachable at {} - analysis requests will fail until it is up",
            config.classifier_endpoint
        );
    }

    let state = AppState::new(Arc::new(classifier));
    start_server(&config, state).await?;

    Ok(())
}
