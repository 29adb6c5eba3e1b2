// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Endpoint tests for POST /analyze
//!
//! These tests drive the full router with a stub classifier so every
//! request/response path is exercised without the sidecar:
//! - successful analysis with normalized probabilities
//! - dominant-label passthrough
//! - error propagation from the classifier (no face found)
//! - malformed uploads (missing field, undecodable bytes)
//! - the all-zero raw score policy (explicit error, never a division by zero)

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use emotion_node::{
    api::{build_router, AppState},
    classifier::{ClassifierError, EmotionClassifier, FaceAnalysis},
};
use image::RgbImage;
use std::sync::Arc;
use tower::ServiceExt;

// 1x1 red PNG - minimal valid image
const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

const BOUNDARY: &str = "emotion-node-test-boundary";

/// What the stub classifier should do when invoked
#[derive(Clone)]
enum StubBehavior {
    /// Return one face analysis with these raw scores and dominant label
    Scores(Vec<(&'static str, f64)>, &'static str),
    /// Return several face analyses (first one should win)
    MultiFace(Vec<(Vec<(&'static str, f64)>, &'static str)>),
    /// Fail the way the sidecar fails when no face is detected
    Reject(&'static str),
    /// Fail at the transport level
    Unreachable,
}

struct StubClassifier(StubBehavior);

fn analysis(scores: &[(&'static str, f64)], dominant: &str) -> FaceAnalysis {
    FaceAnalysis {
        emotions: scores
            .iter()
            .map(|(label, score)| (label.to_string(), *score))
            .collect(),
        dominant_emotion: dominant.to_string(),
    }
}

#[async_trait]
impl EmotionClassifier for StubClassifier {
    async fn analyze(&self, _image: &RgbImage) -> Result<Vec<FaceAnalysis>, ClassifierError> {
        match &self.0 {
            StubBehavior::Scores(scores, dominant) => Ok(vec![analysis(scores, dominant)]),
            StubBehavior::MultiFace(faces) => Ok(faces
                .iter()
                .map(|(scores, dominant)| analysis(scores, dominant))
                .collect()),
            StubBehavior::Reject(message) => Err(ClassifierError::Rejected {
                message: message.to_string(),
            }),
            StubBehavior::Unreachable => {
                Err(ClassifierError::Unreachable("connection refused".to_string()))
            }
        }
    }
}

/// Helper: build an app with a stub classifier
fn test_app(behavior: StubBehavior) -> Router {
    let state = AppState::new(Arc::new(StubClassifier(behavior)));
    build_router(state)
}

/// Helper: multipart body with one file field
fn multipart_body(field_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"face.png\"\r\n\
             Content-Type: image/png\r\n\r\n",
            field_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Helper: POST /analyze request carrying `bytes` under `field_name`
fn analyze_request(field_name: &str, bytes: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field_name, bytes)))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn tiny_png() -> Vec<u8> {
    STANDARD.decode(TINY_PNG_BASE64).unwrap()
}

/// Test 1: valid upload returns 200 with normalized probabilities
#[tokio::test]
async fn test_analyze_success_normalizes_scores() {
    let app = test_app(StubBehavior::Scores(
        vec![("happy", 80.0), ("sad", 10.0), ("neutral", 10.0)],
        "happy",
    ));

    let response = app.oneshot(analyze_request("image", &tiny_png())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;

    assert_eq!(json["emotion"], "happy");
    let probabilities = json["probabilities"].as_object().unwrap();
    assert_eq!(probabilities.len(), 3);
    assert!((probabilities["happy"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    assert!((probabilities["sad"].as_f64().unwrap() - 0.1).abs() < 1e-6);
    assert!((probabilities["neutral"].as_f64().unwrap() - 0.1).abs() < 1e-6);
}

/// Test 2: probabilities sum to 1.0 for arbitrary positive raw scores
#[tokio::test]
async fn test_analyze_probabilities_sum_to_one() {
    let app = test_app(StubBehavior::Scores(
        vec![
            ("angry", 3.2),
            ("disgust", 0.4),
            ("fear", 1.1),
            ("happy", 27.5),
            ("sad", 6.0),
            ("surprise", 0.9),
            ("neutral", 14.8),
        ],
        "happy",
    ));

    let response = app.oneshot(analyze_request("image", &tiny_png())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;

    let sum: f64 = json["probabilities"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_f64().unwrap())
        .sum();
    assert!((sum - 1.0).abs() < 1e-6, "probabilities summed to {}", sum);
}

/// Test 3: the dominant label is passed through exactly as supplied,
/// even when it is not the argmax of the scores
#[tokio::test]
async fn test_analyze_dominant_label_passthrough() {
    let app = test_app(StubBehavior::Scores(
        vec![("happy", 49.0), ("sad", 51.0)],
        "happy",
    ));

    let response = app.oneshot(analyze_request("image", &tiny_png())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["emotion"], "happy");
}

/// Test 4: only the first face analysis is used
#[tokio::test]
async fn test_analyze_uses_first_face() {
    let app = test_app(StubBehavior::MultiFace(vec![
        (vec![("surprise", 9.0), ("neutral", 1.0)], "surprise"),
        (vec![("sad", 10.0)], "sad"),
    ]));

    let response = app.oneshot(analyze_request("image", &tiny_png())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["emotion"], "surprise");
    assert!((json["probabilities"]["surprise"].as_f64().unwrap() - 0.9).abs() < 1e-6);
}

/// Test 5: classifier failure propagates as a 500 with the raw message
#[tokio::test]
async fn test_analyze_no_face_found() {
    let app = test_app(StubBehavior::Reject("no face found"));

    let response = app.oneshot(analyze_request("image", &tiny_png())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = response_json(response).await;
    assert_eq!(json["error"], "no face found");
    // Error responses never carry success fields
    assert!(json.get("emotion").is_none());
    assert!(json.get("probabilities").is_none());
}

/// Test 6: unreachable classifier maps to 503
#[tokio::test]
async fn test_analyze_classifier_unreachable() {
    let app = test_app(StubBehavior::Unreachable);

    let response = app.oneshot(analyze_request("image", &tiny_png())).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = response_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("unreachable"));
}

/// Test 7: bytes that are not a decodable image are a 400
#[tokio::test]
async fn test_analyze_undecodable_bytes() {
    let app = test_app(StubBehavior::Scores(vec![("happy", 1.0)], "happy"));

    let response = app
        .oneshot(analyze_request("image", &[0x00, 0x01, 0x02, 0x03, 0x04]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert!(json["error"].as_str().is_some());
    assert!(json.get("probabilities").is_none());
}

/// Test 8: a multipart body without the `image` field is a 400
#[tokio::test]
async fn test_analyze_missing_image_field() {
    let app = test_app(StubBehavior::Scores(vec![("happy", 1.0)], "happy"));

    let response = app
        .oneshot(analyze_request("attachment", &tiny_png()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("image"));
}

/// Test 9: an empty `image` field is a 400
#[tokio::test]
async fn test_analyze_empty_image_field() {
    let app = test_app(StubBehavior::Scores(vec![("happy", 1.0)], "happy"));

    let response = app.oneshot(analyze_request("image", &[])).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("image"));
}

/// Test 10: a non-multipart request body still gets a JSON error
#[tokio::test]
async fn test_analyze_non_multipart_body() {
    let app = test_app(StubBehavior::Scores(vec![("happy", 1.0)], "happy"));

    let request = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"image": "zzz"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert!(json["error"].as_str().is_some());
}

/// Test 11: all-zero raw scores are an explicit error, not a success
#[tokio::test]
async fn test_analyze_zero_total_scores() {
    let app = test_app(StubBehavior::Scores(
        vec![("happy", 0.0), ("sad", 0.0), ("neutral", 0.0)],
        "happy",
    ));

    let response = app.oneshot(analyze_request("image", &tiny_png())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = response_json(response).await;
    assert_eq!(json["error"], "emotion scores sum to zero");
    assert!(json.get("probabilities").is_none());
}

/// Test 12: health endpoint responds
#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app(StubBehavior::Scores(vec![("happy", 1.0)], "happy"));

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["status"], "ok");
}
