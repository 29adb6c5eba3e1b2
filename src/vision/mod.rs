// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision module for decoding uploaded face images
//!
//! Turns raw upload bytes into the RGB pixel matrix the emotion
//! classifier consumes. Format detection is magic-byte based so the
//! client-supplied filename and content type are never trusted.

pub mod image_utils;

pub use image_utils::{decode_rgb_image, detect_format, ImageError, ImageInfo};
