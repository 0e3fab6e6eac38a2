// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # HTTP errors.
//!
//! Every error answers with a `{"detail": "..."}` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::DigestError;

/// Message returned when the proxy secret is missing or wrong.
pub const UNAUTHORIZED_DETAIL: &str =
    "Unauthorized: Invalid or missing X-RapidAPI-Proxy-Secret header";
/// Message returned when the URL is not a YouTube one.
pub const INVALID_URL_DETAIL: &str = "The provided URL does not look like a valid YouTube URL.";
/// Message returned when the metrics cannot be encoded.
pub const METRICS_DETAIL: &str = "Error getting prometheus data.";

// Errors
#[derive(Debug)]
pub enum ApiError {
    /// Missing or invalid proxy secret.
    Unauthorized,
    /// Body could not be read as an extraction request.
    InvalidBody(String),
    /// URL is not a YouTube URL.
    InvalidUrl,
    /// Processing failed.
    Processing(DigestError),
    /// Metrics exposition failed.
    Metrics,
}

impl From<DigestError> for ApiError {
    fn from(error: DigestError) -> Self {
        ApiError::Processing(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, UNAUTHORIZED_DETAIL.to_owned()),
            ApiError::InvalidBody(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail),
            ApiError::InvalidUrl => (StatusCode::BAD_REQUEST, INVALID_URL_DETAIL.to_owned()),
            ApiError::Processing(error) => (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
            ApiError::Metrics => (StatusCode::INTERNAL_SERVER_ERROR, METRICS_DETAIL.to_owned()),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
