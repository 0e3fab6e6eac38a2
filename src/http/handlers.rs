// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use serde_json::Value;

use super::{errors::ApiError, AppState};
use crate::{
    error::DigestError,
    model::{DigestResponse, ExtractRequest},
    prometheus::Outcome,
    youtube::is_valid_youtube_url,
};

/// Header carrying the secret shared with the API gateway.
pub const PROXY_SECRET_HEADER: &str = "X-RapidAPI-Proxy-Secret";

/// `POST /api/v1/extract`
///
/// The body is decoded first: malformed JSON is rejected with 422 whatever the secret.
/// The secret is checked next, then the shape of the request.
pub async fn extract_endpoint(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DigestResponse>, ApiError> {
    let payload = decode_body(&headers, &body)
        .inspect_err(|_| state.metrics.record(Outcome::InvalidRequest))?;

    verify_api_key(&state, &headers)?;

    let request = parse_request(payload)
        .inspect_err(|_| state.metrics.record(Outcome::InvalidRequest))?;

    if !is_valid_youtube_url(&request.url) {
        state.metrics.record(Outcome::InvalidUrl);
        return Err(ApiError::InvalidUrl);
    }

    let started = Instant::now();
    let result = state.api.process_youtube_url(&request.url).await;
    let elapsed = started.elapsed();

    match result {
        Ok(digest) => {
            state.metrics.observe(Outcome::Success, elapsed);
            log::info!("Digest built for {} in {:?}", request.url, elapsed);
            Ok(Json(digest))
        }
        Err(error) => {
            state.metrics.observe(Outcome::Failed, elapsed);
            log_failure(&request.url, &error);
            Err(ApiError::from(error))
        }
    }
}

/// Reject requests that do not come through the API gateway.
pub fn verify_api_key(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let provided = headers
        .get(PROXY_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    match provided {
        Some(secret) if !secret.is_empty() && secret == &*state.api_secret_key => Ok(()),
        _ => {
            state.metrics.record(Outcome::Unauthorized);
            Err(ApiError::Unauthorized)
        }
    }
}

/// Decode the body as JSON when it is declared as JSON or not declared at all.
///
/// Returns `None` for an empty body or another content type.
fn decode_body(headers: &HeaderMap, body: &[u8]) -> Result<Option<Value>, ApiError> {
    if body.is_empty() || !is_json_content(headers) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|error| ApiError::InvalidBody(format!("JSON decode error: {}", error)))
}

fn parse_request(payload: Option<Value>) -> Result<ExtractRequest, ApiError> {
    let payload =
        payload.ok_or_else(|| ApiError::InvalidBody("Expected a JSON request body".to_owned()))?;
    serde_json::from_value(payload)
        .map_err(|error| ApiError::InvalidBody(format!("Invalid request body: {}", error)))
}

fn is_json_content(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE) else {
        return true;
    };
    content_type
        .to_str()
        .ok()
        .and_then(|value| value.parse::<mime::Mime>().ok())
        .is_some_and(|parsed| {
            parsed.type_() == mime::APPLICATION
                && (parsed.subtype() == mime::JSON || parsed.suffix() == Some(mime::JSON))
        })
}

fn log_failure(url: &str, error: &DigestError) {
    match error {
        DigestError::TranscriptTimeout(_) | DigestError::LlmTimeout(_) => {
            log::warn!("Timeout while processing {}: {}", url, error)
        }
        _ => log::error!("Failed to process {}: {}", url, error),
    }
}
