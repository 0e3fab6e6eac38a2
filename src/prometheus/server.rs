// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use super::DigestMetrics;
use crate::http::ApiError;

const OPENMETRICS: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

pub async fn handler_prometheus_data(
    State(metrics): State<DigestMetrics>,
) -> Result<Response, ApiError> {
    let body = metrics.encode().map_err(|error| {
        log::error!("Failed to encode metrics: {}", error);
        ApiError::Metrics
    })?;
    Ok(([(CONTENT_TYPE, OPENMETRICS)], body).into_response())
}

pub fn build_routes(metrics: DigestMetrics) -> Router {
    Router::new()
        .route("/metrics", get(handler_prometheus_data))
        .with_state(metrics)
}
