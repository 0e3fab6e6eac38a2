// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # HTTP surface.
//!
//! * `POST /api/v1/extract`: protected by the `X-RapidAPI-Proxy-Secret` header.
//! * `GET /metrics`: Prometheus exposition.
//!

pub mod errors;
pub mod handlers;

use std::sync::Arc;

use axum::{routing::post, Router};

use crate::{
    api::DigestApi,
    prometheus::{self, DigestMetrics},
};

pub use errors::ApiError;
pub use handlers::PROXY_SECRET_HEADER;

/// Shared state of the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<DigestApi>,
    pub api_secret_key: Arc<str>,
    pub metrics: DigestMetrics,
}

impl AppState {
    pub fn new(api: DigestApi, api_secret_key: &str, metrics: DigestMetrics) -> Self {
        Self {
            api: Arc::new(api),
            api_secret_key: Arc::from(api_secret_key),
            metrics,
        }
    }
}

/// Build the full router.
pub fn app(state: AppState) -> Router {
    let metrics = state.metrics.clone();
    Router::new()
        .route("/api/v1/extract", post(handlers::extract_endpoint))
        .with_state(state)
        .merge(prometheus::build_routes(metrics))
}
