// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Prometheus metrics.
//!
//! Extraction outcomes and latencies, exposed on `GET /metrics`.

mod server;

use std::{sync::Arc, time::Duration};

use prometheus_client::{
    encoding::{text::encode, EncodeLabelSet, EncodeLabelValue},
    metrics::{
        counter::Counter,
        family::Family,
        histogram::{exponential_buckets, Histogram},
    },
    registry::Registry,
};

pub use server::build_routes;

/// Outcome of an extraction request.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Outcome {
    Success,
    Unauthorized,
    InvalidRequest,
    InvalidUrl,
    Failed,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct OutcomeLabels {
    outcome: Outcome,
}

/// Metrics of the digest node.
#[derive(Clone)]
pub struct DigestMetrics {
    requests: Family<OutcomeLabels, Counter>,
    duration: Histogram,
    registry: Arc<Registry>,
}

impl DigestMetrics {
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix("youtube_digest");

        let requests = Family::<OutcomeLabels, Counter>::default();
        registry.register(
            "extract_requests",
            "Extraction requests by outcome",
            requests.clone(),
        );

        let duration = Histogram::new(exponential_buckets(0.25, 2.0, 8));
        registry.register(
            "extract_duration_seconds",
            "Time spent processing extraction requests",
            duration.clone(),
        );

        Self {
            requests,
            duration,
            registry: Arc::new(registry),
        }
    }

    /// Count a request that did not reach processing.
    pub fn record(&self, outcome: Outcome) {
        self.requests
            .get_or_create(&OutcomeLabels { outcome })
            .inc();
    }

    /// Count a processed request and its latency.
    pub fn observe(&self, outcome: Outcome, elapsed: Duration) {
        self.record(outcome);
        self.duration.observe(elapsed.as_secs_f64());
    }

    /// Text exposition of every metric.
    pub fn encode(&self) -> Result<String, std::fmt::Error> {
        let mut body = String::new();
        encode(&mut body, &self.registry)?;
        Ok(body)
    }
}

impl Default for DigestMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let metrics = DigestMetrics::new();
        metrics.record(Outcome::Unauthorized);
        metrics.observe(Outcome::Success, Duration::from_millis(1500));
        metrics.observe(Outcome::Success, Duration::from_millis(300));

        let body = metrics.encode().unwrap();
        assert!(body.contains("youtube_digest_extract_requests_total{outcome=\"Success\"} 2"));
        assert!(body.contains("youtube_digest_extract_requests_total{outcome=\"Unauthorized\"} 1"));
        assert!(body.contains("youtube_digest_extract_duration_seconds_count 2"));
    }
}
