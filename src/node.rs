// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::{
    api::DigestApi,
    error::DigestError,
    http::{app, AppState},
    prometheus::DigestMetrics,
    settings::{DigestSettings, ServerSettings},
};

/// Digest node: the HTTP server and everything behind it.
pub struct DigestNode {
    /// Listener settings.
    server: ServerSettings,
    /// Handler state.
    state: AppState,
    /// Cancellation token.
    cancellation: CancellationToken,
}

/// Implementation for `DigestNode`.
impl DigestNode {
    /// Build a new `DigestNode`.
    ///
    /// # Arguments
    ///
    /// * `settings` - Digest settings
    ///
    /// # Returns
    ///
    /// * `Result<Self, DigestError>` - `DigestNode`
    ///
    pub fn build(settings: DigestSettings) -> Result<Self, DigestError> {
        let api = DigestApi::from_settings(&settings)?;
        Ok(Self::with_api(settings.server, api, &settings.api_secret_key))
    }

    /// Build a `DigestNode` around an existing API.
    pub fn with_api(server: ServerSettings, api: DigestApi, api_secret_key: &str) -> Self {
        Self {
            server,
            state: AppState::new(api, api_secret_key, DigestMetrics::new()),
            cancellation: CancellationToken::new(),
        }
    }

    /// Router serving the node endpoints.
    pub fn router(&self) -> Router {
        app(self.state.clone())
    }

    /// Token cancelled when the node must stop.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Bind the node to the provided shutdown signal.
    ///
    /// # Arguments
    ///
    /// * `shutdown_signal` - Shutdown signal
    ///
    pub fn bind_with_shutdown(&self, shutdown_signal: impl Future + Send + 'static) {
        let cancellation_token = self.cancellation.clone();
        tokio::spawn(async move {
            shutdown_signal.await;
            log::info!("Shutdown signal received");
            cancellation_token.cancel();
        });
    }

    /// Open the listener on the configured address.
    pub async fn bind(&self) -> Result<TcpListener, DigestError> {
        let address = (self.server.host.as_str(), self.server.port);
        TcpListener::bind(address).await.map_err(|error| {
            DigestError::Server(format!(
                "Failed to bind {}:{}: {}",
                self.server.host, self.server.port, error
            ))
        })
    }

    /// Run the node.
    pub async fn run(self) -> Result<(), DigestError> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until cancellation.
    pub async fn serve(self, listener: TcpListener) -> Result<(), DigestError> {
        if let Ok(address) = listener.local_addr() {
            log::info!("Listening on http://{}", address);
        }
        let cancellation = self.cancellation.clone();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { cancellation.cancelled().await })
            .await
            .map_err(|error| DigestError::Server(error.to_string()))?;
        log::info!("Stopped");
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::api::tests::{FakeSummarizer, FakeTranscripts};

    fn local_node() -> DigestNode {
        let api = DigestApi::new(
            Arc::new(FakeTranscripts::with_text("x")),
            Arc::new(FakeSummarizer::ok()),
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        let server = ServerSettings {
            host: "127.0.0.1".to_owned(),
            port: 0,
        };
        DigestNode::with_api(server, api, "secret")
    }

    #[tokio::test]
    async fn test_serve_until_shutdown() {
        let node = local_node();
        let listener = node.bind().await.unwrap();
        let address = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        node.bind_with_shutdown(rx);

        let handle = tokio::spawn(node.serve(listener));

        let body = reqwest::get(format!("http://{}/metrics", address))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("# EOF"));

        tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_bind_error() {
        let node = local_node();
        let listener = node.bind().await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let api = DigestApi::new(
            Arc::new(FakeTranscripts::with_text("x")),
            Arc::new(FakeSummarizer::ok()),
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        let busy = DigestNode::with_api(
            ServerSettings {
                host: "127.0.0.1".to_owned(),
                port,
            },
            api,
            "secret",
        );
        assert!(matches!(busy.run().await, Err(DigestError::Server(_))));
    }

    #[test]
    fn test_build_from_settings() {
        let mut settings = DigestSettings::default();
        settings.llm.api_key = "sk".to_owned();
        settings.api_secret_key = "secret".to_owned();
        assert!(DigestNode::build(settings).is_ok());
    }
}
