// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # OpenAI-compatible summarizer.
//!
//! Works against any `/chat/completions` endpoint; OpenRouter by default.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{user_message, Summarizer, SYSTEM_PROMPT};
use crate::{error::DigestError, model::DigestResponse, settings::LlmSettings};

#[derive(Deserialize)]
struct Completion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

/// Summarizer calling an OpenAI-compatible chat-completions API.
#[derive(Clone, Debug)]
pub struct OpenRouterSummarizer {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenRouterSummarizer {
    /// Build a new summarizer.
    pub fn new(settings: &LlmSettings) -> Result<Self, DigestError> {
        let client = Client::builder()
            .build()
            .map_err(|e| DigestError::Config(format!("Error building HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        })
    }
}

#[async_trait]
impl Summarizer for OpenRouterSummarizer {
    async fn summarize(
        &self,
        video_title: &str,
        transcript: &str,
    ) -> Result<DigestResponse, DigestError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": user_message(video_title, transcript)}
            ],
            "response_format": {"type": "json_object"}
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DigestError::Llm(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_owned());
            return Err(DigestError::Llm(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let completion: Completion = response
            .json()
            .await
            .map_err(|e| DigestError::Llm(format!("Failed to parse response: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| DigestError::Llm("Empty completion".to_owned()))?;

        serde_json::from_str(&content)
            .map_err(|e| DigestError::Llm(format!("Invalid digest: {}", e)))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
