// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::time::Duration;

/// Default OpenAI-compatible gateway.
pub const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";
/// Default model requested from the gateway.
pub const DEFAULT_LLM_MODEL: &str = "openai/gpt-4o-mini";

/// Listener settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    /// Address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8000,
        }
    }
}

/// LLM gateway settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    /// Bearer key for the gateway.
    pub api_key: String,
    /// Base URL of the chat-completions API.
    pub base_url: String,
    /// Model id.
    pub model: String,
    /// Deadline for one completion.
    pub timeout: Duration,
}

/// YouTube extraction settings.
#[derive(Debug, Clone, PartialEq)]
pub struct YoutubeSettings {
    /// Optional proxy, already normalized to carry a scheme.
    pub proxy_url: Option<String>,
    /// Deadline for a full transcript extraction.
    pub timeout: Duration,
}

/// Specific settings for the digest node.
#[derive(Debug, Clone, PartialEq)]
pub struct DigestSettings {
    /// Listener settings.
    pub server: ServerSettings,
    /// Secret expected in `X-RapidAPI-Proxy-Secret`.
    pub api_secret_key: String,
    /// LLM settings.
    pub llm: LlmSettings,
    /// YouTube settings.
    pub youtube: YoutubeSettings,
}

impl Default for DigestSettings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            api_secret_key: String::default(),
            llm: LlmSettings {
                api_key: String::default(),
                base_url: DEFAULT_LLM_BASE_URL.to_owned(),
                model: DEFAULT_LLM_MODEL.to_owned(),
                timeout: Duration::from_secs(10),
            },
            youtube: YoutubeSettings {
                proxy_url: None,
                timeout: Duration::from_secs(15),
            },
        }
    }
}
