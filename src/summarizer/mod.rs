// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Summarizer module.
//!
//! Turns a raw transcript into a [`DigestResponse`] with an LLM.

pub mod openrouter;

use async_trait::async_trait;

use crate::{error::DigestError, model::DigestResponse};

pub use openrouter::OpenRouterSummarizer;

/// System prompt sent with every transcript.
pub const SYSTEM_PROMPT: &str = r#"You are a backend data extraction API. Your sole and unique role is to analyze a raw video transcript and return a strictly formatted JSON object.

CRITICAL RULES:
1. THE ENTIRE JSON OUTPUT (title, summary, topics, keywords) MUST BE WRITTEN IN ENGLISH, REGARDLESS OF THE VIDEO'S ORIGINAL LANGUAGE.
2. You must NOT generate any conversational text before or after the JSON.
3. You must NOT use markdown tags like ```json or ```. Start directly with { and end with }.
4. The response MUST EXACTLY match the following structure:

{
  "title": "A catchy title deduced from the video (IN ENGLISH)",
  "summary": "A clear and concise summary (maximum 3 sentences) (IN ENGLISH)",
  "chapters": [
    {
      "timestamp": "MM:SS",
      "topic": "The topic covered in this part (IN ENGLISH)"
    }
  ],
  "keywords": ["keyword 1", "keyword 2", "keyword 3", "keyword 4", "keyword 5"]
}

PROCESSING INSTRUCTIONS:
- If the transcript lacks explicit timestamps, deduce logical chapters and put "00:00" for the first one, then estimate or leave empty for subsequent ones if impossible to determine.
- Return ONLY the valid JSON object."#;

/// LLM backed summarizer.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce the digest of a transcript.
    ///
    /// # Arguments
    ///
    /// * `video_title` - Title given to the model as context
    /// * `transcript` - Raw transcript text
    ///
    /// # Errors
    ///
    /// * `DigestError::Llm` - The call failed or the answer is not a valid digest.
    ///
    async fn summarize(
        &self,
        video_title: &str,
        transcript: &str,
    ) -> Result<DigestResponse, DigestError>;

    /// Model used for the completions.
    fn model(&self) -> &str;
}

/// User message carrying the transcript.
pub fn user_message(video_title: &str, transcript: &str) -> String {
    format!(
        "Video title: {}\n\nRaw transcript:\n{}",
        video_title, transcript
    )
}
