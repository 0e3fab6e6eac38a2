// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//!
//! # API
//!
//! This module contains the digest API: from a YouTube URL to a structured digest.

use std::{sync::Arc, time::Duration};

use crate::{
    error::DigestError,
    model::DigestResponse,
    settings::DigestSettings,
    summarizer::{OpenRouterSummarizer, Summarizer},
    utils::truncate_chars,
    youtube::{extract_video_id, TranscriptSource, YoutubeTranscriptClient},
};

/// Characters of transcript handed to the LLM.
pub const MAX_TRANSCRIPT_CHARS: usize = 12_000;

/// Digest API.
#[derive(Clone)]
pub struct DigestApi {
    transcripts: Arc<dyn TranscriptSource>,
    summarizer: Arc<dyn Summarizer>,
    extract_timeout: Duration,
    llm_timeout: Duration,
}

/// Digest API implementation.
impl DigestApi {
    /// Create a new digest API.
    pub fn new(
        transcripts: Arc<dyn TranscriptSource>,
        summarizer: Arc<dyn Summarizer>,
        extract_timeout: Duration,
        llm_timeout: Duration,
    ) -> Self {
        Self {
            transcripts,
            summarizer,
            extract_timeout,
            llm_timeout,
        }
    }

    /// Create a digest API talking to YouTube and the configured LLM gateway.
    ///
    /// # Errors
    ///
    /// * `DigestError::Config` - An HTTP client could not be built.
    ///
    pub fn from_settings(settings: &DigestSettings) -> Result<Self, DigestError> {
        let transcripts = YoutubeTranscriptClient::new(&settings.youtube)?;
        let summarizer = OpenRouterSummarizer::new(&settings.llm)?;
        log::info!("Using model {}", summarizer.model());
        Ok(Self::new(
            Arc::new(transcripts),
            Arc::new(summarizer),
            settings.youtube.timeout,
            settings.llm.timeout,
        ))
    }

    /// Extract the subtitles of a video and turn them into a digest.
    ///
    /// The transcript is cut to [`MAX_TRANSCRIPT_CHARS`] characters before being sent
    /// to the LLM.
    ///
    /// # Arguments
    ///
    /// * `url` - YouTube URL
    ///
    /// # Errors
    ///
    /// * `DigestError::InvalidVideoId` - No video id in the URL.
    /// * `DigestError::Transcript` - Subtitles could not be extracted.
    /// * `DigestError::TranscriptTimeout` - Extraction took longer than allowed.
    /// * `DigestError::EmptyTranscript` - Subtitles carry no text.
    /// * `DigestError::Llm` - LLM call failed or returned an invalid digest.
    /// * `DigestError::LlmTimeout` - LLM call took longer than allowed.
    ///
    pub async fn process_youtube_url(&self, url: &str) -> Result<DigestResponse, DigestError> {
        let video_id = extract_video_id(url)?;

        let transcript =
            tokio::time::timeout(self.extract_timeout, self.transcripts.fetch_transcript(&video_id))
                .await
                .map_err(|_| DigestError::TranscriptTimeout(self.extract_timeout.as_secs_f64()))?
                .map_err(|e| match e {
                    DigestError::Transcript(_) => e,
                    other => DigestError::Transcript(other.to_string()),
                })?;

        let text = transcript.text();
        if text.trim().is_empty() {
            return Err(DigestError::EmptyTranscript);
        }
        let text = truncate_chars(&text, MAX_TRANSCRIPT_CHARS);
        log::debug!(
            "Transcript for {} ready: {} characters sent to the LLM",
            video_id,
            text.chars().count()
        );

        // The player response carries no title we rely on.
        let video_title = format!("Video ID: {}", video_id);

        tokio::time::timeout(self.llm_timeout, self.summarizer.summarize(&video_title, text))
            .await
            .map_err(|_| DigestError::LlmTimeout(self.llm_timeout.as_secs_f64()))?
            .map_err(|e| match e {
                DigestError::Llm(_) => e,
                other => DigestError::Llm(other.to_string()),
            })
    }
}
