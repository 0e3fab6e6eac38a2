// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Digest errors.
//!
//! This module contains the different errors that can be returned by the digest service.
//!

use thiserror::Error;

/// Digest service errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DigestError {
    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),
    /// The URL does not carry a recognizable video id.
    #[error("Invalid YouTube URL or video ID not found.")]
    InvalidVideoId,
    /// Subtitles could not be extracted.
    #[error("Error while extracting subtitles: {0}")]
    Transcript(String),
    /// Subtitle extraction exceeded its deadline.
    #[error("Subtitle extraction exceeded the allotted time ({0}s). Please retry.")]
    TranscriptTimeout(f64),
    /// The extracted subtitles contain no text.
    #[error("The extracted subtitles are empty.")]
    EmptyTranscript,
    /// LLM call or digest validation failed.
    #[error("Error during the LLM call or JSON validation: {0}")]
    Llm(String),
    /// LLM call exceeded its deadline.
    #[error("The LLM call exceeded the allotted time ({0}s). Please retry.")]
    LlmTimeout(f64),
    /// HTTP server error.
    #[error("Server error: {0}")]
    Server(String),
}
