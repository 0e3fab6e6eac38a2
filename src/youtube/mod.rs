// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # YouTube module.
//!
//! This module contains everything needed to go from a YouTube URL to the subtitles of
//! the video:
//!
//! * [url](url/index.html): URL validation and video id extraction.
//! * [client](client/index.html): innertube client listing and fetching caption tracks.
//! * [parser](parser/index.html): caption track selection and timed text parsing.
//!

pub mod client;
pub mod parser;
pub mod url;

use async_trait::async_trait;

use crate::{error::DigestError, model::Transcript};

pub use client::YoutubeTranscriptClient;
pub use url::{extract_video_id, is_valid_youtube_url};

/// Languages tried, in order, before falling back to any available track.
pub const PREFERRED_LANGUAGES: [&str; 2] = ["fr", "en"];

/// Source of video transcripts.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the subtitles of a video.
    ///
    /// # Arguments
    ///
    /// * `video_id` - 11 character YouTube video id
    ///
    /// # Errors
    ///
    /// * `DigestError::Transcript` - The subtitles could not be extracted.
    ///
    async fn fetch_transcript(&self, video_id: &str) -> Result<Transcript, DigestError>;
}
