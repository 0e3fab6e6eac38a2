// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Transcripts.
//!

use serde::{Deserialize, Serialize};

/// One timed line of subtitles.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TranscriptSnippet {
    /// Text of the line.
    pub text: String,
    /// Start, in seconds.
    pub start: f64,
    /// Duration, in seconds.
    pub duration: f64,
}

/// Subtitles of a video in one language.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transcript {
    /// Video identifier.
    pub video_id: String,
    /// Language code, e.g. `fr`.
    pub language_code: String,
    /// Whether the track was generated by speech recognition.
    pub is_generated: bool,
    /// Timed lines.
    pub snippets: Vec<TranscriptSnippet>,
}

impl Transcript {
    /// Text of every snippet, joined by single spaces.
    pub fn text(&self) -> String {
        self.snippets
            .iter()
            .map(|snippet| snippet.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A caption track advertised by the player.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    /// URL of the timed text.
    pub base_url: String,
    /// Human readable name.
    pub name: String,
    /// Language code.
    pub language_code: String,
    /// Whether the track was generated by speech recognition.
    pub is_generated: bool,
}
