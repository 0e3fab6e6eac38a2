// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # YouTube URLs.
//!

use std::sync::LazyLock;

use regex::Regex;

use crate::error::DigestError;

static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(https?://)?(www\.)?",
        r"(youtube|youtu|youtube-nocookie)\.(com|be)/",
        r"(watch\?v=|embed/|v/|.+\?v=)?([^&=%\?]{11})",
    ))
    .expect("YouTube URL pattern")
});

static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").expect("video id pattern"));

/// Basic check that `url` points to a YouTube video.
///
/// Only the beginning of the string has to match; trailing query parameters are accepted.
pub fn is_valid_youtube_url(url: &str) -> bool {
    YOUTUBE_URL.is_match(url)
}

/// Extract the 11 character video id from a YouTube URL.
///
/// # Errors
///
/// * `DigestError::InvalidVideoId` - No id could be found.
///
pub fn extract_video_id(url: &str) -> Result<String, DigestError> {
    VIDEO_ID
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_owned())
        .ok_or(DigestError::InvalidVideoId)
}
