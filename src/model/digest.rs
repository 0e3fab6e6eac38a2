// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Structured digest.
//!

use serde::{Deserialize, Serialize};

/// A chapter of the video.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Chapter {
    /// Chapter start, e.g. `00:00`.
    pub timestamp: String,
    /// Topic covered in the chapter.
    pub topic: String,
}

/// Digest produced for a video.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DigestResponse {
    /// Title of the video, or a generated one.
    pub title: String,
    /// Concise summary of the content.
    pub summary: String,
    /// Chapters of the video.
    pub chapters: Vec<Chapter>,
    /// Relevant keywords.
    pub keywords: Vec<String>,
}
