// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Extraction request.
//!

use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/extract`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExtractRequest {
    /// URL of the YouTube video, e.g. `https://www.youtube.com/watch?v=...` or
    /// `https://youtu.be/...`.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_is_required() {
        let request: ExtractRequest =
            serde_json::from_str(r#"{"url": "https://youtu.be/dQw4w9WgXcQ"}"#).unwrap();
        assert_eq!(request.url, "https://youtu.be/dQw4w9WgXcQ");

        assert!(serde_json::from_str::<ExtractRequest>("{}").is_err());
        assert!(serde_json::from_str::<ExtractRequest>(r#"{"url": 42}"#).is_err());
    }
}
