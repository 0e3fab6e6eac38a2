// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # YouTube transcript client.
//!
//! Captions are listed through the innertube player API. The API key is scraped from the
//! watch page, the player response advertises the caption tracks, and the selected track
//! is downloaded as timed text.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{
    header::{ACCEPT_LANGUAGE, COOKIE},
    Client, Proxy,
};
use serde_json::{json, Value};

use super::{
    parser::{parse_caption_tracks, parse_timed_text, select_track},
    TranscriptSource, PREFERRED_LANGUAGES,
};
use crate::{
    error::DigestError,
    model::{CaptionTrack, Transcript},
    settings::YoutubeSettings,
};

/// Watch page.
pub const WATCH_URL: &str = "https://www.youtube.com/watch";
/// Innertube player endpoint.
pub const INNERTUBE_API_URL: &str = "https://www.youtube.com/youtubei/v1/player";

const CONSENT_ACTION: &str = "action=\"https://consent.youtube.com/s\"";
const RECAPTCHA: &str = "class=\"g-recaptcha\"";

static API_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("api key pattern")
});

static CONSENT_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"name="v" value="(.*?)""#).expect("consent pattern"));

/// Transcript source backed by youtube.com.
#[derive(Clone, Debug)]
pub struct YoutubeTranscriptClient {
    client: Client,
    watch_url: String,
    innertube_url: String,
    languages: Vec<String>,
}

impl YoutubeTranscriptClient {
    /// Build a new client.
    ///
    /// # Arguments
    ///
    /// * `settings` - YouTube settings
    ///
    /// # Errors
    ///
    /// * `DigestError::Config` - The proxy or the HTTP client could not be set up.
    ///
    pub fn new(settings: &YoutubeSettings) -> Result<Self, DigestError> {
        let mut builder = Client::builder();
        if let Some(proxy_url) = &settings.proxy_url {
            // The same HTTP proxy carries both http and https traffic.
            let proxy = Proxy::all(proxy_url.as_str())
                .map_err(|e| DigestError::Config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
            log::info!("YouTube traffic goes through the configured proxy");
        }
        let client = builder
            .build()
            .map_err(|e| DigestError::Config(format!("Error building HTTP client: {}", e)))?;

        Ok(Self {
            client,
            watch_url: WATCH_URL.to_owned(),
            innertube_url: INNERTUBE_API_URL.to_owned(),
            languages: PREFERRED_LANGUAGES.iter().map(|l| (*l).to_owned()).collect(),
        })
    }

    /// Point the client to other endpoints.
    pub fn with_endpoints(mut self, watch_url: &str, innertube_url: &str) -> Self {
        self.watch_url = watch_url.to_owned();
        self.innertube_url = innertube_url.to_owned();
        self
    }

    /// Replace the preferred languages.
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    /// List the caption tracks of a video.
    pub async fn list_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>, DigestError> {
        let html = self.fetch_video_html(video_id).await?;
        let api_key = extract_api_key(&html, video_id)?;
        let data = self.fetch_innertube_data(video_id, &api_key).await?;
        assert_playability(&data["playabilityStatus"], video_id)?;

        let renderer = &data["captions"]["playerCaptionsTracklistRenderer"];
        let tracks = parse_caption_tracks(renderer);
        if tracks.is_empty() {
            return Err(transcript_error(video_id, "subtitles are disabled"));
        }
        Ok(tracks)
    }

    async fn fetch_video_html(&self, video_id: &str) -> Result<String, DigestError> {
        let html = self.fetch_watch_page(video_id, None).await?;
        if !html.contains(CONSENT_ACTION) {
            return Ok(html);
        }

        log::debug!("Consent page served for {}, retrying with cookie", video_id);
        let value = CONSENT_VALUE
            .captures(&html)
            .and_then(|captures| captures.get(1))
            .map(|value| value.as_str().to_owned())
            .ok_or_else(|| transcript_error(video_id, "failed to create a consent cookie"))?;
        let html = self
            .fetch_watch_page(video_id, Some(format!("CONSENT=YES+{}", value)))
            .await?;
        if html.contains(CONSENT_ACTION) {
            return Err(transcript_error(
                video_id,
                "the consent cookie was not accepted",
            ));
        }
        Ok(html)
    }

    async fn fetch_watch_page(
        &self,
        video_id: &str,
        cookie: Option<String>,
    ) -> Result<String, DigestError> {
        let mut request = self
            .client
            .get(&self.watch_url)
            .query(&[("v", video_id)])
            .header(ACCEPT_LANGUAGE, "en-US");
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        request
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| transcript_error(video_id, &e.to_string()))?
            .text()
            .await
            .map_err(|e| transcript_error(video_id, &e.to_string()))
    }

    async fn fetch_innertube_data(
        &self,
        video_id: &str,
        api_key: &str,
    ) -> Result<Value, DigestError> {
        let body = json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38"
                }
            },
            "videoId": video_id
        });

        self.client
            .post(&self.innertube_url)
            .query(&[("key", api_key)])
            .header(ACCEPT_LANGUAGE, "en-US")
            .json(&body)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| transcript_error(video_id, &e.to_string()))?
            .json()
            .await
            .map_err(|e| transcript_error(video_id, &e.to_string()))
    }

    async fn fetch_track(
        &self,
        video_id: &str,
        track: &CaptionTrack,
    ) -> Result<Transcript, DigestError> {
        if track.base_url.contains("&exp=xpe") {
            return Err(transcript_error(
                video_id,
                "a PO token is required to fetch this transcript",
            ));
        }

        let xml = self
            .client
            .get(&track.base_url)
            .header(ACCEPT_LANGUAGE, "en-US")
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| transcript_error(video_id, &e.to_string()))?
            .text()
            .await
            .map_err(|e| transcript_error(video_id, &e.to_string()))?;

        Ok(Transcript {
            video_id: video_id.to_owned(),
            language_code: track.language_code.clone(),
            is_generated: track.is_generated,
            snippets: parse_timed_text(&xml),
        })
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptClient {
    async fn fetch_transcript(&self, video_id: &str) -> Result<Transcript, DigestError> {
        let tracks = self.list_tracks(video_id).await?;
        let track = select_track(&tracks, &self.languages)
            .ok_or_else(|| transcript_error(video_id, "no transcript available"))?;
        log::debug!(
            "Fetching {} transcript ({}) for {}",
            track.language_code,
            if track.is_generated { "generated" } else { "manual" },
            video_id
        );
        self.fetch_track(video_id, track).await
    }
}

fn extract_api_key(html: &str, video_id: &str) -> Result<String, DigestError> {
    if let Some(key) = API_KEY.captures(html).and_then(|captures| captures.get(1)) {
        return Ok(key.as_str().to_owned());
    }
    if html.contains(RECAPTCHA) {
        return Err(transcript_error(
            video_id,
            "YouTube is blocking requests from this IP",
        ));
    }
    Err(transcript_error(video_id, "could not extract the innertube API key"))
}

fn assert_playability(status: &Value, video_id: &str) -> Result<(), DigestError> {
    let Some(code) = status["status"].as_str() else {
        return Ok(());
    };
    if code == "OK" {
        return Ok(());
    }
    let reason = status["reason"].as_str().unwrap_or("no reason given");
    if code == "LOGIN_REQUIRED" {
        return Err(transcript_error(
            video_id,
            &format!("sign-in required (bot check or age restriction): {}", reason),
        ));
    }
    Err(transcript_error(
        video_id,
        &format!("video is unplayable ({}): {}", code, reason),
    ))
}

fn transcript_error(video_id: &str, reason: &str) -> DigestError {
    DigestError::Transcript(format!("video {}: {}", video_id, reason))
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    const VIDEO_ID: &str = "dQw4w9WgXcQ";

    const TIMED_TEXT: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0" dur="1.5">Bonjour &amp;amp; bienvenue</text><text start="1.5" dur="2">sur la cha&amp;#238;ne</text></transcript>"#;

    fn watch_page() -> String {
        r#"<html><script>ytcfg.set({"INNERTUBE_API_KEY": "AIzaTestKey_-1"});</script></html>"#
            .to_owned()
    }

    fn client(server: &MockServer) -> YoutubeTranscriptClient {
        YoutubeTranscriptClient::new(&YoutubeSettings {
            proxy_url: None,
            timeout: std::time::Duration::from_secs(5),
        })
        .unwrap()
        .with_endpoints(&server.url("/watch"), &server.url("/youtubei/v1/player"))
    }

    #[tokio::test]
    async fn test_fetch_transcript() {
        let server = MockServer::start_async().await;
        let watch = server
            .mock_async(|when, then| {
                when.method(GET).path("/watch").query_param("v", VIDEO_ID);
                then.status(200).body(watch_page());
            })
            .await;
        let player = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/youtubei/v1/player")
                    .query_param("key", "AIzaTestKey_-1");
                then.status(200).json_body(json!({
                    "playabilityStatus": {"status": "OK"},
                    "captions": {
                        "playerCaptionsTracklistRenderer": {
                            "captionTracks": [
                                {
                                    "baseUrl": server.url("/timedtext?lang=en"),
                                    "name": {"runs": [{"text": "English"}]},
                                    "languageCode": "en"
                                },
                                {
                                    "baseUrl": server.url("/timedtext?lang=fr&fmt=srv3"),
                                    "name": {"runs": [{"text": "French (auto-generated)"}]},
                                    "languageCode": "fr",
                                    "kind": "asr"
                                }
                            ]
                        }
                    }
                }));
            })
            .await;
        let timed_text = server
            .mock_async(|when, then| {
                when.method(GET).path("/timedtext").query_param("lang", "fr");
                then.status(200).body(TIMED_TEXT);
            })
            .await;

        let transcript = client(&server).fetch_transcript(VIDEO_ID).await.unwrap();

        watch.assert_async().await;
        player.assert_async().await;
        timed_text.assert_async().await;
        assert_eq!(transcript.language_code, "fr");
        assert!(transcript.is_generated);
        assert_eq!(transcript.text(), "Bonjour & bienvenue sur la chaîne");
    }

    #[tokio::test]
    async fn test_consent_page_is_accepted() {
        let server = MockServer::start_async().await;
        let consent = server
            .mock_async(|when, then| {
                when.method(GET).path("/watch").header_missing("cookie");
                then.status(200).body(
                    r#"<form action="https://consent.youtube.com/s"><input name="v" value="cb.20240101"></form>"#,
                );
            })
            .await;
        let accepted = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/watch")
                    .header("cookie", "CONSENT=YES+cb.20240101");
                then.status(200).body(watch_page());
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/youtubei/v1/player");
                then.status(200)
                    .json_body(json!({"playabilityStatus": {"status": "OK"}}));
            })
            .await;

        let err = client(&server).list_tracks(VIDEO_ID).await.unwrap_err();

        consent.assert_async().await;
        accepted.assert_async().await;
        assert_eq!(
            err,
            DigestError::Transcript(format!("video {}: subtitles are disabled", VIDEO_ID))
        );
    }

    #[tokio::test]
    async fn test_consent_cookie_rejected() {
        let server = MockServer::start_async().await;
        let consent = server
            .mock_async(|when, then| {
                when.method(GET).path("/watch");
                then.status(200).body(
                    r#"<form action="https://consent.youtube.com/s"><input name="v" value="cb.20240101"></form>"#,
                );
            })
            .await;

        let err = client(&server).list_tracks(VIDEO_ID).await.unwrap_err();

        consent.assert_calls_async(2).await;
        assert_eq!(
            err,
            DigestError::Transcript(format!(
                "video {}: the consent cookie was not accepted",
                VIDEO_ID
            ))
        );
    }

    #[tokio::test]
    async fn test_po_token_required() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/watch");
                then.status(200).body(watch_page());
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/youtubei/v1/player");
                then.status(200).json_body(json!({
                    "playabilityStatus": {"status": "OK"},
                    "captions": {
                        "playerCaptionsTracklistRenderer": {
                            "captionTracks": [{
                                "baseUrl": server.url("/timedtext?lang=fr&exp=xpe"),
                                "name": {"simpleText": "French"},
                                "languageCode": "fr"
                            }]
                        }
                    }
                }));
            })
            .await;
        let timed_text = server
            .mock_async(|when, then| {
                when.method(GET).path("/timedtext");
                then.status(200).body(TIMED_TEXT);
            })
            .await;

        let err = client(&server).fetch_transcript(VIDEO_ID).await.unwrap_err();

        timed_text.assert_calls_async(0).await;
        assert_eq!(
            err,
            DigestError::Transcript(format!(
                "video {}: a PO token is required to fetch this transcript",
                VIDEO_ID
            ))
        );
    }

    #[tokio::test]
    async fn test_unplayable_video() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/watch");
                then.status(200).body(watch_page());
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/youtubei/v1/player");
                then.status(200).json_body(json!({
                    "playabilityStatus": {
                        "status": "ERROR",
                        "reason": "This video is unavailable"
                    }
                }));
            })
            .await;

        let err = client(&server).fetch_transcript(VIDEO_ID).await.unwrap_err();
        assert_eq!(
            err,
            DigestError::Transcript(format!(
                "video {}: video is unplayable (ERROR): This video is unavailable",
                VIDEO_ID
            ))
        );
    }

    #[test]
    fn test_extract_api_key() {
        assert_eq!(
            extract_api_key(&watch_page(), VIDEO_ID).unwrap(),
            "AIzaTestKey_-1"
        );

        let err = extract_api_key(r#"<div class="g-recaptcha"></div>"#, VIDEO_ID).unwrap_err();
        assert!(err.to_string().contains("blocking"));

        let err = extract_api_key("<html></html>", VIDEO_ID).unwrap_err();
        assert!(err.to_string().contains("innertube API key"));
    }

    #[test]
    fn test_assert_playability() {
        assert!(assert_playability(&json!(null), VIDEO_ID).is_ok());
        assert!(assert_playability(&json!({"status": "OK"}), VIDEO_ID).is_ok());

        let err = assert_playability(
            &json!({"status": "LOGIN_REQUIRED", "reason": "Sign in to confirm your age"}),
            VIDEO_ID,
        )
        .unwrap_err();
        assert!(err.to_string().contains("sign-in required"));
    }

    #[test]
    fn test_invalid_proxy() {
        let settings = YoutubeSettings {
            proxy_url: Some("http://[::1".to_owned()),
            timeout: std::time::Duration::from_secs(1),
        };
        assert!(matches!(
            YoutubeTranscriptClient::new(&settings),
            Err(DigestError::Config(_))
        ));
    }
}
