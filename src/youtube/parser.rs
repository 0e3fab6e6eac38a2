// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Caption parsing.
//!
//! Caption tracks come from the innertube player response; their timed text is a small
//! XML document of `<text start=".." dur="..">` elements whose content may itself carry
//! escaped HTML.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::model::{CaptionTrack, TranscriptSnippet};

static TEXT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)").expect("text element pattern")
});

static ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([A-Za-z_:-]+)\s*=\s*"([^"]*)""#).expect("attribute pattern"));

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z]+);").expect("entity pattern")
});

static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("markup pattern"));

/// Read the caption tracks of a `playerCaptionsTracklistRenderer`.
pub fn parse_caption_tracks(renderer: &Value) -> Vec<CaptionTrack> {
    let Some(tracks) = renderer["captionTracks"].as_array() else {
        return vec![];
    };

    tracks
        .iter()
        .filter_map(|track| {
            let base_url = track["baseUrl"].as_str()?.replace("&fmt=srv3", "");
            let name = track["name"]["runs"][0]["text"]
                .as_str()
                .or_else(|| track["name"]["simpleText"].as_str())
                .unwrap_or_default()
                .to_owned();
            Some(CaptionTrack {
                base_url,
                name,
                language_code: track["languageCode"].as_str().unwrap_or_default().to_owned(),
                is_generated: track["kind"].as_str() == Some("asr"),
            })
        })
        .collect()
}

/// Pick the track to download.
///
/// Languages are tried in order; for each one a manually created track wins over a
/// generated one. Without any preferred language the first generated track is used,
/// then the first manual one.
pub fn select_track<'a, S: AsRef<str>>(
    tracks: &'a [CaptionTrack],
    languages: &[S],
) -> Option<&'a CaptionTrack> {
    for language in languages {
        let language = language.as_ref();
        for generated in [false, true] {
            if let Some(track) = tracks
                .iter()
                .find(|track| track.language_code == language && track.is_generated == generated)
            {
                return Some(track);
            }
        }
    }
    tracks
        .iter()
        .find(|track| track.is_generated)
        .or_else(|| tracks.first())
}

/// Parse a timed text document into snippets.
///
/// Elements without text are dropped. Inline markup is removed.
pub fn parse_timed_text(xml: &str) -> Vec<TranscriptSnippet> {
    TEXT_ELEMENT
        .captures_iter(xml)
        .filter_map(|element| {
            let raw = element.get(2)?.as_str();
            if raw.is_empty() {
                return None;
            }
            let attributes = element.get(1).map(|m| m.as_str()).unwrap_or_default();
            // XML decoding exposes the HTML tags, which go before the HTML decoding.
            let text = unescape_xml(raw);
            let text = MARKUP.replace_all(&text, "");
            let text = html_escape::decode_html_entities(&text).into_owned();
            Some(TranscriptSnippet {
                text,
                start: attribute(attributes, "start").unwrap_or(0.0),
                duration: attribute(attributes, "dur").unwrap_or(0.0),
            })
        })
        .collect()
}

fn attribute(attributes: &str, name: &str) -> Option<f64> {
    ATTRIBUTE
        .captures_iter(attributes)
        .find(|captures| &captures[1] == name)
        .and_then(|captures| captures[2].parse().ok())
}

/// Decode the XML predefined entities and character references. Other names are kept.
pub fn unescape_xml(text: &str) -> String {
    ENTITY
        .replace_all(text, |captures: &Captures| {
            let entity = &captures[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(decimal) = entity.strip_prefix('#') {
                decimal.parse().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    _ => None,
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| captures[0].to_owned())
        })
        .into_owned()
}
