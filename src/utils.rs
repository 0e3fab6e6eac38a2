// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Keep at most `max_chars` characters of `text`.
///
/// The cut always falls on a character boundary.
///
/// # Arguments
///
/// * `text` - Text to truncate
/// * `max_chars` - Maximum number of characters (Unicode scalar values)
///
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
