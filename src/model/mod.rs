// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Data model for the digest service.
//!
//! This module contains the data model for the digest service.
//!
//! ## Data model
//!
//! The data model is composed of the following elements:
//!
//! * [`ExtractRequest`]: body of an extraction request.
//! * [`DigestResponse`]: structured digest returned to the client.
//! * [`Transcript`]: subtitles fetched for a video.
//!

pub mod digest;
pub mod request;
pub mod transcript;

pub use digest::*;
pub use request::*;
pub use transcript::*;
