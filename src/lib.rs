// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod node;
mod prometheus;
pub mod settings;
pub mod summarizer;
mod utils;
pub mod youtube;
pub use clap;

pub use api::DigestApi;
pub use error::DigestError;
pub use node::DigestNode;
pub use prometheus::{DigestMetrics, Outcome};
pub use settings::DigestSettings;
