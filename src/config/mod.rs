// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Configuration.
//!
//! Settings are layered: a configuration file (dotenv, json, yaml or toml) first, then
//! the process environment on top. Keys are case-insensitive.

mod build;
mod params;

pub use build::{build_config, build_params, build_settings, DEFAULT_ENV_FILE};
pub use params::{format_proxy_url, Params};
