// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::Path;

use config::FileFormat;

use crate::{error::DigestError, settings::DigestSettings};

use super::params::Params;

/// Dotenv file picked up from the working directory when no file is given.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Build the node settings.
///
/// # Arguments
///
/// * `env` - Read the process environment. Its values win over the file.
/// * `file` - Configuration file (dotenv, json, yaml or toml). When empty, `.env` is
///   loaded if present.
///
pub fn build_config(env: bool, file: &str) -> Result<DigestSettings, DigestError> {
    build_params(env, file).and_then(DigestSettings::try_from)
}

/// Build the node settings from the environment, a file and an optional port.
///
/// The port, typically given on the command line, wins over every other source.
pub fn build_settings(file: &str, port: Option<u16>) -> Result<DigestSettings, DigestError> {
    let mut params = build_params(true, file)?;
    if let Some(port) = port {
        params = params.with_port(port);
    }
    DigestSettings::try_from(params)
}

/// Collect the raw parameters without applying defaults.
pub fn build_params(env: bool, file: &str) -> Result<Params, DigestError> {
    // Env configuration
    let mut params_env = Params::default();
    if env {
        params_env = Params::from_env()?;
    }

    // File configuration (dotenv, json, yaml or toml)
    let params_file = if file.is_empty() {
        Params::from_source(
            config::File::new(DEFAULT_ENV_FILE, FileFormat::Ini).required(false),
        )?
    } else if is_dotenv(file) {
        log::debug!("Loading dotenv configuration from {}", file);
        Params::from_source(config::File::new(file, FileFormat::Ini))?
    } else {
        log::debug!("Loading configuration from {}", file);
        Params::from_source(config::File::with_name(file))?
    };

    // Mix configurations.
    Ok(params_env.mix_config(params_file))
}

fn is_dotenv(file: &str) -> bool {
    let path = Path::new(file);
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    name.starts_with(".env")
        || matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("env") | Some("ini")
        )
}
