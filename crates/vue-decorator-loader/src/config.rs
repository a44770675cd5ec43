//! Loader options from an options file and the command line.

use crate::cli::Args;
use camino::{Utf8Path, Utf8PathBuf};
use decorator_transformer::LoaderOptions;
use std::fs;
use thiserror::Error;

/// Options file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The options file could not be read.
    #[error("failed to read options file {path}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The options file is not valid JSON for the loader options.
    #[error("invalid options file {path}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads loader options from a JSON file. Missing fields take their defaults.
pub fn load_options_file(path: &Utf8Path) -> Result<LoaderOptions, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the options for this run: the options file if given, then flags.
pub fn resolve_options(args: &Args) -> Result<LoaderOptions, ConfigError> {
    let mut options = match &args.config {
        Some(path) => load_options_file(path)?,
        None => LoaderOptions::default(),
    };

    if args.production {
        options.production = true;
    }
    if args.no_hot_reload {
        options.hot_reload = false;
    }
    if let Some(name) = &args.decorator_name {
        options.decorator_name = name.clone();
    }
    if let Some(name) = &args.template_param {
        options.template_parameter_name = name.clone();
    }
    if let Some(name) = &args.styles_param {
        options.styles_parameter_name = name.clone();
    }

    Ok(options)
}
