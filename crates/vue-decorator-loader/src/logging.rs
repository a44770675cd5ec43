//! Logging setup.
//!
//! Logs go to stderr so that transformed output on stdout stays clean.
//!
//! ## Environment Variables
//!
//! 1. **`VUE_DECORATOR_LOADER_LOG`** (highest priority)
//! 2. **`RUST_LOG`**
//! 3. **Default**: `warn`, raised by `-v` / `-vv`

use std::env;
use tracing_subscriber::EnvFilter;

/// Loader-specific filter variable.
pub const LOG_ENV: &str = "VUE_DECORATOR_LOADER_LOG";

/// Installs the global subscriber. Does nothing if one is already installed.
pub fn init(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn env_filter(verbosity: u8) -> EnvFilter {
    for var in [LOG_ENV, "RUST_LOG"] {
        if let Ok(value) = env::var(var) {
            match EnvFilter::try_new(&value) {
                Ok(filter) => return filter,
                Err(e) => eprintln!("Warning: ignoring invalid {var}={value:?}: {e}"),
            }
        }
    }
    EnvFilter::new(directive_for_verbosity(verbosity))
}

fn directive_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}
