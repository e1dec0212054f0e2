//! Tracing setup for the command-line tool.
//!
//! `SVELTE_DTS_LOG` (falling back to `RUST_LOG`) selects the filter, using the
//! usual `RUST_LOG` syntax. Without either, only warnings are shown, which is
//! where unresolved type references are reported.
//!
//! `SVELTE_DTS_LOG_FORMAT=json` switches to one JSON object per event.
//!
//! ```bash
//! SVELTE_DTS_LOG=debug svelte-dts -i src/index.ts
//! SVELTE_DTS_LOG=svelte_dts::resolve=debug SVELTE_DTS_LOG_FORMAT=json svelte-dts -i src/index.ts
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

pub const LOG_ENV: &str = "SVELTE_DTS_LOG";
pub const LOG_FORMAT_ENV: &str = "SVELTE_DTS_LOG_FORMAT";

const DEFAULT_DIRECTIVE: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var(LOG_FORMAT_ENV).unwrap_or_default())
    }
}

fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var(LOG_ENV) {
        EnvFilter::builder().parse_lossy(val)
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(DEFAULT_DIRECTIVE)
    }
}

/// Install the global subscriber. Output goes to stderr.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = build_filter();

    let result = match LogFormat::from_env() {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_writer(std::io::stderr);
            Registry::default().with(filter).with(text_layer).try_init()
        }
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
