use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; missing sections fall back to
/// their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub regimes: RegimeSettings,
}

/// Controls the tracing subscriber installed by the binary.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Default level: trace, debug, info, warn or error. `RUST_LOG` overrides it.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// The registry of regime names that must always appear in regime reports.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegimeSettings {
    #[serde(default)]
    pub known_types: Vec<String>,
}
