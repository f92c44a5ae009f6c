use crate::error::ConfigError;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{Config, LoggingSettings, RegimeSettings};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "meridian.toml";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Loads the application configuration.
///
/// With an explicit `path` the file must exist. Without one, `meridian.toml`
/// is used if present and defaults apply otherwise. `MERIDIAN_*` environment
/// variables (sections separated by `__`, e.g. `MERIDIAN_LOGGING__LEVEL`)
/// override file values.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder().add_source(file).add_source(
        Environment::with_prefix("MERIDIAN")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("regimes.known_types")
            .try_parsing(true),
    );

    build(builder)
}

/// Parses configuration from TOML text, without consulting the environment.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    build(config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
}

fn build(builder: ConfigBuilder<DefaultState>) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.build()?.try_deserialize::<Config>()?;
    validate(&config)?;

    tracing::debug!(
        log_level = %config.logging.level,
        known_regimes = config.regimes.known_types.len(),
        "Configuration loaded."
    );
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "logging.level must be one of {:?}, got '{}'",
            LOG_LEVELS, config.logging.level
        )));
    }

    if let Some(blank) = config.regimes.known_types.iter().position(|t| t.trim().is_empty()) {
        return Err(ConfigError::ValidationError(format!(
            "regimes.known_types[{}] is empty",
            blank
        )));
    }

    Ok(())
}
