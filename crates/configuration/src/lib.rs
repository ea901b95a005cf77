use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
#[cfg(feature = "clap")]
pub mod overrides;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
#[cfg(feature = "clap")]
pub use overrides::ReportOverrides;
pub use settings::{
    Config, LedgerSettings, LoggingSettings, PortfolioSettings, ProjectionSettings, ReportSettings,
};

/// The file looked for in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "tradebook.toml";

/// Prefix of environment variables that override file settings,
/// e.g. `TRADEBOOK__REPORTS__TOP_N=10`.
pub const ENV_PREFIX: &str = "TRADEBOOK";

/// Loads and validates the application configuration.
///
/// With an explicit `path` the file must exist. Without one, `tradebook.toml`
/// is read if present and built-in defaults are used otherwise. Environment
/// variables are layered on top in both cases.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("ledger.date_formats")
                .with_list_parse_key("reports.excluded_strategy_tags")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
