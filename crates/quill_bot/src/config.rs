//! Bot configuration.
//!
//! Sources, later ones overriding earlier ones:
//! - Bundled defaults (`include_str!` of `quill.toml`)
//! - `~/.config/quill/quill.toml`
//! - `./quill.toml`
//! - `QUILL__<SECTION>__<KEY>` environment variables

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use quill_error::{ConfigError, QuillError, QuillResult};
use quill_reactive::ReactiveConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../quill.toml");

/// `[bot]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct BotSection {
    /// Prefix for text commands
    prefix: String,
}

impl Default for BotSection {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, used when `RUST_LOG` is unset
    level: String,
    /// JSON formatted output
    json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete bot configuration.
///
/// # Examples
///
/// ```
/// use quill_bot::BotConfig;
///
/// let config = BotConfig::bundled().unwrap();
/// assert_eq!(config.bot().prefix(), "!");
/// assert_eq!(*config.reactive().hoist_interval(), 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct BotConfig {
    /// Command settings
    bot: BotSection,
    /// Tracing settings
    logging: LoggingConfig,
    /// Reactive message tunables
    reactive: ReactiveConfig,
}

impl BotConfig {
    /// Only the defaults shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file does not parse.
    pub fn bundled() -> QuillResult<Self> {
        build(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Load configuration from a specific file path.
    ///
    /// Keys missing from the file take their built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> QuillResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                QuillError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                QuillError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load the layered configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be parsed.
    #[instrument]
    pub fn load() -> QuillResult<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".config").join("quill").join("quill.toml");
            debug!(path = %user_config.display(), "Checking user configuration");
            builder = builder.add_source(File::from(user_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("quill").required(false))
            .add_source(
                Environment::with_prefix("QUILL")
                    .separator("__")
                    .try_parsing(true),
            );

        build(builder)
    }
}

fn build(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> QuillResult<BotConfig> {
    builder
        .build()
        .map_err(|e| {
            QuillError::from(ConfigError::new(format!(
                "Failed to build configuration: {}",
                e
            )))
        })?
        .try_deserialize()
        .map_err(|e| {
            QuillError::from(ConfigError::new(format!(
                "Failed to parse configuration: {}",
                e
            )))
        })
}
