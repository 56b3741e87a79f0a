//! CLI configuration.
//!
//! Sources, later ones overriding earlier ones: built-in defaults, the
//! optional `meridian.toml` in the working directory (or the file given with
//! `--config`), then `MERIDIAN__SECTION__KEY` environment variables. A `.env`
//! file is loaded into the environment first.

use anyhow::Context;
use meridian_wkt::{FormatOptions, ParserOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;

const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub format: FormatOptions,
    pub parser: ParserOptions,
}

impl Config {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        // A missing .env file is not an error.
        let _ = dotenvy::dotenv();

        let defaults = config::Config::try_from(&Config::default())
            .context("Failed to serialize default configuration")?;
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("meridian").required(false),
        };
        config::Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("MERIDIAN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn validate(&self) -> Result<(), String> {
        if !LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "logging.level must be one of {}, got '{}'",
                LEVELS.join(", "),
                self.logging.level
            ));
        }
        if self.format.indentation > 16 {
            return Err(format!(
                "format.indentation must be at most 16, got {}",
                self.format.indentation
            ));
        }
        for (section, epsilon) in [
            ("format", self.format.derived_parameter_epsilon),
            ("parser", self.parser.derived_parameter_epsilon),
        ] {
            if !(epsilon.is_finite() && (0.0..=1e-3).contains(&epsilon)) {
                return Err(format!(
                    "{}.derived_parameter_epsilon must be within [0, 0.001], got {}",
                    section, epsilon
                ));
            }
        }
        Ok(())
    }
}
