//! Configuration loading and management.

use std::path::{Path, PathBuf};

use fare_core::SplitMode;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Split mode used when neither the command line nor the plan names one.
    pub split_mode: SplitMode,

    /// Print JSON instead of text by default.
    pub json: bool,
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (FARE_*)
        figment = figment.merge(Env::prefixed("FARE_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for fare.
///
/// On Linux: `~/.config/fare`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("fare"))
}
