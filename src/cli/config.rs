//! Votebook configuration file handling
//!
//! Provides default configuration generation and loading for the votebook CLI.
//! Configuration files are TOML format and live in the user config directory
//! unless a path is given explicitly.
//!
//! Only operator settings live here (logging, simulated clock). Ledger rules
//! such as the expiration check are fixed and cannot be configured.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Votebook operator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VotebookConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Simulated clock configuration for scenario runs
    #[serde(default)]
    pub clock: ClockConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

/// Clock configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Start time (Unix seconds) for scenarios that do not set `start`.
    /// Uses the current wall time if not specified.
    pub start: Option<u64>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl VotebookConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: VotebookConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml() -> String {
        r#"# Votebook Configuration (Operator Settings)
#
# Ledger rules (sequential IDs, one vote per identity, expiration cutoff)
# are fixed and cannot be changed here.

[logging]
# Log level: trace, debug, info, warn, error
# RUST_LOG overrides this when set.
level = "info"

# Log file path (optional, logs to stderr if not specified)
# file = "/var/log/votebook/votebook.log"

[clock]
# Start time (Unix seconds) for scenarios without their own `start`.
# Leave commented to start from the current wall time.
# start = 1700000000
"#
        .to_string()
    }

    /// Create and save a default configuration file
    pub fn create_default(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(config_path, Self::generate_default_toml()).map_err(|e| {
            format!(
                "Failed to write config file '{}': {}",
                config_path.display(),
                e
            )
        })?;

        Ok(())
    }
}

/// Get the default config file path
///
/// - Linux: ~/.config/votebook/config.toml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("votebook")
        .join("config.toml")
}
