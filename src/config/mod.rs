//! Hydration configuration: the `[hydrate]` section of `atoll.toml`.
//!
//! Everything has a sensible default; an absent file or section yields
//! the defaults. Unknown keys are reported and ignored.
//!
//! | Key | Default | Purpose |
//! |---|---|---|
//! | `prefix` | `"client:"` | Condition attribute prefix |
//! | `strict_conditions` | `false` | Log a diagnostic for unknown conditions instead of skipping silently |
//! | `verbose` | `false` | Enable `debug!` output |

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::log;

/// Default condition attribute prefix.
pub const DEFAULT_PREFIX: &str = "client:";

// ============================================================================
// ConfigError
// ============================================================================

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

// ============================================================================
// HydrateConfig
// ============================================================================

/// The `[hydrate]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydrateConfig {
    /// Condition attribute prefix (`client:` by default).
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Log a diagnostic when an island declares a condition the
    /// registry does not know. The condition is skipped either way.
    #[serde(default)]
    pub strict_conditions: bool,

    /// Enable debug logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl Default for HydrateConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            strict_conditions: false,
            verbose: false,
        }
    }
}

/// Root file structure; only `[hydrate]` is ours.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    hydrate: HydrateConfig,
}

impl HydrateConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            warn_unknown_fields(&ignored, path);
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let (config, _) = Self::parse_with_ignored(content)?;
        config.validate()?;
        Ok(config)
    }

    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let file: ConfigFile =
            serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
                ignored.push(path.to_string());
            })?;
        Ok((file.hydrate, ignored))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.is_empty() {
            return Err(ConfigError::Validation(
                "hydrate.prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Warn about unknown fields.
fn warn_unknown_fields(fields: &[String], path: &Path) {
    let display_path = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    log!("warning"; "unknown fields in {}, ignoring:", display_path);
    for field in fields {
        log!("warning"; "- {}", field);
    }
}

// ============================================================================
// Tests
// ============================================================================
