// Configuration loading and parsing (engine.toml).
//
// All recommendation tunables are startup constants: the engine takes the
// config by value at construction and nothing mutates it afterwards.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::analysis::board::BoardConfig;
use crate::analysis::scarcity::ScarcityConfig;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config structure
// ---------------------------------------------------------------------------

/// Top-level engine.toml contents. Every section and field is optional; a
/// missing piece falls back to its default.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Path to the player pool file (JSON or CSV). May be overridden by a
    /// command-line argument.
    pub pool_path: Option<PathBuf>,
    pub scarcity: ScarcityConfig,
    pub board: BoardConfig,
}

impl EngineConfig {
    /// Load and validate configuration from an engine.toml file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EngineConfig =
            toml::from_str(&text).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when the file exists, otherwise fall back to the
    /// built-in defaults. A present-but-broken file is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scarcity.window_picks == 0 {
            return Err(ConfigError::ValidationError {
                field: "scarcity.window_picks".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.scarcity.superiority_pct < 0.0 || !self.scarcity.superiority_pct.is_finite() {
            return Err(ConfigError::ValidationError {
                field: "scarcity.superiority_pct".into(),
                message: "must be a finite non-negative fraction".into(),
            });
        }
        if self.scarcity.min_abs_drop < 0.0 || !self.scarcity.min_abs_drop.is_finite() {
            return Err(ConfigError::ValidationError {
                field: "scarcity.min_abs_drop".into(),
                message: "must be a finite non-negative value".into(),
            });
        }
        if self.scarcity.top_k_positions == 0 {
            return Err(ConfigError::ValidationError {
                field: "scarcity.top_k_positions".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.scarcity.considered_positions.is_empty() {
            return Err(ConfigError::ValidationError {
                field: "scarcity.considered_positions".into(),
                message: "must name at least one position".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
