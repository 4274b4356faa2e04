//! Engine configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Fewest seats a game can have.
pub const MIN_PLAYERS: usize = 1;

/// Most seats a game can have.
pub const MAX_PLAYERS: usize = 4;

/// Validation policy for the built-in pipelines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Halt a pipeline after its first blocking failure.
    #[serde(default = "default_stop_on_first_error")]
    pub stop_on_first_error: bool,

    /// Deadline for asynchronous validators, in milliseconds.
    #[serde(default = "default_validator_timeout_ms")]
    pub validator_timeout_ms: u64,
}

/// Table settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of seats in round-robin order.
    #[serde(default = "default_player_count")]
    pub player_count: usize,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Validation policy.
    #[serde(default)]
    pipeline: PipelineConfig,

    /// Table settings.
    #[serde(default)]
    game: GameConfig,
}

fn default_stop_on_first_error() -> bool {
    true
}

fn default_validator_timeout_ms() -> u64 {
    2000
}

fn default_player_count() -> usize {
    2
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stop_on_first_error: default_stop_on_first_error(),
            validator_timeout_ms: default_validator_timeout_ms(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: default_player_count(),
        }
    }
}

impl EngineConfig {
    /// Builds a configuration from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the player count is out of range.
    pub fn new(pipeline: PipelineConfig, game: GameConfig) -> Result<Self, ConfigError> {
        let config = Self { pipeline, game };
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed TOML or out-of-range values.
    #[instrument(skip(content), fields(bytes = content.len()))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(
            players = config.game.player_count,
            stop_on_first_error = config.pipeline.stop_on_first_error,
            "Config loaded successfully"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let count = self.game.player_count;
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(ConfigError::new(format!(
                "player_count must be between {} and {}, got {}",
                MIN_PLAYERS, MAX_PLAYERS, count
            )));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error at the caller's location.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.pipeline().stop_on_first_error);
        assert_eq!(config.pipeline().validator_timeout_ms, 2000);
        assert_eq!(config.game().player_count, 2);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[game]\nplayer_count = 3").unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.game().player_count, 3);
        assert!(config.pipeline().stop_on_first_error);
    }

    #[test]
    fn test_player_count_out_of_range() {
        let err = EngineConfig::from_toml("[game]\nplayer_count = 5").unwrap_err();
        assert!(err.message.contains("player_count"));
        assert!(EngineConfig::from_toml("[game]\nplayer_count = 0").is_err());
    }

    #[test]
    fn test_missing_file_reports_location() {
        let err = EngineConfig::from_file("/nonexistent/scrabble.toml").unwrap_err();
        assert!(err.message.contains("Failed to read"));
        assert!(err.file.ends_with("config.rs"));
    }
}
