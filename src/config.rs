//! Viewer tuning knobs.
//!
//! Values come from `<config_dir>/chat-export-explorer/config.json` when that file exists,
//! and command-line flags override them. Every field is optional in the file.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ViewerError};
use crate::utils::get_config_path;

pub const DEFAULT_BATCH_SIZE: usize = 50;
pub const DEFAULT_MAX_BATCHES: usize = 5;
pub const DEFAULT_TRIGGER_MARGIN: f64 = 1.5;
pub const DEFAULT_PRELOAD_BATCHES: usize = 3;

/// Smallest window that can hold a jump target plus one neighbour on each side
const MIN_MAX_BATCHES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Messages per batch
    pub batch_size: usize,
    /// Resident batch capacity of the window
    pub max_batches: usize,
    /// Distance from either edge, in viewport heights, at which the next batch is loaded
    pub trigger_margin: f64,
    /// Batches rendered when a chat is first opened
    pub preload_batches: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_batches: DEFAULT_MAX_BATCHES,
            trigger_margin: DEFAULT_TRIGGER_MARGIN,
            preload_batches: DEFAULT_PRELOAD_BATCHES,
        }
    }
}

impl ViewerConfig {
    /// Check the invariants the window manager relies on
    ///
    /// # Errors
    ///
    /// `ViewerError::Config` naming the first field that is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(ViewerError::Config("batch_size must be at least 1".into()));
        }
        if self.preload_batches == 0 {
            return Err(ViewerError::Config("preload_batches must be at least 1".into()));
        }
        if self.max_batches < MIN_MAX_BATCHES {
            return Err(ViewerError::Config(format!(
                "max_batches must be at least {}, got {}",
                MIN_MAX_BATCHES, self.max_batches
            )));
        }
        if self.max_batches < self.preload_batches {
            return Err(ViewerError::Config(format!(
                "max_batches ({}) must not be smaller than preload_batches ({})",
                self.max_batches, self.preload_batches
            )));
        }
        if !self.trigger_margin.is_finite() || self.trigger_margin < 0.0 {
            return Err(ViewerError::Config(format!(
                "trigger_margin must be a non-negative number, got {}",
                self.trigger_margin
            )));
        }
        Ok(())
    }

    /// Read a config file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ViewerError::io(format!("Failed to read {}", path.display()), e));
            }
        };

        let config: Self = serde_json::from_str(&text)
            .map_err(|e| ViewerError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        debug!(path = %path.display(), ?config, "loaded config file");
        Ok(config)
    }

    /// Load from the per-user config location, falling back to defaults when the platform
    /// has no config directory
    pub fn load() -> Result<Self> {
        match get_config_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                debug!(error = %e, "no config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Apply command-line overrides and re-validate
    pub fn with_overrides(
        mut self,
        batch_size: Option<usize>,
        max_batches: Option<usize>,
    ) -> Result<Self> {
        if let Some(batch_size) = batch_size {
            self.batch_size = batch_size;
        }
        if let Some(max_batches) = max_batches {
            self.max_batches = max_batches;
        }
        self.validate()?;
        Ok(self)
    }

    /// Scroll distance, in rows, that triggers a load for a viewport of the given height
    pub fn trigger_distance(&self, viewport_height: usize) -> f64 {
        self.trigger_margin * viewport_height as f64
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.max_batches, 5);
        assert_eq!(config.preload_batches, 3);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_batch = ViewerConfig { batch_size: 0, ..Default::default() };
        assert!(zero_batch.validate().unwrap_err().to_string().contains("batch_size"));

        let tiny_window = ViewerConfig { max_batches: 2, ..Default::default() };
        assert!(tiny_window.validate().is_err());

        let preload_too_big =
            ViewerConfig { max_batches: 4, preload_batches: 5, ..Default::default() };
        assert!(preload_too_big.validate().is_err());

        let nan_margin = ViewerConfig { trigger_margin: f64::NAN, ..Default::default() };
        assert!(nan_margin.validate().is_err());

        let negative_margin = ViewerConfig { trigger_margin: -1.0, ..Default::default() };
        assert!(negative_margin.validate().is_err());
    }

    #[test]
    fn test_load_from_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ViewerConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"batch_size": 20, "trigger_margin": 0.5}"#).unwrap();

        let config = ViewerConfig::load_from(&path).unwrap();
        assert_eq!(config.batch_size, 20);
        assert_eq!(config.trigger_margin, 0.5);
        assert_eq!(config.max_batches, DEFAULT_MAX_BATCHES);
    }

    #[test]
    fn test_load_from_rejects_unknown_fields_and_bad_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        fs::write(&path, r#"{"batchsize": 20}"#).unwrap();
        assert!(matches!(ViewerConfig::load_from(&path), Err(ViewerError::Config(_))));

        fs::write(&path, r#"{"max_batches": 1}"#).unwrap();
        assert!(matches!(ViewerConfig::load_from(&path), Err(ViewerError::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let config = ViewerConfig::default().with_overrides(Some(10), None).unwrap();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.max_batches, DEFAULT_MAX_BATCHES);

        assert!(ViewerConfig::default().with_overrides(None, Some(2)).is_err());
    }

    #[test]
    fn test_trigger_distance() {
        let config = ViewerConfig::default();
        assert_eq!(config.trigger_distance(20), 30.0);
    }
}
