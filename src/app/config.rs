//! Configuration Management

use crate::codegen::ScriptType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Capture settings
    pub capture: CaptureConfig,
    /// Code generation settings
    pub codegen: CodegenConfig,
}

/// Capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// `id` of the in-page control overlay to exclude from capture
    pub overlay_root_id: String,
    /// Quiet period before a resize burst is committed (ms)
    pub resize_debounce_ms: f64,
}

/// Code generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Default target framework
    pub preferred_library: ScriptType,
    /// Interleave generated code with step descriptions
    pub show_comments: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            overlay_root_id: crate::capture::recorder::OVERLAY_ROOT_ID.to_string(),
            resize_debounce_ms: crate::capture::recorder::RESIZE_DEBOUNCE_MS,
        }
    }
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            preferred_library: ScriptType::Playwright,
            show_comments: true,
        }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    /// Returns Ok(()) if valid, or Err with a description of the first invalid field.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.capture.overlay_root_id.trim().is_empty() {
            return Err(crate::Error::Config(
                "overlay_root_id must not be empty".to_string(),
            ));
        }
        if !(0.0..=10_000.0).contains(&self.capture.resize_debounce_ms) {
            return Err(crate::Error::Config(format!(
                "resize_debounce_ms must be in [0, 10000], got {}",
                self.capture.resize_debounce_ms
            )));
        }
        Ok(())
    }

    /// Load config from file
    pub fn load(path: &PathBuf) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default location
    pub fn load_default() -> Result<Self, crate::Error> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &PathBuf) -> Result<(), crate::Error> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;

        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save to default location
    pub fn save_default(&self) -> Result<(), crate::Error> {
        self.save(&Self::default_path())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".webscribe").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String, crate::Error> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }
}
