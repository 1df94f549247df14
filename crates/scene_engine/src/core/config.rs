//! # Unified Configuration System
//!
//! All runtime configuration lives here, grouped per subsystem. Every
//! section uses `#[serde(default)]` so partial files only override what
//! they mention.
//!
//! ```toml
//! [engine]
//! log_level = "debug"
//!
//! [assets]
//! root_dir = "resources"
//! ```

use serde::{Serialize, Deserialize};

use crate::config::{Config, ConfigError};

/// # Engine Configuration
///
/// Core engine behavior: logging and frame pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter (overridden by `RUST_LOG`)
    pub log_level: String,
    /// Whether to enable debug features such as hierarchy dumps
    pub debug_mode: bool,
    /// Target FPS for frame rate limiting in [`crate::Engine::run`]
    pub target_fps: Option<u32>,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: cfg!(debug_assertions),
            target_fps: None,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable debug mode
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    /// Set target FPS
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = Some(fps);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Scene Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Collect per-frame statistics in the scene manager
    pub collect_stats: bool,
    /// How many rounds of deferred commands a single flush may apply
    ///
    /// Commands queued while applying commands run in the next round.
    pub max_command_passes: usize,
}

impl SceneConfig {
    /// Create a new scene configuration
    pub fn new() -> Self {
        Self {
            collect_stats: true,
            max_command_passes: 16,
        }
    }

    /// Enable or disable statistics
    pub fn with_stats(mut self, enabled: bool) -> Self {
        self.collect_stats = enabled;
        self
    }

    /// Set the deferred command pass limit
    pub fn with_max_command_passes(mut self, passes: usize) -> Self {
        self.max_command_passes = passes;
        self
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Asset Configuration
///
/// Configuration for asset loading and the resource cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Base directory that relative resource keys resolve against
    pub root_dir: String,
}

impl AssetConfig {
    /// Create a new asset configuration
    pub fn new() -> Self {
        Self {
            root_dir: "resources".to_string(),
        }
    }

    /// Set assets directory
    pub fn with_root_dir(mut self, dir: impl Into<String>) -> Self {
        self.root_dir = dir.into();
        self
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Runtime Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Scene manager configuration
    pub scene: SceneConfig,
    /// Asset system configuration
    pub assets: AssetConfig,
}

impl RuntimeConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log level cannot be empty".to_string()));
        }
        if self.engine.target_fps == Some(0) {
            return Err(ConfigError::Invalid("target FPS must be at least 1".to_string()));
        }
        if self.scene.max_command_passes == 0 {
            return Err(ConfigError::Invalid(
                "max command passes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config for RuntimeConfig {}
