//! # Core Engine Module
//!
//! Shared abstractions that the other subsystems depend on.
//!
//! ## Organization
//!
//! - **Config**: Unified runtime configuration (engine, scene, assets)
//! - **Foundation**: Low-level utilities (math, collections, time, logging)

pub mod config;

pub use crate::foundation;

pub use config::{
    RuntimeConfig,
    EngineConfig,
    SceneConfig,
    AssetConfig,
};
pub use crate::config::{Config, ConfigError};
