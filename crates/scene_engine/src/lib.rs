//! # Scene Engine
//!
//! A hierarchical scene-graph runtime: a tree of named nodes, each carrying
//! typed behavior modules, driven through a strict per-frame lifecycle.
//!
//! ## Features
//!
//! - **Lifecycle**: create → enable/disable → update phases → draw phases → destroy
//! - **Modules**: polymorphic behavior with default no-op hooks and explicit cloning
//! - **Deep Cloning**: two-pass subtree cloning, build first, activate after
//! - **Resource Cache**: one loader per resource type, at most one load per key
//! - **Configuration**: TOML/RON runtime configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//! use std::time::Duration;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let world = engine.scene_mut().add_root(EmptyNode, Some("World"))?;
//!         engine.graph_mut().add_module(world, ShakeModule::new(2.0, 20.0))?;
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, _delta: Duration) -> Result<(), AppError> {
//!         if engine.graph().time().frame() > 600 {
//!             engine.quit();
//!         }
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RuntimeConfig::load_or_default("scene.toml")?;
//!     let mut app = MyApp;
//!     Engine::run(config, LoaderRegistry::with_defaults(), &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;
pub mod foundation;

// Runtime
pub mod assets;
pub mod modules;
pub mod scene;

mod application;
mod engine;

pub use application::{Application, AppError};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Application, AppError,
        Engine, EngineError,
        config::Config,
        core::{RuntimeConfig, EngineConfig, SceneConfig, AssetConfig},
        foundation::{
            collections::NodeId,
            math::Vec2,
            time::{FrameTime, Timer, Stopwatch},
        },
        assets::{
            AssetError, ImageData, ImageLoader, Loader, LoaderContext, LoaderRegistry,
            ResourceCache, TextLoader,
        },
        modules::{ShakeConfig, ShakeModule, SpriteConfig, SpriteModule, TransformModule},
        scene::{
            DrawCommand, EmptyNode, Hook, Module, ModuleConfig, ModuleContext, Prefab,
            PropertyDescriptor, PropertyMap, PropertyValue, SceneError, SceneGraph,
            SceneManager, SceneResult,
        },
    };
}
