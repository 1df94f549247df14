//! Application trait and lifecycle management

use std::time::Duration;

use thiserror::Error;

use crate::assets::AssetError;
use crate::engine::{Engine, EngineError};
use crate::scene::{DrawCommand, SceneError};

/// Application lifecycle trait
///
/// Implement this trait to drive a scene with [`Engine::run`].
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine is initialized. Use this to build the
    /// initial scene.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every frame before the scene's update phases.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta` - Time since last frame
    fn update(&mut self, engine: &mut Engine, delta: Duration) -> Result<(), AppError>;

    /// Render the application
    ///
    /// Called after the scene's draw phases with the commands they produced,
    /// ordered by layer. The default implementation discards them.
    fn render(&mut self, _engine: &mut Engine, _commands: Vec<DrawCommand>) -> Result<(), AppError> {
        Ok(())
    }

    /// Cleanup the application
    ///
    /// Called when the main loop ends, before the scene is torn down.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Scene error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Asset loading error
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
