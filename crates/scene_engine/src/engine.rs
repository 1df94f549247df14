//! Core engine implementation

use std::time::Duration;

use thiserror::Error;

use crate::{
    application::Application,
    assets::{AssetError, LoaderContext, LoaderRegistry, ResourceCache},
    config::ConfigError,
    core::RuntimeConfig,
    foundation::time::Timer,
    scene::{DrawCommand, SceneError, SceneGraph, SceneManager},
};

/// Main engine struct
///
/// Ties the runtime configuration, the resource cache and the scene manager
/// together and drives the frame loop.
pub struct Engine {
    /// Scene manager owning the node hierarchy and the resource cache
    scene: SceneManager,

    /// Runtime configuration
    config: RuntimeConfig,

    /// Frame timing
    timer: Timer,

    /// Whether the engine should continue running
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    ///
    /// Validates `config`, then instantiates every loader in `registry`
    /// against the configured asset root.
    pub fn new(config: RuntimeConfig, registry: LoaderRegistry) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!("Initializing engine...");

        let context = LoaderContext::from_config(&config.assets);
        let cache = ResourceCache::new(registry, &context)?;
        let scene = SceneManager::with_config(config.scene.clone(), cache);

        Ok(Self {
            scene,
            config,
            timer: Timer::new(),
            running: true,
        })
    }

    /// Run the engine main loop with the given application
    ///
    /// The application is cleaned up and the engine shut down however the
    /// loop ends, errors included.
    pub fn run<T: Application>(
        config: RuntimeConfig,
        registry: LoaderRegistry,
        app: &mut T,
    ) -> Result<(), EngineError> {
        let mut engine = Self::new(config, registry)?;

        let result = engine.main_loop(app);
        if let Err(err) = &result {
            log::error!("Main loop aborted: {}", err);
        }

        app.cleanup(&mut engine);
        let shutdown = engine.shutdown();

        log::info!("Engine shutdown complete");
        result.and(shutdown)
    }

    fn main_loop<T: Application>(&mut self, app: &mut T) -> Result<(), EngineError> {
        app.initialize(self)
            .map_err(|e| EngineError::Application(format!("App initialization: {e}")))?;

        log::info!("Starting main loop...");
        let frame_budget = self
            .config
            .engine
            .target_fps
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)));
        self.timer = Timer::new();

        while self.running {
            let delta = self.timer.tick();

            app.update(self, delta)
                .map_err(|e| EngineError::Application(format!("App update: {e}")))?;

            self.frame(delta)?;

            let commands = self.drain_draw_commands();
            app.render(self, commands)
                .map_err(|e| EngineError::Application(format!("App render: {e}")))?;

            if let Some(budget) = frame_budget {
                let spent = self.timer.elapsed_since_tick();
                if spent < budget {
                    std::thread::sleep(budget - spent);
                }
            }
        }
        Ok(())
    }

    /// Run one update tick followed by one draw tick
    pub fn frame(&mut self, delta: Duration) -> Result<(), EngineError> {
        self.scene.update(delta)?;
        self.scene.draw()?;
        Ok(())
    }

    /// Take the draw commands produced by the last draw tick
    pub fn drain_draw_commands(&mut self) -> Vec<DrawCommand> {
        self.scene.graph_mut().render_queue_mut().drain()
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Check if the main loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Destroy the scene and release every cached resource
    ///
    /// Calling this again does nothing.
    pub fn shutdown(&mut self) -> Result<(), EngineError> {
        self.running = false;
        self.scene.teardown()?;
        Ok(())
    }

    /// Get the scene manager
    pub fn scene(&self) -> &SceneManager {
        &self.scene
    }

    /// Get mutable access to the scene manager
    pub fn scene_mut(&mut self) -> &mut SceneManager {
        &mut self.scene
    }

    /// Get the scene graph
    pub fn graph(&self) -> &SceneGraph {
        self.scene.graph()
    }

    /// Get mutable access to the scene graph
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        self.scene.graph_mut()
    }

    /// Get the runtime configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Get the duration of the last frame
    pub fn delta_time(&self) -> Duration {
        self.timer.delta_time()
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Asset system error
    #[error("Asset system error: {0}")]
    Asset(#[from] AssetError),

    /// Scene error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Application error
    #[error("Application error: {0}")]
    Application(String),
}
