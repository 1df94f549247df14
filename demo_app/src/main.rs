//! Headless scene demo
//!
//! Builds a small hierarchy, runs it for a fixed number of frames and logs
//! the scene statistics every 60 frames.

use std::rc::Rc;
use std::time::Duration;

use scene_engine::foundation::logging;
use scene_engine::prelude::*;

const RUN_FRAMES: u64 = 120;

/// Rotates its node at a constant rate
#[derive(Debug, Clone)]
struct Spinner {
    radians_per_second: f32,
}

impl Module for Spinner {
    fn clone_module(&self) -> Box<dyn Module> {
        Box::new(self.clone())
    }

    fn on_update(&mut self, ctx: &mut ModuleContext<'_>) {
        let step = self.radians_per_second * ctx.time().delta_secs();
        if let Ok(transform) = ctx.transform_mut() {
            transform.rotate(step);
        }
    }
}

/// A ship with a sprite, a spinner and some engine shake
struct Ship;

impl Prefab for Ship {
    const KIND: &'static str = "Ship";

    fn populate(self, graph: &mut SceneGraph, node: NodeId) -> SceneResult<()> {
        let hull = Rc::new(ImageData::solid_color(16, 16, [200, 200, 255, 255]));
        graph.add_module(node, SpriteModule::from_image(hull).with_layer(1))?;
        graph.add_module(node, Spinner { radians_per_second: 1.5 })?;
        graph.add_configured(
            node,
            ShakeConfig {
                intensity: [0.5, 0.5],
                frequency: 20.0,
                seed: Some(42),
            },
        )
    }
}

struct DemoApp {
    frames: u64,
    sprites_drawn: usize,
}

impl DemoApp {
    fn new() -> Self {
        Self {
            frames: 0,
            sprites_drawn: 0,
        }
    }
}

impl Application for DemoApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Building demo scene...");
        let world = engine.scene_mut().add_root(EmptyNode, Some("World"))?;

        let graph = engine.graph_mut();
        let ship = graph.add_child(world, Ship, None)?;
        graph.transform_mut(ship)?.position = Vec2::new(-20.0, 0.0);

        let wingman = graph.clone_node(ship, None)?;
        graph.set_world_position(wingman, Vec2::new(20.0, 0.0))?;

        log::info!("Scene ready:\n{}", graph.hierarchy_string());
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta: Duration) -> Result<(), AppError> {
        self.frames += 1;
        if self.frames >= RUN_FRAMES {
            engine.quit();
        }
        Ok(())
    }

    fn render(&mut self, engine: &mut Engine, commands: Vec<DrawCommand>) -> Result<(), AppError> {
        self.sprites_drawn += commands.len();
        if self.frames % 60 == 0 {
            let stats = engine.scene().stats();
            log::info!(
                "Frame {}: {} nodes, {} modules, {} sprites this frame, {}us",
                stats.frames,
                stats.node_count,
                stats.module_count,
                commands.len(),
                stats.total_frame_time_us()
            );
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        log::info!(
            "Demo finished after {} frames, {} sprites drawn",
            self.frames,
            self.sprites_drawn
        );
        log::info!("Final scene:\n{}", engine.scene().hierarchy_string());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = RuntimeConfig::load_or_default("demo.toml")?;
    logging::init_with_level(&config.engine.log_level)?;

    let mut app = DemoApp::new();
    Engine::run(config, LoaderRegistry::with_defaults(), &mut app)?;
    Ok(())
}
