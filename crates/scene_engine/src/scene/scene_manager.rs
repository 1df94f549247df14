//! # Scene Manager
//!
//! Owns the scene graph and drives it once per frame: three update phases
//! after each tick of the frame clock, three draw phases per render tick.
//! Every phase reaches every node before the next phase starts.

use std::time::Duration;

use super::{Hook, Prefab, SceneError, SceneGraph, SceneResult};
use crate::assets::ResourceCache;
use crate::core::SceneConfig;
use crate::foundation::collections::NodeId;
use crate::foundation::time::Stopwatch;

/// Performance statistics for scene management
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneStats {
    /// Completed update ticks
    pub frames: u64,

    /// Live nodes after the last update
    pub node_count: usize,

    /// Root nodes after the last update
    pub root_count: usize,

    /// Attached modules after the last update
    pub module_count: usize,

    /// Time spent in the last update sweep (microseconds)
    pub update_time_us: u64,

    /// Time spent in the last draw sweep (microseconds)
    pub draw_time_us: u64,

    /// Deferred commands applied since the scene was created
    pub commands_applied: u64,
}

impl SceneStats {
    /// Calculate total frame time in microseconds
    pub fn total_frame_time_us(&self) -> u64 {
        self.update_time_us + self.draw_time_us
    }
}

/// High-level scene manager driving the frame phases
pub struct SceneManager {
    /// Node hierarchy and shared services
    graph: SceneGraph,

    /// Scene configuration
    config: SceneConfig,

    /// Performance statistics
    stats: SceneStats,

    /// Set once teardown has run
    torn_down: bool,
}

impl SceneManager {
    /// Create a new scene manager with default configuration and no loaders
    pub fn new() -> Self {
        Self::with_cache(ResourceCache::empty())
    }

    /// Create a scene manager whose modules share `cache`
    pub fn with_cache(cache: ResourceCache) -> Self {
        Self::with_config(SceneConfig::default(), cache)
    }

    /// Create a scene manager with custom configuration
    pub fn with_config(config: SceneConfig, cache: ResourceCache) -> Self {
        Self {
            graph: SceneGraph::with_config(&config, cache),
            config,
            stats: SceneStats::default(),
            torn_down: false,
        }
    }

    /// The scene graph
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// The scene graph, mutably
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Scene configuration
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Add a root node
    ///
    /// Fails with [`SceneError::InvalidState`] after teardown.
    pub fn add_root<P: Prefab>(&mut self, prefab: P, name: Option<&str>) -> SceneResult<NodeId> {
        if self.torn_down {
            return Err(SceneError::InvalidState("scene has been torn down".to_string()));
        }
        self.graph.add_root(prefab, name)
    }

    /// Root nodes in insertion order
    pub fn roots(&self) -> &[NodeId] {
        self.graph.roots()
    }

    /// Number of root nodes
    pub fn root_count(&self) -> usize {
        self.graph.root_count()
    }

    /// Advance the frame clock by `delta` and run the update phases
    pub fn update(&mut self, delta: Duration) -> SceneResult<()> {
        let stopwatch = Stopwatch::start_new();

        self.graph.advance_time(delta);
        for hook in Hook::UPDATE_PHASES {
            self.graph.run_phase(hook)?;
        }

        self.stats.frames += 1;
        if self.config.collect_stats {
            self.stats.update_time_us = stopwatch.elapsed().as_micros() as u64;
            self.refresh_counts();
        }
        Ok(())
    }

    /// Run the draw phases, filling the render queue
    pub fn draw(&mut self) -> SceneResult<()> {
        let stopwatch = Stopwatch::start_new();

        for hook in Hook::DRAW_PHASES {
            self.graph.run_phase(hook)?;
        }

        if self.config.collect_stats {
            self.stats.draw_time_us = stopwatch.elapsed().as_micros() as u64;
            self.stats.commands_applied = self.graph.commands_applied();
        }
        Ok(())
    }

    /// Destroy every root, then release the resource cache
    ///
    /// Calling this again does nothing.
    pub fn teardown(&mut self) -> SceneResult<()> {
        if self.torn_down {
            return Ok(());
        }
        self.torn_down = true;

        let roots = self.graph.roots().to_vec();
        log::info!("Tearing down scene with {} root(s)", roots.len());
        for root in roots {
            self.graph.destroy(root)?;
        }
        self.graph.render_queue_mut().clear();
        self.graph.cache_mut().unload();

        self.refresh_counts();
        Ok(())
    }

    /// Check if teardown has run
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Get current performance statistics
    pub fn stats(&self) -> &SceneStats {
        &self.stats
    }

    /// Indented dump of the hierarchy
    pub fn hierarchy_string(&self) -> String {
        self.graph.hierarchy_string()
    }

    fn refresh_counts(&mut self) {
        self.stats.node_count = self.graph.node_count();
        self.stats.root_count = self.graph.root_count();
        self.stats.module_count = self.graph.module_count();
        self.stats.commands_applied = self.graph.commands_applied();
    }
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}
