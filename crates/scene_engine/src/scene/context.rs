//! What a module can reach while one of its hooks runs

use super::{CommandQueue, Module, Node, SceneError, SceneGraph, SceneResult};
use crate::assets::ResourceCache;
use crate::foundation::collections::NodeId;
use crate::foundation::math::Vec2;
use crate::foundation::time::FrameTime;
use crate::modules::TransformModule;
use crate::scene::RenderQueue;

/// Hook context handed to every module callback
///
/// Gives read access to the whole graph, write access to the modules of
/// the owning node, and the shared services (frame clock, resource cache,
/// render queue). Structural changes are queued through
/// [`ModuleContext::commands`].
pub struct ModuleContext<'a> {
    graph: &'a mut SceneGraph,
    node: NodeId,
}

impl<'a> ModuleContext<'a> {
    pub(crate) fn new(graph: &'a mut SceneGraph, node: NodeId) -> Self {
        Self { graph, node }
    }

    /// The node owning the running module
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Name of the owning node
    pub fn node_name(&self) -> &str {
        self.owner().map_or("", Node::name)
    }

    /// Frame clock of the current tick
    pub fn time(&self) -> FrameTime {
        self.graph.time()
    }

    /// Read-only view of the scene
    pub fn graph(&self) -> &SceneGraph {
        &*self.graph
    }

    /// Shared resource cache
    pub fn cache(&mut self) -> &mut ResourceCache {
        self.graph.cache_mut()
    }

    /// Draw command sink
    pub fn render_queue(&mut self) -> &mut RenderQueue {
        self.graph.render_queue_mut()
    }

    /// Queue structural changes for the next phase boundary
    pub fn commands(&mut self) -> &mut CommandQueue {
        self.graph.commands_mut()
    }

    /// Another module on the owning node
    pub fn module<M: Module>(&self) -> Option<&M> {
        self.owner()?.module::<M>()
    }

    /// Another module on the owning node, mutably
    pub fn module_mut<M: Module>(&mut self) -> Option<&mut M> {
        self.graph.nodes.get_mut(self.node)?.module_mut::<M>()
    }

    /// Transform of the owning node
    pub fn transform(&self) -> SceneResult<&TransformModule> {
        self.module::<TransformModule>().ok_or_else(Self::transform_busy)
    }

    /// Transform of the owning node, mutably
    pub fn transform_mut(&mut self) -> SceneResult<&mut TransformModule> {
        self.module_mut::<TransformModule>().ok_or_else(Self::transform_busy)
    }

    /// World position of the owning node
    pub fn world_position(&self) -> SceneResult<Vec2> {
        self.graph.world_position(self.node)
    }

    fn owner(&self) -> Option<&Node> {
        self.graph.nodes.get(self.node)
    }

    fn transform_busy() -> SceneError {
        SceneError::InvalidState("transform is not available".to_string())
    }
}
