//! Deferred structural changes
//!
//! Modules cannot restructure the graph while a sweep is walking it.
//! They queue commands instead, which the graph applies at the next phase
//! boundary.

use std::collections::VecDeque;

use super::{Module, Prefab, SceneGraph, SceneResult};
use crate::foundation::collections::NodeId;

/// A queued graph mutation
pub type Command = Box<dyn FnOnce(&mut SceneGraph) -> SceneResult<()>>;

/// FIFO of pending commands
#[derive(Default)]
pub struct CommandQueue {
    pending: VecDeque<(String, Command)>,
}

impl CommandQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an arbitrary mutation
    pub fn push<F>(&mut self, label: impl Into<String>, command: F)
    where
        F: FnOnce(&mut SceneGraph) -> SceneResult<()> + 'static,
    {
        self.pending.push_back((label.into(), Box::new(command)));
    }

    /// Queue [`SceneGraph::add_child`]
    pub fn add_child<P: Prefab + 'static>(&mut self, parent: NodeId, prefab: P, name: Option<String>) {
        self.push(format!("add {} child", P::KIND), move |graph| {
            graph.add_child(parent, prefab, name.as_deref()).map(|_| ())
        });
    }

    /// Queue [`SceneGraph::destroy`]
    pub fn destroy(&mut self, node: NodeId) {
        self.push("destroy node", move |graph| graph.destroy(node));
    }

    /// Queue [`SceneGraph::clone_node`]
    pub fn clone_node(&mut self, node: NodeId, new_parent: Option<NodeId>) {
        self.push("clone node", move |graph| graph.clone_node(node, new_parent).map(|_| ()));
    }

    /// Queue [`SceneGraph::add_module`]
    pub fn add_module<M: Module>(&mut self, node: NodeId, module: M) {
        self.push(format!("add {}", module.type_name()), move |graph| {
            graph.add_module(node, module)
        });
    }

    /// Queue [`SceneGraph::remove_module`]
    pub fn remove_module<M: Module>(&mut self, node: NodeId) {
        self.push("remove module", move |graph| graph.remove_module::<M>(node));
    }

    /// Queue [`SceneGraph::set_enabled`]
    pub fn set_enabled(&mut self, node: NodeId, enabled: bool) {
        self.push("set enabled", move |graph| graph.set_enabled(node, enabled));
    }

    /// Queue [`SceneGraph::set_visible`]
    pub fn set_visible(&mut self, node: NodeId, visible: bool) {
        self.push("set visible", move |graph| graph.set_visible(node, visible));
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every queued command
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub(crate) fn take(&mut self) -> VecDeque<(String, Command)> {
        std::mem::take(&mut self.pending)
    }
}

impl std::fmt::Debug for CommandQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.pending.iter().map(|(label, _)| label))
            .finish()
    }
}
