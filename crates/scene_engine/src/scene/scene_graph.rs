//! Scene graph: the node arena and every structural operation
//!
//! Nodes live in a slot map and link to each other by [`NodeId`]. Every
//! lifecycle hook is fired from here, with the running module temporarily
//! taken out of its slot so it can receive a [`ModuleContext`] borrowing
//! the rest of the graph.

use std::any::TypeId;
use std::fmt::Write;
use std::time::Duration;

use super::module::short_type_name;
use super::node::ModuleSlot;
use super::{
    CommandQueue, Hook, Lifecycle, Module, ModuleConfig, ModuleContext, Node, Prefab,
    PropertyMap, PropertyValue, RenderQueue, SceneError, SceneResult,
};
use crate::assets::ResourceCache;
use crate::core::SceneConfig;
use crate::foundation::collections::{NodeArena, NodeId};
use crate::foundation::math::Vec2;
use crate::foundation::time::FrameTime;
use crate::modules::TransformModule;

/// Hierarchy of nodes plus the services their modules share
pub struct SceneGraph {
    pub(crate) nodes: NodeArena<Node>,
    pub(crate) roots: Vec<NodeId>,
    cache: ResourceCache,
    render_queue: RenderQueue,
    time: FrameTime,
    commands: CommandQueue,
    max_command_passes: usize,
    flushing: bool,
    pub(crate) building: usize,
    commands_applied: u64,
}

impl SceneGraph {
    /// Empty graph with an empty resource cache
    pub fn new() -> Self {
        Self::with_cache(ResourceCache::empty())
    }

    /// Empty graph sharing `cache` with its modules
    pub fn with_cache(cache: ResourceCache) -> Self {
        Self::with_config(&SceneConfig::default(), cache)
    }

    /// Empty graph with explicit settings
    pub fn with_config(config: &SceneConfig, cache: ResourceCache) -> Self {
        Self {
            nodes: NodeArena::with_key(),
            roots: Vec::new(),
            cache,
            render_queue: RenderQueue::new(),
            time: FrameTime::default(),
            commands: CommandQueue::new(),
            max_command_passes: config.max_command_passes.max(1),
            flushing: false,
            building: 0,
            commands_applied: 0,
        }
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Borrow a node; [`SceneError::InvalidState`] once it is destroyed
    pub fn node(&self, id: NodeId) -> SceneResult<&Node> {
        self.nodes.get(id).ok_or_else(|| destroyed(id))
    }

    fn node_mut(&mut self, id: NodeId) -> SceneResult<&mut Node> {
        self.nodes.get_mut(id).ok_or_else(|| destroyed(id))
    }

    /// Check if `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Check if `id` has been destroyed
    pub fn is_destroyed(&self, id: NodeId) -> bool {
        !self.contains(id)
    }

    /// Root nodes in insertion order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of root nodes
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of attached modules across all nodes
    pub fn module_count(&self) -> usize {
        self.nodes.values().map(Node::module_count).sum()
    }

    /// Node name
    pub fn name(&self, id: NodeId) -> SceneResult<&str> {
        Ok(self.node(id)?.name())
    }

    /// Parent of a node, `None` for roots
    pub fn parent(&self, id: NodeId) -> SceneResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// Children of a node
    pub fn children(&self, id: NodeId) -> SceneResult<&[NodeId]> {
        Ok(self.node(id)?.children())
    }

    /// The sibling set a node belongs to, itself included
    pub fn siblings(&self, id: NodeId) -> SceneResult<&[NodeId]> {
        let parent = self.node(id)?.parent;
        Ok(self.sibling_set(parent))
    }

    /// Check if a node is enabled
    pub fn is_enabled(&self, id: NodeId) -> SceneResult<bool> {
        Ok(self.node(id)?.is_enabled())
    }

    /// Check if a node is visible
    pub fn is_visible(&self, id: NodeId) -> SceneResult<bool> {
        Ok(self.node(id)?.is_visible())
    }

    /// Find a root by name
    pub fn find_root(&self, name: &str) -> Option<NodeId> {
        self.sibling_named(None, name)
    }

    /// Find a direct child by name
    pub fn find_child(&self, parent: NodeId, name: &str) -> SceneResult<Option<NodeId>> {
        self.node(parent)?;
        Ok(self.sibling_named(Some(parent), name))
    }

    /// Find a direct child by name and kind tag
    pub fn find_child_of_kind(
        &self,
        parent: NodeId,
        name: &str,
        kind: &str,
    ) -> SceneResult<Option<NodeId>> {
        Ok(self
            .find_child(parent, name)?
            .filter(|&child| self.nodes.get(child).map_or(false, |node| node.kind == kind)))
    }

    /// Find a direct child built by prefab `P`
    pub fn find_child_of<P: Prefab>(&self, parent: NodeId, name: &str) -> SceneResult<Option<NodeId>> {
        self.find_child_of_kind(parent, name, P::KIND)
    }

    /// A node and all of its descendants, parents before children
    pub fn subtree(&self, id: NodeId) -> SceneResult<Vec<NodeId>> {
        self.node(id)?;
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                order.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        Ok(order)
    }

    // ---------------------------------------------------------------------
    // Structure
    // ---------------------------------------------------------------------

    /// Build a root node from `prefab`
    pub fn add_root<P: Prefab>(&mut self, prefab: P, name: Option<&str>) -> SceneResult<NodeId> {
        self.spawn(None, prefab, name)
    }

    /// Build a child of `parent` from `prefab`
    ///
    /// Without an explicit name the node is named after the prefab kind,
    /// made unique among its siblings. The node receives its transform,
    /// then the prefab's modules, and is enabled and shown last.
    pub fn add_child<P: Prefab>(
        &mut self,
        parent: NodeId,
        prefab: P,
        name: Option<&str>,
    ) -> SceneResult<NodeId> {
        self.node(parent)?;
        self.spawn(Some(parent), prefab, name)
    }

    fn spawn<P: Prefab>(
        &mut self,
        parent: Option<NodeId>,
        prefab: P,
        name: Option<&str>,
    ) -> SceneResult<NodeId> {
        let name = match name {
            Some(name) if self.sibling_named(parent, name).is_some() => {
                return Err(SceneError::DuplicateName(name.to_string()));
            }
            Some(name) => name.to_string(),
            None => self.unique_name(parent, P::KIND),
        };

        let mut node = Node::new(name, P::KIND, parent);
        node.lifecycle.create()?;
        let id = self.nodes.insert(node);
        self.link(parent, id);

        self.building += 1;
        let built = self
            .attach_module(id, Box::new(TransformModule::default()))
            .and_then(|()| prefab.populate(self, id))
            .and_then(|()| self.set_enabled(id, true))
            .and_then(|()| self.set_visible(id, true));
        self.building -= 1;

        if let Err(err) = built {
            log::error!("Failed to build {} node: {}", P::KIND, err);
            self.destroy(id)?;
            return Err(err);
        }

        log::debug!("Spawned {} node '{}'", P::KIND, self.nodes[id].name);
        self.flush_commands();
        Ok(id)
    }

    /// Destroy a direct child of `parent`
    ///
    /// The child's subtree is hidden, disabled and destroyed, children
    /// first. Fails with [`SceneError::NotFound`] if `child` is not a child
    /// of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<NodeId> {
        let owner = self.node(parent)?;
        if !owner.children.contains(&child) {
            return Err(SceneError::NotFound(format!(
                "{child:?} is not a child of '{}'",
                owner.name
            )));
        }
        self.destroy(child)?;
        Ok(child)
    }

    /// Destroy the child of `parent` called `name`
    pub fn remove_child_named(&mut self, parent: NodeId, name: &str) -> SceneResult<NodeId> {
        let child = self.find_child(parent, name)?.ok_or_else(|| {
            SceneError::NotFound(format!("child '{name}'"))
        })?;
        self.remove_child(parent, child)
    }

    /// Detach a node and destroy its subtree; does nothing if already destroyed
    pub fn destroy(&mut self, id: NodeId) -> SceneResult<()> {
        if !self.contains(id) {
            return Ok(());
        }
        self.unlink(id);
        self.teardown(id);
        self.flush_commands();
        Ok(())
    }

    /// Rename a node; [`SceneError::DuplicateName`] if a sibling holds `name`
    pub fn set_name(&mut self, id: NodeId, name: &str) -> SceneResult<()> {
        let parent = self.node(id)?.parent;
        match self.sibling_named(parent, name) {
            Some(other) if other != id => Err(SceneError::DuplicateName(name.to_string())),
            _ => {
                self.node_mut(id)?.name = name.to_string();
                Ok(())
            }
        }
    }

    /// Enable or disable a node, its modules and its whole subtree
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> SceneResult<()> {
        let (node_hook, module_hook) = if enabled {
            (Hook::Enable, Hook::Enable)
        } else {
            (Hook::Disable, Hook::Disable)
        };
        for node in self.subtree(id)? {
            self.transition_node(node, node_hook, module_hook)?;
        }
        self.flush_commands();
        Ok(())
    }

    /// Show or hide a node, its modules and its whole subtree
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> SceneResult<()> {
        let hook = if visible { Hook::Visible } else { Hook::Invisible };
        for node in self.subtree(id)? {
            self.transition_node(node, hook, hook)?;
        }
        self.flush_commands();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Modules
    // ---------------------------------------------------------------------

    /// Attach a module
    ///
    /// Fires create, then enable and visible when the node is enabled and
    /// visible. [`SceneError::DuplicateModule`] if the node already carries
    /// one of this type.
    pub fn add_module<M: Module>(&mut self, node: NodeId, module: M) -> SceneResult<()> {
        self.attach_module(node, Box::new(module))?;
        self.flush_commands();
        Ok(())
    }

    /// Attach a module after applying initial property values
    pub fn add_module_with<M: Module>(
        &mut self,
        node: NodeId,
        module: M,
        properties: &PropertyMap,
    ) -> SceneResult<()> {
        self.node(node)?;
        let mut module: Box<dyn Module> = Box::new(module);
        for (name, value) in properties {
            module.apply_property(name, value.clone())?;
        }
        self.attach_module(node, module)?;
        self.flush_commands();
        Ok(())
    }

    /// Build a module from its typed configuration and attach it
    pub fn add_configured<C: ModuleConfig>(&mut self, node: NodeId, config: C) -> SceneResult<()> {
        self.node(node)?;
        let module = config.build()?;
        self.add_module(node, module)
    }

    /// Disable, destroy and detach the module of type `M`
    ///
    /// The transform cannot be removed from a live node.
    pub fn remove_module<M: Module>(&mut self, node: NodeId) -> SceneResult<()> {
        if TypeId::of::<M>() == TypeId::of::<TransformModule>() {
            return Err(SceneError::RequiredModule("TransformModule"));
        }
        let index = self.module_index::<M>(node)?;
        self.transition(node, index, Hook::Disable, false)?;
        self.transition(node, index, Hook::Destroy, false)?;
        self.node_mut(node)?.modules.remove(index);
        self.flush_commands();
        Ok(())
    }

    /// Borrow the module of type `M`, `None` if absent
    pub fn module<M: Module>(&self, node: NodeId) -> SceneResult<Option<&M>> {
        Ok(self.node(node)?.module::<M>())
    }

    /// Mutably borrow the module of type `M`, `None` if absent
    pub fn module_mut<M: Module>(&mut self, node: NodeId) -> SceneResult<Option<&mut M>> {
        Ok(self.node_mut(node)?.module_mut::<M>())
    }

    /// Check if a module of type `M` is attached
    pub fn has_module<M: Module>(&self, node: NodeId) -> SceneResult<bool> {
        Ok(self.node(node)?.has_module::<M>())
    }

    /// Lifecycle of the module of type `M`, `None` if absent
    pub fn module_lifecycle<M: Module>(&self, node: NodeId) -> SceneResult<Option<Lifecycle>> {
        Ok(self.node(node)?.module_lifecycle::<M>())
    }

    /// Enable or disable a single module
    pub fn set_module_enabled<M: Module>(&mut self, node: NodeId, enabled: bool) -> SceneResult<()> {
        let index = self.module_index::<M>(node)?;
        let hook = if enabled { Hook::Enable } else { Hook::Disable };
        self.transition(node, index, hook, false)?;
        self.flush_commands();
        Ok(())
    }

    /// Read a property of the module of type `M`
    pub fn get_property<M: Module>(&self, node: NodeId, name: &str) -> SceneResult<Option<PropertyValue>> {
        let index = self.module_index::<M>(node)?;
        Ok(self.nodes[node].modules[index]
            .module
            .as_deref()
            .and_then(|module| module.get_property(name)))
    }

    /// Write a property of the module of type `M`
    pub fn set_property<M: Module>(
        &mut self,
        node: NodeId,
        name: &str,
        value: PropertyValue,
    ) -> SceneResult<()> {
        let index = self.module_index::<M>(node)?;
        let slot = &mut self.node_mut(node)?.modules[index];
        let type_name = slot.type_name;
        let module = slot
            .module
            .as_deref_mut()
            .ok_or_else(|| SceneError::InvalidState(format!("{type_name} is busy")))?;
        module.apply_property(name, value)
    }

    fn module_index<M: Module>(&self, node: NodeId) -> SceneResult<usize> {
        let owner = self.node(node)?;
        owner.slot_index(TypeId::of::<M>()).ok_or_else(|| {
            SceneError::NotFound(format!(
                "{} on '{}'",
                short_type_name(std::any::type_name::<M>()),
                owner.name
            ))
        })
    }

    pub(crate) fn attach_module(&mut self, node: NodeId, module: Box<dyn Module>) -> SceneResult<()> {
        let owner = self.node_mut(node)?;
        let slot = ModuleSlot::new(module, Lifecycle::new());
        if owner.slot_index(slot.type_id).is_some() {
            return Err(SceneError::DuplicateModule(slot.type_name));
        }

        let (enabled, visible) = (owner.is_enabled(), owner.is_visible());
        owner.modules.push(slot);
        let index = owner.modules.len() - 1;

        self.transition(node, index, Hook::Create, false)?;
        if enabled {
            self.transition(node, index, Hook::Enable, false)?;
        }
        if visible {
            self.transition(node, index, Hook::Visible, false)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Transform
    // ---------------------------------------------------------------------

    /// Transform of a node
    pub fn transform(&self, node: NodeId) -> SceneResult<&TransformModule> {
        let owner = self.node(node)?;
        owner
            .module::<TransformModule>()
            .ok_or_else(|| SceneError::InvalidState(format!("'{}' has no transform", owner.name)))
    }

    /// Transform of a node, mutably
    pub fn transform_mut(&mut self, node: NodeId) -> SceneResult<&mut TransformModule> {
        let owner = self.node_mut(node)?;
        let name = owner.name.clone();
        owner
            .module_mut::<TransformModule>()
            .ok_or_else(|| SceneError::InvalidState(format!("'{name}' has no transform")))
    }

    /// Position in world space: the sum of local positions up to the root
    pub fn world_position(&self, node: NodeId) -> SceneResult<Vec2> {
        let mut position = Vec2::zeros();
        let mut current = Some(node);
        while let Some(id) = current {
            let owner = self.node(id)?;
            if let Some(transform) = owner.module::<TransformModule>() {
                position += transform.position;
            }
            current = owner.parent;
        }
        Ok(position)
    }

    /// Move a node so that its world position becomes `position`
    pub fn set_world_position(&mut self, node: NodeId, position: Vec2) -> SceneResult<()> {
        let origin = match self.node(node)?.parent {
            Some(parent) => self.world_position(parent)?,
            None => Vec2::zeros(),
        };
        self.transform_mut(node)?.position = position - origin;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Services
    // ---------------------------------------------------------------------

    /// Shared resource cache
    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    /// Shared resource cache, mutably
    pub fn cache_mut(&mut self) -> &mut ResourceCache {
        &mut self.cache
    }

    /// Draw commands collected during the draw phases
    pub fn render_queue(&self) -> &RenderQueue {
        &self.render_queue
    }

    /// Draw commands, mutably
    pub fn render_queue_mut(&mut self) -> &mut RenderQueue {
        &mut self.render_queue
    }

    /// Frame clock
    pub fn time(&self) -> FrameTime {
        self.time
    }

    /// Start a new tick of the frame clock
    pub fn advance_time(&mut self, delta: Duration) {
        self.time.advance(delta);
    }

    /// Pending deferred commands
    pub fn commands_mut(&mut self) -> &mut CommandQueue {
        &mut self.commands
    }

    /// Total number of deferred commands applied so far
    pub fn commands_applied(&self) -> u64 {
        self.commands_applied
    }

    // ---------------------------------------------------------------------
    // Sweeps
    // ---------------------------------------------------------------------

    /// Deliver one update or draw phase to every node, then flush commands
    ///
    /// Nodes are visited parent first; each node runs the phase on its
    /// modules in attach order before recursing into its children.
    pub fn run_phase(&mut self, hook: Hook) -> SceneResult<()> {
        if !hook.is_update() && !hook.is_draw() {
            return Err(SceneError::InvalidState(format!(
                "{} is not a frame phase",
                hook.name()
            )));
        }
        let roots = self.roots.clone();
        for root in roots {
            self.dispatch(root, hook);
        }
        self.flush_commands();
        Ok(())
    }

    fn dispatch(&mut self, node: NodeId, hook: Hook) {
        let Some(owner) = self.nodes.get(node) else {
            return;
        };
        if !owner.lifecycle.accepts(hook) {
            return;
        }

        let count = owner.modules.len();
        for index in 0..count {
            let accepts = self
                .nodes
                .get(node)
                .and_then(|owner| owner.modules.get(index))
                .map_or(false, |slot| slot.lifecycle.accepts(hook));
            if accepts {
                self.fire(node, index, hook);
            }
        }

        let children = self
            .nodes
            .get(node)
            .map(|owner| owner.children.clone())
            .unwrap_or_default();
        for child in children {
            self.dispatch(child, hook);
        }
    }

    /// Apply queued commands
    ///
    /// Commands queued while applying run in the next pass, up to the
    /// configured pass limit; anything left stays queued. Failing commands
    /// are logged and dropped. Returns the number applied.
    pub fn flush_commands(&mut self) -> usize {
        if self.flushing || self.building > 0 {
            return 0;
        }
        self.flushing = true;

        let mut applied = 0;
        let mut passes = 0;
        while !self.commands.is_empty() && passes < self.max_command_passes {
            passes += 1;
            for (label, command) in self.commands.take() {
                match command(self) {
                    Ok(()) => applied += 1,
                    Err(err) => log::warn!("Deferred command '{}' rejected: {}", label, err),
                }
            }
        }
        if !self.commands.is_empty() {
            log::warn!(
                "{} deferred command(s) still pending after {} passes",
                self.commands.len(),
                passes
            );
        }

        self.flushing = false;
        self.commands_applied += applied as u64;
        applied
    }

    // ---------------------------------------------------------------------
    // Lifecycle plumbing
    // ---------------------------------------------------------------------

    /// Move one module through a lifecycle transition, firing its hook if needed
    pub(crate) fn transition(
        &mut self,
        node: NodeId,
        index: usize,
        hook: Hook,
        force: bool,
    ) -> SceneResult<()> {
        let slot = self
            .nodes
            .get_mut(node)
            .and_then(|owner| owner.modules.get_mut(index))
            .ok_or_else(|| destroyed(node))?;

        let fire = match hook {
            Hook::Create => slot.lifecycle.create()?,
            Hook::Enable => slot.lifecycle.enable(force)?,
            Hook::Disable => slot.lifecycle.disable()?,
            Hook::Visible => slot.lifecycle.show(force)?,
            Hook::Invisible => slot.lifecycle.hide()?,
            Hook::Destroy => slot.lifecycle.destroy(),
            other => {
                return Err(SceneError::InvalidState(format!(
                    "{} is not a lifecycle transition",
                    other.name()
                )));
            }
        };

        if fire {
            log::trace!("{}::{}", slot.type_name, hook.name());
            self.fire(node, index, hook);
        }
        Ok(())
    }

    /// Apply a transition to a node and, if it changed, to all of its modules
    fn transition_node(&mut self, node: NodeId, node_hook: Hook, module_hook: Hook) -> SceneResult<()> {
        let owner = self.node_mut(node)?;
        let changed = match node_hook {
            Hook::Enable => owner.lifecycle.enable(false)?,
            Hook::Disable => owner.lifecycle.disable()?,
            Hook::Visible => owner.lifecycle.show(false)?,
            Hook::Invisible => owner.lifecycle.hide()?,
            other => {
                return Err(SceneError::InvalidState(format!(
                    "{} does not apply to nodes",
                    other.name()
                )));
            }
        };
        if !changed {
            return Ok(());
        }

        log::debug!("Node '{}' {}", owner.name, node_hook.name());
        let count = owner.modules.len();
        for index in 0..count {
            self.transition(node, index, module_hook, false)?;
        }
        Ok(())
    }

    /// Run one hook with the module taken out of its slot
    fn fire(&mut self, node: NodeId, index: usize, hook: Hook) {
        let Some(mut module) = self
            .nodes
            .get_mut(node)
            .and_then(|owner| owner.modules.get_mut(index))
            .and_then(|slot| slot.module.take())
        else {
            return;
        };

        module.invoke(hook, &mut ModuleContext::new(self, node));

        if let Some(slot) = self
            .nodes
            .get_mut(node)
            .and_then(|owner| owner.modules.get_mut(index))
        {
            slot.module = Some(module);
        }
    }

    /// Hide, disable and destroy a detached subtree, children first
    ///
    /// Every module is hidden and disabled on its own, even when its node
    /// already was. Destruction runs in post-order, siblings in order.
    fn teardown(&mut self, id: NodeId) {
        let Ok(subtree) = self.subtree(id) else {
            return;
        };

        for &node in &subtree {
            for hook in [Hook::Invisible, Hook::Disable] {
                if let Err(err) = self.settle_node(node, hook) {
                    log::warn!("Teardown of {:?}: {}", node, err);
                }
            }
        }

        for node in self.post_order(id) {
            let count = self.nodes.get(node).map_or(0, Node::module_count);
            for index in 0..count {
                if let Err(err) = self.transition(node, index, Hook::Destroy, false) {
                    log::warn!("Teardown of {:?}: {}", node, err);
                }
            }
            if let Some(mut removed) = self.nodes.remove(node) {
                removed.lifecycle.destroy();
                log::debug!("Destroyed node '{}'", removed.name);
            }
        }
    }

    /// Lower a node flag, then the same flag on each of its modules
    fn settle_node(&mut self, node: NodeId, hook: Hook) -> SceneResult<()> {
        self.transition_node(node, hook, hook)?;
        let count = self.node(node)?.module_count();
        for index in 0..count {
            self.transition(node, index, hook, false)?;
        }
        Ok(())
    }

    /// Descendants before their parent, siblings in order
    fn post_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![(id, false)];
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                order.push(current);
                continue;
            }
            if let Some(node) = self.nodes.get(current) {
                stack.push((current, true));
                stack.extend(node.children.iter().rev().map(|&child| (child, false)));
            }
        }
        order
    }

    // ---------------------------------------------------------------------
    // Sibling bookkeeping
    // ---------------------------------------------------------------------

    pub(crate) fn sibling_set(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            Some(parent) => match self.nodes.get(parent) {
                Some(node) => &node.children,
                None => &[],
            },
            None => &self.roots,
        }
    }

    fn sibling_named(&self, parent: Option<NodeId>, name: &str) -> Option<NodeId> {
        self.sibling_set(parent)
            .iter()
            .copied()
            .find(|&id| self.nodes.get(id).map_or(false, |node| node.name == name))
    }

    /// `base`, or `base (n)` with the smallest free `n >= 2`
    pub(crate) fn unique_name(&self, parent: Option<NodeId>, base: &str) -> String {
        if self.sibling_named(parent, base).is_none() {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base} ({n})"))
            .find(|candidate| self.sibling_named(parent, candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }

    pub(crate) fn link(&mut self, parent: Option<NodeId>, id: NodeId) {
        match parent.and_then(|parent| self.nodes.get_mut(parent)) {
            Some(owner) => owner.children.push(id),
            None => self.roots.push(id),
        }
    }

    pub(crate) fn unlink(&mut self, id: NodeId) {
        let parent = self.nodes.get(id).and_then(|node| node.parent);
        match parent.and_then(|parent| self.nodes.get_mut(parent)) {
            Some(owner) => owner.children.retain(|&child| child != id),
            None => self.roots.retain(|&root| root != id),
        }
    }

    // ---------------------------------------------------------------------
    // Debugging
    // ---------------------------------------------------------------------

    /// Indented dump of every root and its descendants
    ///
    /// Each root's tree is followed by a newline.
    ///
    /// ```text
    /// 'World'
    /// ——→'Ship' (SpriteModule, ShakeModule)
    /// ```
    pub fn hierarchy_string(&self) -> String {
        let mut out = String::new();
        for &root in &self.roots {
            self.write_hierarchy(&mut out, root, 0);
            out.push('\n');
        }
        out
    }

    /// Dump of one node and its descendants, without a trailing newline
    pub fn node_hierarchy_string(&self, id: NodeId) -> SceneResult<String> {
        self.node(id)?;
        let mut out = String::new();
        self.write_hierarchy(&mut out, id, 0);
        Ok(out)
    }

    fn write_hierarchy(&self, out: &mut String, id: NodeId, depth: usize) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };

        let extras: Vec<&str> = node
            .modules
            .iter()
            .filter(|slot| slot.type_id != TypeId::of::<TransformModule>())
            .map(|slot| slot.type_name)
            .collect();

        out.push_str(&"——".repeat(depth));
        if depth > 0 {
            out.push('→');
        }
        let _ = write!(out, "'{}'", node.name);
        if !extras.is_empty() {
            let _ = write!(out, " ({})", extras.join(", "));
        }

        for &child in &node.children {
            out.push('\n');
            self.write_hierarchy(out, child, depth + 1);
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraph")
            .field("nodes", &self.nodes.len())
            .field("roots", &self.roots)
            .field("cache", &self.cache)
            .field("pending_commands", &self.commands.len())
            .finish()
    }
}

fn destroyed(id: NodeId) -> SceneError {
    SceneError::InvalidState(format!("node {id:?} has been destroyed"))
}
