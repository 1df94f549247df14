//! Scene nodes

use std::any::TypeId;

use super::module::{module_type_id, Module};
use super::Lifecycle;
use crate::foundation::collections::NodeId;

/// One attached module and its lifecycle
pub(crate) struct ModuleSlot {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) lifecycle: Lifecycle,
    /// Empty while one of the module's own hooks is running
    pub(crate) module: Option<Box<dyn Module>>,
}

impl ModuleSlot {
    pub(crate) fn new(module: Box<dyn Module>, lifecycle: Lifecycle) -> Self {
        Self {
            type_id: module_type_id(&*module),
            type_name: module.type_name(),
            lifecycle,
            module: Some(module),
        }
    }
}

/// Element of the scene graph
///
/// Nodes are owned by the [`SceneGraph`](super::SceneGraph) arena and
/// addressed by [`NodeId`]. Structural changes go through the graph.
pub struct Node {
    pub(crate) name: String,
    pub(crate) kind: &'static str,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) modules: Vec<ModuleSlot>,
    pub(crate) lifecycle: Lifecycle,
}

impl Node {
    pub(crate) fn new(name: String, kind: &'static str, parent: Option<NodeId>) -> Self {
        Self {
            name,
            kind,
            parent,
            children: Vec::new(),
            modules: Vec::new(),
            lifecycle: Lifecycle::new(),
        }
    }

    /// Name, unique among siblings
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind tag of the prefab that built this node
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Parent node, `None` for roots
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Node lifecycle
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Check if update hooks reach this node
    pub fn is_enabled(&self) -> bool {
        self.lifecycle.is_enabled()
    }

    /// Check if the node is visible
    pub fn is_visible(&self) -> bool {
        self.lifecycle.is_visible()
    }

    /// Number of attached modules, including the transform
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Attached module types with their lifecycles, in attach order
    pub fn modules(&self) -> impl Iterator<Item = (&'static str, Lifecycle)> + '_ {
        self.modules.iter().map(|slot| (slot.type_name, slot.lifecycle))
    }

    /// Check if a module of type `M` is attached
    pub fn has_module<M: Module>(&self) -> bool {
        self.slot_index(TypeId::of::<M>()).is_some()
    }

    /// Borrow the module of type `M`
    ///
    /// `None` if absent, or while the module is running one of its own hooks.
    pub fn module<M: Module>(&self) -> Option<&M> {
        let index = self.slot_index(TypeId::of::<M>())?;
        self.modules[index].module.as_deref()?.downcast_ref::<M>()
    }

    /// Mutably borrow the module of type `M`
    pub fn module_mut<M: Module>(&mut self) -> Option<&mut M> {
        let index = self.slot_index(TypeId::of::<M>())?;
        self.modules[index].module.as_deref_mut()?.downcast_mut::<M>()
    }

    /// Lifecycle of the module of type `M`
    pub fn module_lifecycle<M: Module>(&self) -> Option<Lifecycle> {
        let index = self.slot_index(TypeId::of::<M>())?;
        Some(self.modules[index].lifecycle)
    }

    pub(crate) fn slot_index(&self, type_id: TypeId) -> Option<usize> {
        self.modules.iter().position(|slot| slot.type_id == type_id)
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("modules", &self.modules.iter().map(|slot| slot.type_name).collect::<Vec<_>>())
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}
