//! Deep cloning of node subtrees
//!
//! Cloning runs in two passes. The first builds the whole copy, nodes and
//! modules, without firing a single hook. The second walks the finished
//! copy and fires create, enable and visible on every module.

use super::node::ModuleSlot;
use super::{Hook, Lifecycle, Node, SceneError, SceneGraph, SceneResult};
use crate::foundation::collections::NodeId;

impl SceneGraph {
    /// Clone `node` with all of its modules and descendants
    ///
    /// The copy is attached to `new_parent`, or next to the original when
    /// `None` is given, in which case its name gets a ` (Clone)` suffix.
    /// Names are made unique among the new siblings. Enabled and visible
    /// states are copied from the original.
    pub fn clone_node(&mut self, node: NodeId, new_parent: Option<NodeId>) -> SceneResult<NodeId> {
        let original_parent = self.node(node)?.parent;
        let parent = match new_parent {
            Some(parent) => {
                self.node(parent)?;
                if self.subtree(node)?.contains(&parent) {
                    return Err(SceneError::InvalidState(format!(
                        "cannot clone '{}' into its own subtree",
                        self.nodes[node].name
                    )));
                }
                Some(parent)
            }
            None => original_parent,
        };

        self.building += 1;
        let built = self.build_clone(node, parent, new_parent.is_none());
        let clone = match built {
            Ok(clone) => clone,
            Err(err) => {
                self.building -= 1;
                return Err(err);
            }
        };
        let activated = self.activate_clone(clone);
        self.building -= 1;

        if let Err(err) = activated {
            log::error!("Failed to activate clone of {:?}: {}", node, err);
            self.destroy(clone)?;
            return Err(err);
        }

        log::debug!(
            "Cloned '{}' as '{}'",
            self.nodes[node].name,
            self.nodes[clone].name
        );
        self.flush_commands();
        Ok(clone)
    }

    /// First pass: copy nodes and modules, no hooks
    fn build_clone(
        &mut self,
        original: NodeId,
        parent: Option<NodeId>,
        suffix: bool,
    ) -> SceneResult<NodeId> {
        let source = self.node(original)?;
        let base = if suffix {
            format!("{} (Clone)", source.name)
        } else {
            source.name.clone()
        };
        let kind = source.kind;
        let lifecycle = Lifecycle::inherit(&source.lifecycle);
        let children = source.children.clone();

        let mut modules = Vec::with_capacity(source.modules.len());
        for slot in &source.modules {
            let module = slot.module.as_deref().ok_or_else(|| {
                SceneError::InvalidState(format!("{} is busy and cannot be cloned", slot.type_name))
            })?;
            let mut copy = module.clone_module();
            module.on_clone(&mut *copy);
            modules.push(ModuleSlot::new(copy, Lifecycle::inherit(&slot.lifecycle)));
        }

        let mut node = Node::new(self.unique_name(parent, &base), kind, parent);
        node.lifecycle = lifecycle;
        node.lifecycle.create()?;
        node.modules = modules;

        let id = self.nodes.insert(node);
        self.link(parent, id);

        for child in children {
            if let Err(err) = self.build_clone(child, Some(id), false) {
                self.discard(id);
                return Err(err);
            }
        }
        Ok(id)
    }

    /// Second pass: create, then forced enable and show where the copied state asks for it
    fn activate_clone(&mut self, clone: NodeId) -> SceneResult<()> {
        for node in self.subtree(clone)? {
            let count = self.node(node)?.module_count();
            for index in 0..count {
                self.transition(node, index, Hook::Create, false)?;

                let lifecycle = self.nodes[node].modules[index].lifecycle;
                if lifecycle.is_enabled() {
                    self.transition(node, index, Hook::Enable, true)?;
                }
                if lifecycle.is_visible() {
                    self.transition(node, index, Hook::Visible, true)?;
                }
            }
        }
        Ok(())
    }

    /// Drop a half-built clone that never received hooks
    fn discard(&mut self, id: NodeId) {
        let subtree = self.subtree(id).unwrap_or_default();
        self.unlink(id);
        for node in subtree {
            self.nodes.remove(node);
        }
    }
}
