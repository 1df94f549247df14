//! Node blueprints
//!
//! A prefab names the kind of node it builds and attaches that kind's
//! modules once the node exists. Constructor arguments live in the prefab
//! value itself.

use super::{SceneGraph, SceneResult};
use crate::foundation::collections::NodeId;

/// Blueprint for one kind of node
///
/// ```
/// use scene_engine::scene::{Prefab, SceneGraph, SceneResult};
/// use scene_engine::foundation::collections::NodeId;
/// use scene_engine::modules::ShakeModule;
///
/// struct Crate {
///     wobble: f32,
/// }
///
/// impl Prefab for Crate {
///     const KIND: &'static str = "Crate";
///
///     fn populate(self, graph: &mut SceneGraph, node: NodeId) -> SceneResult<()> {
///         graph.add_module(node, ShakeModule::new(self.wobble, 12.0))
///     }
/// }
/// ```
pub trait Prefab {
    /// Kind tag, also the default node name
    const KIND: &'static str;

    /// Attach modules or children to the freshly inserted node
    ///
    /// Runs after the transform is attached and before the node is enabled
    /// and shown. An error discards the node.
    fn populate(self, _graph: &mut SceneGraph, _node: NodeId) -> SceneResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// A node with only a transform
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyNode;

impl Prefab for EmptyNode {
    const KIND: &'static str = "Node";
}
