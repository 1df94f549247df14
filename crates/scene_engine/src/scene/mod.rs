//! Scene management system
//!
//! A hierarchy of named nodes, each carrying typed behavior modules, driven
//! through a strict per-frame lifecycle.
//!
//! ## Architecture
//!
//! ```text
//! SceneManager (frame driver)
//!      ↓
//! SceneGraph (node arena, hook dispatch, deferred commands)
//!      ↓
//! Node → [TransformModule, SpriteModule, ...]
//! ```
//!
//! Hooks receive a [`ModuleContext`] instead of the graph itself. Anything
//! that would change the structure of the tree while a sweep is running is
//! queued on the [`CommandQueue`] and applied at the next phase boundary.

mod cloning;
mod commands;
mod context;
mod error;
mod lifecycle;
mod module;
mod node;
mod prefab;
mod properties;
mod render_queue;
mod scene_graph;
mod scene_manager;

pub use commands::{Command, CommandQueue};
pub use context::ModuleContext;
pub use error::{SceneError, SceneResult};
pub use lifecycle::{Hook, Lifecycle, LifecycleFlags, LifecycleState};
pub use module::{short_type_name, AsAny, Module, ModuleConfig};
pub use node::Node;
pub use prefab::{EmptyNode, Prefab};
pub use properties::{find_property, Access, PropertyDescriptor, PropertyMap, PropertyValue};
pub use render_queue::{DrawCommand, Flip, RenderQueue, SpriteBatch, SpriteDraw};
pub use scene_graph::SceneGraph;
pub use scene_manager::{SceneManager, SceneStats};
