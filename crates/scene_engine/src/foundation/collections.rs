//! Specialized collection types

pub use slotmap::{SlotMap, Key};

slotmap::new_key_type! {
    /// Stable handle to a node stored in the scene arena
    ///
    /// Keys are never reused, so a handle to a destroyed node stays dead.
    pub struct NodeId;
}

/// Arena holding every live node of a scene
pub type NodeArena<T> = SlotMap<NodeId, T>;
