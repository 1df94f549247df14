//! Built-in modules
//!
//! - [`TransformModule`]: mandatory local position, rotation and scale
//! - [`SpriteModule`]: draws an image loaded through the resource cache
//! - [`ShakeModule`]: random positional jitter around the draw pass

pub mod shake;
pub mod sprite;
pub mod transform;

pub use shake::{ShakeConfig, ShakeModule};
pub use sprite::{SpriteConfig, SpriteModule};
pub use transform::TransformModule;
