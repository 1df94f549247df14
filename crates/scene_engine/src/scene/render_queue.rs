//! Render queue for submitted draw commands
//!
//! Modules push commands during the draw phases; the host drains them after
//! `draw()`, sorted by layer, and groups them into batches that share an
//! image.

use std::rc::Rc;

use bitflags::bitflags;

use crate::assets::ImageData;
use crate::foundation::collections::NodeId;
use crate::foundation::math::Vec2;

bitflags! {
    /// Mirroring applied to a sprite
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flip: u8 {
        /// Mirror along the vertical axis
        const HORIZONTAL = 1 << 0;
        /// Mirror along the horizontal axis
        const VERTICAL = 1 << 1;
    }
}

/// One sprite to draw
#[derive(Debug, Clone)]
pub struct SpriteDraw {
    /// Node that submitted the sprite
    pub node: NodeId,
    /// Decoded pixels
    pub image: Rc<ImageData>,
    /// World position
    pub position: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    /// Scale factors
    pub scale: Vec2,
    /// Color multiplier
    pub tint: [u8; 4],
    /// Mirroring
    pub flip: Flip,
    /// Draw order, lower first
    pub layer: i32,
}

/// A command for the host renderer
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum DrawCommand {
    /// Draw an image
    Sprite(SpriteDraw),
}

impl DrawCommand {
    /// Draw order of this command
    pub fn layer(&self) -> i32 {
        match self {
            Self::Sprite(sprite) => sprite.layer,
        }
    }

    /// Node that submitted the command
    pub fn node(&self) -> NodeId {
        match self {
            Self::Sprite(sprite) => sprite.node,
        }
    }
}

/// Consecutive sprites on one layer sharing the same image
#[derive(Debug, Clone)]
pub struct SpriteBatch {
    /// Shared image
    pub image: Rc<ImageData>,
    /// Layer of every sprite in the batch
    pub layer: i32,
    /// Sprites in submission order
    pub sprites: Vec<SpriteDraw>,
}

/// Commands collected during one draw pass
#[derive(Debug, Default)]
pub struct RenderQueue {
    commands: Vec<DrawCommand>,
}

impl RenderQueue {
    /// Create an empty render queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit a command
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Pending commands in submission order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of pending commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop every pending command
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Take every pending command, ordered by layer
    ///
    /// The sort is stable, so commands on one layer keep submission order.
    pub fn drain(&mut self) -> Vec<DrawCommand> {
        let mut commands = std::mem::take(&mut self.commands);
        commands.sort_by_key(DrawCommand::layer);
        commands
    }

    /// Take every pending command grouped into sprite batches
    pub fn drain_batches(&mut self) -> Vec<SpriteBatch> {
        let mut batches: Vec<SpriteBatch> = Vec::new();
        for command in self.drain() {
            let DrawCommand::Sprite(sprite) = command;
            match batches.last_mut() {
                Some(batch) if batch.layer == sprite.layer && Rc::ptr_eq(&batch.image, &sprite.image) => {
                    batch.sprites.push(sprite);
                }
                _ => batches.push(SpriteBatch {
                    image: Rc::clone(&sprite.image),
                    layer: sprite.layer,
                    sprites: vec![sprite],
                }),
            }
        }
        batches
    }
}
