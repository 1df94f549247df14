//! Sprite rendering module

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::assets::ImageData;
use crate::foundation::math::Vec2;
use crate::scene::{
    DrawCommand, Flip, Module, ModuleConfig, ModuleContext, PropertyDescriptor, PropertyValue,
    SceneError, SceneResult, SpriteDraw,
};

/// Draws an image at the node's world position
///
/// The image is resolved through the resource cache when the module is
/// created, so every sprite using the same path shares one decoded copy.
#[derive(Debug, Clone)]
pub struct SpriteModule {
    path: String,
    tint: [u8; 4],
    flip: Flip,
    layer: i32,
    image: Option<Rc<ImageData>>,
    reload: bool,
}

impl SpriteModule {
    /// Sprite for the image at `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            tint: [255; 4],
            flip: Flip::empty(),
            layer: 0,
            image: None,
            reload: false,
        }
    }

    /// Sprite showing an image that is already decoded
    pub fn from_image(image: Rc<ImageData>) -> Self {
        Self {
            image: Some(image),
            ..Self::new("")
        }
    }

    /// Set the color multiplier
    pub fn with_tint(mut self, tint: [u8; 4]) -> Self {
        self.tint = tint;
        self
    }

    /// Set the draw layer
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Set the mirroring
    pub fn with_flip(mut self, flip: Flip) -> Self {
        self.flip = flip;
        self
    }

    /// Resource key of the image
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The loaded image, if any
    pub fn image(&self) -> Option<&Rc<ImageData>> {
        self.image.as_ref()
    }

    /// Image size in pixels, zero before loading
    pub fn size(&self) -> Vec2 {
        self.image
            .as_ref()
            .map_or_else(Vec2::zeros, |image| Vec2::from(image.size()))
    }

    /// Color multiplier
    pub fn tint(&self) -> [u8; 4] {
        self.tint
    }

    /// Draw layer
    pub fn layer(&self) -> i32 {
        self.layer
    }

    /// Mirroring
    pub fn flip(&self) -> Flip {
        self.flip
    }

    fn load(&mut self, ctx: &mut ModuleContext<'_>) {
        self.reload = false;
        if self.path.is_empty() {
            return;
        }
        match ctx.cache().load::<ImageData>(&self.path) {
            Ok(image) => self.image = Some(image),
            Err(err) => {
                self.image = None;
                log::error!("Sprite on '{}' failed to load '{}': {}", ctx.node_name(), self.path, err);
            }
        }
    }
}

const PROPERTIES: &[PropertyDescriptor] = &[
    PropertyDescriptor::read_write("path"),
    PropertyDescriptor::read_write("tint"),
    PropertyDescriptor::read_write("layer"),
    PropertyDescriptor::read_write("flip_x"),
    PropertyDescriptor::read_write("flip_y"),
    PropertyDescriptor::read_only("size"),
];

impl Module for SpriteModule {
    fn clone_module(&self) -> Box<dyn Module> {
        Box::new(self.clone())
    }

    fn properties(&self) -> &'static [PropertyDescriptor] {
        PROPERTIES
    }

    fn get_property(&self, name: &str) -> Option<PropertyValue> {
        match name {
            "path" => Some(self.path.as_str().into()),
            "tint" => Some(self.tint.into()),
            "layer" => Some(PropertyValue::Int(i64::from(self.layer))),
            "flip_x" => Some(self.flip.contains(Flip::HORIZONTAL).into()),
            "flip_y" => Some(self.flip.contains(Flip::VERTICAL).into()),
            "size" => Some(self.size().into()),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> SceneResult<()> {
        match name {
            "path" => {
                let path = value.as_text(name)?;
                if path != self.path {
                    self.path = path.to_string();
                    self.reload = true;
                }
            }
            "tint" => self.tint = value.as_color(name)?,
            "layer" => {
                self.layer = i32::try_from(value.as_int(name)?)
                    .map_err(|_| SceneError::invalid_value(name, "layer out of range"))?;
            }
            "flip_x" => self.flip.set(Flip::HORIZONTAL, value.as_bool(name)?),
            "flip_y" => self.flip.set(Flip::VERTICAL, value.as_bool(name)?),
            _ => return Err(SceneError::NotFound(format!("property '{name}'"))),
        }
        Ok(())
    }

    fn on_create(&mut self, ctx: &mut ModuleContext<'_>) {
        if self.image.is_none() {
            self.load(ctx);
        }
    }

    fn on_pre_draw(&mut self, ctx: &mut ModuleContext<'_>) {
        if self.reload {
            self.load(ctx);
        }
    }

    fn on_draw(&mut self, ctx: &mut ModuleContext<'_>) {
        let Some(image) = self.image.clone() else {
            return;
        };
        let (Ok(position), Ok(transform)) = (ctx.world_position(), ctx.transform()) else {
            return;
        };
        let (rotation, scale) = (transform.rotation, transform.scale);

        let node = ctx.node();
        ctx.render_queue().push(DrawCommand::Sprite(SpriteDraw {
            node,
            image,
            position,
            rotation,
            scale,
            tint: self.tint,
            flip: self.flip,
            layer: self.layer,
        }));
    }
}

/// Typed construction parameters for [`SpriteModule`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    /// Resource key of the image
    pub path: String,
    /// Color multiplier
    pub tint: [u8; 4],
    /// Draw layer
    pub layer: i32,
    /// Mirror horizontally
    pub flip_x: bool,
    /// Mirror vertically
    pub flip_y: bool,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            tint: [255; 4],
            layer: 0,
            flip_x: false,
            flip_y: false,
        }
    }
}

impl ModuleConfig for SpriteConfig {
    type Module = SpriteModule;

    fn build(self) -> SceneResult<SpriteModule> {
        if self.path.trim().is_empty() {
            return Err(SceneError::invalid_value("path", "sprite path cannot be empty"));
        }

        let mut flip = Flip::empty();
        flip.set(Flip::HORIZONTAL, self.flip_x);
        flip.set(Flip::VERTICAL, self.flip_y);

        Ok(SpriteModule::new(self.path)
            .with_tint(self.tint)
            .with_layer(self.layer)
            .with_flip(flip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{LoaderContext, LoaderRegistry, ResourceCache};
    use crate::scene::{EmptyNode, Hook, SceneGraph};

    fn graph_with_images() -> (SceneGraph, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::from_pixel(8, 4, image::Rgba([10, 20, 30, 255]))
            .save(dir.path().join("ship.png"))
            .unwrap();
        let cache = ResourceCache::new(
            LoaderRegistry::with_defaults(),
            &LoaderContext::new(dir.path()),
        )
        .unwrap();
        (SceneGraph::with_cache(cache), dir)
    }

    #[test]
    fn test_sprites_share_cached_image() {
        let (mut graph, _dir) = graph_with_images();
        let root = graph.add_root(EmptyNode, None).unwrap();
        let a = graph.add_child(root, EmptyNode, None).unwrap();
        let b = graph.add_child(root, EmptyNode, None).unwrap();

        graph.add_module(a, SpriteModule::new("ship.png")).unwrap();
        graph.add_module(b, SpriteModule::new("ship.png")).unwrap();

        let first = graph.module::<SpriteModule>(a).unwrap().unwrap().image().unwrap();
        let second = graph.module::<SpriteModule>(b).unwrap().unwrap().image().unwrap();
        assert!(Rc::ptr_eq(first, second));
        assert_eq!(graph.cache().len(), 1);
    }

    #[test]
    fn test_draw_pushes_sprite_at_world_position() {
        let (mut graph, _dir) = graph_with_images();
        let root = graph.add_root(EmptyNode, None).unwrap();
        graph.transform_mut(root).unwrap().position = Vec2::new(5.0, 5.0);
        let ship = graph.add_child(root, EmptyNode, None).unwrap();
        graph.transform_mut(ship).unwrap().position = Vec2::new(1.0, 2.0);
        graph
            .add_module(ship, SpriteModule::new("ship.png").with_layer(3))
            .unwrap();

        for hook in Hook::DRAW_PHASES {
            graph.run_phase(hook).unwrap();
        }

        let commands = graph.render_queue_mut().drain();
        assert_eq!(commands.len(), 1);
        let DrawCommand::Sprite(sprite) = &commands[0];
        assert_eq!(sprite.node, ship);
        assert_eq!(sprite.position, Vec2::new(6.0, 7.0));
        assert_eq!(sprite.layer, 3);
    }

    #[test]
    fn test_hidden_sprite_is_not_drawn() {
        let (mut graph, _dir) = graph_with_images();
        let root = graph.add_root(EmptyNode, None).unwrap();
        graph.add_module(root, SpriteModule::new("ship.png")).unwrap();
        graph.set_visible(root, false).unwrap();

        graph.run_phase(Hook::Draw).unwrap();
        assert!(graph.render_queue().is_empty());
    }

    #[test]
    fn test_size_is_read_only() {
        let (mut graph, _dir) = graph_with_images();
        let root = graph.add_root(EmptyNode, None).unwrap();
        graph.add_module(root, SpriteModule::new("ship.png")).unwrap();

        assert_eq!(
            graph.get_property::<SpriteModule>(root, "size").unwrap(),
            Some(PropertyValue::Vec2([8.0, 4.0]))
        );
        assert_eq!(
            graph.set_property::<SpriteModule>(root, "size", PropertyValue::Vec2([1.0, 1.0])),
            Err(SceneError::ReadOnlyProperty("size".to_string()))
        );
    }

    #[test]
    fn test_config_rejects_empty_path() {
        let result = SpriteConfig::default().build();
        assert!(matches!(result, Err(SceneError::InvalidValue { .. })));
    }
}
