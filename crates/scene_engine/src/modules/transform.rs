//! Local transform carried by every node

use crate::foundation::math::Vec2;
use crate::scene::{Module, PropertyDescriptor, PropertyValue, SceneError, SceneResult};

/// Position, rotation and scale relative to the parent node
///
/// Attached automatically when a node is built and removable only by
/// destroying the node.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformModule {
    /// Local position
    pub position: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    /// Scale factors
    pub scale: Vec2,
}

impl TransformModule {
    /// Transform at `position` with no rotation and unit scale
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Move by `offset`
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }

    /// Rotate by `radians`
    pub fn rotate(&mut self, radians: f32) {
        self.rotation += radians;
    }
}

impl Default for TransformModule {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

const PROPERTIES: &[PropertyDescriptor] = &[
    PropertyDescriptor::read_write("position"),
    PropertyDescriptor::read_write("x"),
    PropertyDescriptor::read_write("y"),
    PropertyDescriptor::read_write("rotation"),
    PropertyDescriptor::read_write("scale"),
];

impl Module for TransformModule {
    fn clone_module(&self) -> Box<dyn Module> {
        Box::new(self.clone())
    }

    fn properties(&self) -> &'static [PropertyDescriptor] {
        PROPERTIES
    }

    fn get_property(&self, name: &str) -> Option<PropertyValue> {
        match name {
            "position" => Some(self.position.into()),
            "x" => Some(self.position.x.into()),
            "y" => Some(self.position.y.into()),
            "rotation" => Some(self.rotation.into()),
            "scale" => Some(self.scale.into()),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> SceneResult<()> {
        match name {
            "position" => self.position = value.as_vec2(name)?,
            "x" => self.position.x = value.as_float(name)?,
            "y" => self.position.y = value.as_float(name)?,
            "rotation" => self.rotation = value.as_float(name)?,
            "scale" => self.scale = value.as_vec2(name)?,
            _ => return Err(SceneError::NotFound(format!("property '{name}'"))),
        }
        Ok(())
    }
}
