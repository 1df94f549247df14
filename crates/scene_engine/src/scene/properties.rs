//! Named module properties
//!
//! Modules expose a small property surface so they can be configured from
//! data files. Values are plain serde types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{SceneError, SceneResult};
use crate::foundation::math::Vec2;

/// A dynamically typed property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// Boolean flag
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f32),
    /// String
    Text(String),
    /// 2D vector as `[x, y]`
    Vec2([f32; 2]),
    /// RGBA color
    Color([u8; 4]),
}

impl PropertyValue {
    /// Name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Vec2(_) => "vec2",
            Self::Color(_) => "color",
        }
    }

    /// Read a boolean
    pub fn as_bool(&self, property: &str) -> SceneResult<bool> {
        match self {
            Self::Bool(value) => Ok(*value),
            other => Err(other.mismatch(property, "bool")),
        }
    }

    /// Read an integer
    pub fn as_int(&self, property: &str) -> SceneResult<i64> {
        match self {
            Self::Int(value) => Ok(*value),
            other => Err(other.mismatch(property, "int")),
        }
    }

    /// Read a float; integers are widened
    pub fn as_float(&self, property: &str) -> SceneResult<f32> {
        match self {
            Self::Float(value) => Ok(*value),
            Self::Int(value) => Ok(*value as f32),
            other => Err(other.mismatch(property, "float")),
        }
    }

    /// Read a string
    pub fn as_text(&self, property: &str) -> SceneResult<&str> {
        match self {
            Self::Text(value) => Ok(value),
            other => Err(other.mismatch(property, "text")),
        }
    }

    /// Read a vector
    pub fn as_vec2(&self, property: &str) -> SceneResult<Vec2> {
        match self {
            Self::Vec2([x, y]) => Ok(Vec2::new(*x, *y)),
            other => Err(other.mismatch(property, "vec2")),
        }
    }

    /// Read a color
    pub fn as_color(&self, property: &str) -> SceneResult<[u8; 4]> {
        match self {
            Self::Color(value) => Ok(*value),
            other => Err(other.mismatch(property, "color")),
        }
    }

    fn mismatch(&self, property: &str, expected: &str) -> SceneError {
        SceneError::invalid_value(property, format!("expected {expected}, got {}", self.kind()))
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec2> for PropertyValue {
    fn from(value: Vec2) -> Self {
        Self::Vec2([value.x, value.y])
    }
}

impl From<[u8; 4]> for PropertyValue {
    fn from(value: [u8; 4]) -> Self {
        Self::Color(value)
    }
}

/// Initial property values keyed by name
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// Whether a property can be written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Readable and writable
    ReadWrite,
    /// Readable only
    ReadOnly,
}

/// Declares one property of a module type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Property name
    pub name: &'static str,
    /// Access mode
    pub access: Access,
}

impl PropertyDescriptor {
    /// A writable property
    pub const fn read_write(name: &'static str) -> Self {
        Self { name, access: Access::ReadWrite }
    }

    /// A read-only property
    pub const fn read_only(name: &'static str) -> Self {
        Self { name, access: Access::ReadOnly }
    }

    /// Check if writes are allowed
    pub fn is_writable(&self) -> bool {
        self.access == Access::ReadWrite
    }
}

/// Find a descriptor by name
pub fn find_property<'a>(
    properties: &'a [PropertyDescriptor],
    name: &str,
) -> Option<&'a PropertyDescriptor> {
    properties.iter().find(|descriptor| descriptor.name == name)
}
