//! Math utilities and types
//!
//! The scene graph positions nodes on a 2D plane.

pub use nalgebra::Vector2;

use std::f32::consts::PI;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Smoothly interpolates from `a` to `b` and back again as `amount` goes 0 → 1
///
/// The curve peaks at `amount == 0.5`.
pub fn smooth_lerp_010(a: f32, b: f32, amount: f32) -> f32 {
    let weight = (amount * PI).sin().abs();
    a + (b - a) * weight
}

/// Component-wise [`smooth_lerp_010`]
pub fn smooth_lerp_010_vec2(a: Vec2, b: Vec2, amount: f32) -> Vec2 {
    Vec2::new(
        smooth_lerp_010(a.x, b.x, amount),
        smooth_lerp_010(a.y, b.y, amount),
    )
}

/// Convert a `[x, y]` pair into a vector
pub fn vec2_from_array(value: [f32; 2]) -> Vec2 {
    Vec2::new(value[0], value[1])
}
