//! Positional jitter
//!
//! The shake offsets the transform for the duration of the draw pass only,
//! so game logic never observes the jittered position. If the draw pass is
//! cut short by hiding, disabling or destroying the node, the position is
//! restored right there.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::foundation::math::{smooth_lerp_010_vec2, vec2_from_array, Vec2};
use crate::scene::{
    Module, ModuleConfig, ModuleContext, PropertyDescriptor, PropertyValue, SceneError,
    SceneResult,
};

/// Shakes its node around the current position
#[derive(Debug, Clone)]
pub struct ShakeModule {
    intensity: Vec2,
    frequency: f32,
    target: Vec2,
    since_change: f32,
    saved_position: Option<Vec2>,
    rng: StdRng,
}

impl ShakeModule {
    /// Shake up to `intensity` units on both axes, picking `frequency` new offsets per second
    pub fn new(intensity: f32, frequency: f32) -> Self {
        Self {
            intensity: Vec2::new(intensity, intensity),
            frequency,
            target: Vec2::zeros(),
            since_change: 0.0,
            saved_position: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a different intensity per axis
    pub fn with_intensity(mut self, intensity: Vec2) -> Self {
        self.intensity = intensity;
        self
    }

    /// Make the jitter reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Maximum offset per axis
    pub fn intensity(&self) -> Vec2 {
        self.intensity
    }

    /// Offsets per second
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Offset applied during the current draw pass
    pub fn offset(&self) -> Vec2 {
        let period = self.period();
        let amount = if period > 0.0 {
            (self.since_change / period).clamp(0.0, 1.0)
        } else {
            0.0
        };
        smooth_lerp_010_vec2(Vec2::zeros(), self.target, amount)
    }

    fn period(&self) -> f32 {
        if self.frequency > 0.0 {
            1.0 / self.frequency
        } else {
            0.0
        }
    }

    fn restore(&mut self, ctx: &mut ModuleContext<'_>) {
        if let Some(position) = self.saved_position.take() {
            if let Ok(transform) = ctx.transform_mut() {
                transform.position = position;
            }
        }
    }

    fn pick_target(&mut self) {
        let x = self.rng.gen_range(-self.intensity.x..=self.intensity.x);
        let y = self.rng.gen_range(-self.intensity.y..=self.intensity.y);
        self.target = Vec2::new(x, y);
    }
}

impl Default for ShakeModule {
    fn default() -> Self {
        Self::new(1.0, 30.0)
    }
}

const PROPERTIES: &[PropertyDescriptor] = &[
    PropertyDescriptor::read_write("intensity"),
    PropertyDescriptor::read_write("frequency"),
    PropertyDescriptor::read_only("offset"),
];

impl Module for ShakeModule {
    fn clone_module(&self) -> Box<dyn Module> {
        Box::new(self.clone())
    }

    fn on_clone(&self, clone: &mut dyn Module) {
        if let Some(clone) = clone.downcast_mut::<Self>() {
            // The copied transform may still carry the offset; the clone
            // restores it from the same saved position.
            clone.rng = StdRng::from_entropy();
        }
    }

    fn properties(&self) -> &'static [PropertyDescriptor] {
        PROPERTIES
    }

    fn get_property(&self, name: &str) -> Option<PropertyValue> {
        match name {
            "intensity" => Some(self.intensity.into()),
            "frequency" => Some(self.frequency.into()),
            "offset" => Some(self.offset().into()),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> SceneResult<()> {
        match name {
            "intensity" => {
                let intensity = value.as_vec2(name)?;
                validate_intensity(intensity)?;
                self.intensity = intensity;
            }
            "frequency" => {
                let frequency = value.as_float(name)?;
                validate_frequency(frequency)?;
                self.frequency = frequency;
            }
            _ => return Err(SceneError::NotFound(format!("property '{name}'"))),
        }
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut ModuleContext<'_>) {
        let period = self.period();
        if period <= 0.0 {
            return;
        }
        self.since_change += ctx.time().delta_secs();
        if self.since_change >= period {
            self.since_change %= period;
            self.pick_target();
        }
    }

    fn on_pre_draw(&mut self, ctx: &mut ModuleContext<'_>) {
        self.restore(ctx);
        let offset = self.offset();
        if let Ok(transform) = ctx.transform_mut() {
            self.saved_position = Some(transform.position);
            transform.position += offset;
        }
    }

    fn on_post_draw(&mut self, ctx: &mut ModuleContext<'_>) {
        self.restore(ctx);
    }

    fn on_invisible(&mut self, ctx: &mut ModuleContext<'_>) {
        self.restore(ctx);
    }

    fn on_disable(&mut self, ctx: &mut ModuleContext<'_>) {
        self.restore(ctx);
    }

    fn on_destroy(&mut self, ctx: &mut ModuleContext<'_>) {
        self.restore(ctx);
    }
}

fn validate_intensity(intensity: Vec2) -> SceneResult<()> {
    if intensity.iter().all(|v| v.is_finite() && *v >= 0.0) {
        Ok(())
    } else {
        Err(SceneError::invalid_value("intensity", "must be finite and non-negative"))
    }
}

fn validate_frequency(frequency: f32) -> SceneResult<()> {
    if frequency.is_finite() && frequency > 0.0 {
        Ok(())
    } else {
        Err(SceneError::invalid_value("frequency", "must be a positive number"))
    }
}

/// Typed construction parameters for [`ShakeModule`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    /// Maximum offset per axis
    pub intensity: [f32; 2],
    /// Offsets per second
    pub frequency: f32,
    /// Seed for reproducible jitter
    pub seed: Option<u64>,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            intensity: [1.0, 1.0],
            frequency: 30.0,
            seed: None,
        }
    }
}

impl ModuleConfig for ShakeConfig {
    type Module = ShakeModule;

    fn build(self) -> SceneResult<ShakeModule> {
        let intensity = vec2_from_array(self.intensity);
        validate_intensity(intensity)?;
        validate_frequency(self.frequency)?;

        let module = ShakeModule::new(0.0, self.frequency).with_intensity(intensity);
        Ok(match self.seed {
            Some(seed) => module.with_seed(seed),
            None => module,
        })
    }
}
