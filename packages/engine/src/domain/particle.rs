use crate::core::{Rgb, Vec2};

/// One decorative particle. Owned by `FieldCore`, never shared.
#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vec2,
    /// CSS pixels per reference frame (1/60 s)
    pub vel: Vec2,
    /// Radius at rest
    pub base_radius: f32,
    /// Current radius (grows near the pointer)
    pub radius: f32,
    pub alpha: f32,
    /// Alpha at rest; pointer proximity lifts `alpha` above it temporarily
    pub base_alpha: f32,
    /// Remaining life in `0..=1`; only the decay policy consumes it
    pub life: f32,
    pub color: Rgb,
    pub target_color: Rgb,
    /// Remaining colour transition in `0..=1`
    pub color_transition: f32,
    /// Private RNG stream
    pub(crate) rng: u32,
}

impl Particle {
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite() && self.radius.is_finite() && self.alpha.is_finite()
    }
}
