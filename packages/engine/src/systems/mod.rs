//! Per-frame particle systems.
//!
//! Each particle is updated independently from a shared, read-only `UpdateContext`:
//! forces -> damping/clamp/integrate -> boundary -> appearance/life.
//! Nothing in here touches another particle, so the simulation may run the update
//! sequentially or on rayon and get the same result.

pub mod connections;
pub mod density;
pub mod forces;
pub mod integrate;
pub mod life;
pub mod spawn;

use crate::core::{Rgb, Vec2};
use crate::domain::{Attractor, FieldConfig, Particle};
use crate::env::Viewport;

/// Upper bound on one step, in seconds; longer gaps (tab switches, breakpoints) are cut
pub const MAX_STEP_SECONDS: f32 = 0.1;
/// Frames per second the per-frame constants are tuned for
pub const REFERENCE_FPS: f32 = 60.0;

/// Convert elapsed seconds into elapsed reference frames
#[inline]
pub fn frame_scale(dt_seconds: f32) -> f32 {
    if !dt_seconds.is_finite() {
        return 0.0;
    }
    dt_seconds.clamp(0.0, MAX_STEP_SECONDS) * REFERENCE_FPS
}

/// Frame-wide inputs shared by every particle update
pub struct UpdateContext<'a> {
    pub config: &'a FieldConfig,
    pub attractors: &'a [Attractor],
    /// Pointer position, already gated by config and quality budget
    pub pointer: Option<Vec2>,
    /// Vertical impulse for this frame (per reference frame)
    pub scroll_impulse: f32,
    pub viewport: Viewport,
    /// Reference frames elapsed this step
    pub scale: f32,
    /// Seconds since the field started; drives colour cycling
    pub time_s: f32,
    pub palette: &'a [Rgb],
}

/// Advance one particle by one step
#[inline]
pub fn update_particle(p: &mut Particle, index: usize, ctx: &UpdateContext) {
    let mut acc = forces::attractor_acceleration(p.pos, ctx);
    let proximity = forces::pointer_influence(p, index, ctx, &mut acc);
    forces::drift_and_scroll(p, ctx, &mut acc);

    integrate::advance(p, acc, ctx);
    integrate::apply_boundary(p, ctx.config, &ctx.viewport);

    life::update_appearance(p, proximity, ctx);
    life::update_life(p, ctx);

    if !p.is_finite() {
        spawn::respawn(p, ctx.config, &ctx.viewport);
    }
}
