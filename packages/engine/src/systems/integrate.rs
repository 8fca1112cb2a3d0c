use crate::core::Vec2;
use crate::domain::{BoundaryPolicy, FieldConfig, Particle};
use crate::env::Viewport;

use super::UpdateContext;

/// Apply acceleration, damping and the speed cap, then move
#[inline]
pub fn advance(p: &mut Particle, acc: Vec2, ctx: &UpdateContext) {
    let s = ctx.scale;
    let cfg = ctx.config;

    p.vel += acc * s;
    if cfg.damping < 1.0 {
        p.vel *= cfg.damping.powf(s);
    }
    p.vel = p.vel.clamp_length(cfg.max_speed);
    p.pos += p.vel * s;
}

/// Keep the particle inside the padded viewport
#[inline]
pub fn apply_boundary(p: &mut Particle, config: &FieldConfig, viewport: &Viewport) {
    let pad = config.edge_padding;
    let (w, h) = (viewport.width, viewport.height);
    match config.boundary {
        BoundaryPolicy::Wrap => {
            p.pos.x = wrap_axis(p.pos.x, w, pad);
            p.pos.y = wrap_axis(p.pos.y, h, pad);
        }
        BoundaryPolicy::Bounce => {
            bounce_axis(&mut p.pos.x, &mut p.vel.x, w, pad);
            bounce_axis(&mut p.pos.y, &mut p.vel.y, h, pad);
        }
    }
}

/// Toroidal wrap over `[-pad, extent + pad]`; the overshoot carries over to the far side
#[inline]
fn wrap_axis(v: f32, extent: f32, pad: f32) -> f32 {
    if v < -pad || v > extent + pad {
        (v + pad).rem_euclid(extent + 2.0 * pad) - pad
    } else {
        v
    }
}

#[inline]
fn bounce_axis(pos: &mut f32, vel: &mut f32, extent: f32, pad: f32) {
    if *pos < -pad {
        *pos = -pad;
        *vel = vel.abs();
    } else if *pos > extent + pad {
        *pos = extent + pad;
        *vel = -vel.abs();
    }
}
