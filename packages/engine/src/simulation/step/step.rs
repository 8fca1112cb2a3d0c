#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::rng::next_signed;
use crate::domain::Particle;
use crate::systems::{frame_scale, update_particle, UpdateContext, MAX_STEP_SECONDS};

use super::{FieldCore, StageTimer};

/// Per-axis velocity kick handed out by `boost`
const BOOST_KICK: f32 = 5.0;
/// Scroll impulse kept per reference frame
const SCROLL_DECAY: f32 = 0.95;

pub(super) fn step(field: &mut FieldCore, dt_seconds: f32) {
    let timer = if field.perf_enabled { Some(StageTimer::start()) } else { None };

    let s = frame_scale(dt_seconds);
    if s > 0.0 {
        field.time_s += dt_seconds.min(MAX_STEP_SECONDS);
    }

    let time_s = field.time_s;
    let viewport = field.viewport;
    for (slot, cfg) in field.attractors.iter_mut().zip(&field.config.attractors) {
        if cfg.orbit.is_some() {
            *slot = cfg.resolve(&viewport, time_s);
        }
    }

    let pointer = if field.config.enable_mouse && field.budget.pointer { field.pointer } else { None };
    let ctx = UpdateContext {
        config: &field.config,
        attractors: &field.attractors,
        pointer,
        scroll_impulse: field.scroll_impulse,
        viewport,
        scale: s,
        time_s,
        palette: &field.config.colors,
    };

    let parallel = field.particles.len() >= field.parallel_threshold;
    update_particles(&mut field.particles, &ctx, parallel);

    field.scroll_impulse *= SCROLL_DECAY.powf(s);
    if field.scroll_impulse.abs() < 1e-4 {
        field.scroll_impulse = 0.0;
    }
    field.frame += 1;

    field.stats.frame = field.frame;
    field.stats.particle_count = field.particles.len() as u32;
    if let Some(t) = timer {
        field.stats.step_ms = t.elapsed_ms();
    }
}

#[cfg(feature = "parallel")]
fn update_particles(particles: &mut [Particle], ctx: &UpdateContext, parallel: bool) {
    if parallel {
        particles
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, p)| update_particle(p, i, ctx));
    } else {
        for (i, p) in particles.iter_mut().enumerate() {
            update_particle(p, i, ctx);
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn update_particles(particles: &mut [Particle], ctx: &UpdateContext, _parallel: bool) {
    for (i, p) in particles.iter_mut().enumerate() {
        update_particle(p, i, ctx);
    }
}

/// Random velocity kick for every particle; the speed cap reins it in over the next steps
pub(super) fn boost(field: &mut FieldCore) {
    for p in &mut field.particles {
        p.vel.x += next_signed(&mut p.rng, BOOST_KICK);
        p.vel.y += next_signed(&mut p.rng, BOOST_KICK);
    }
}
