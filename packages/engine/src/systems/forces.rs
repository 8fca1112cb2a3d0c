use crate::core::rng::next_signed;
use crate::core::Vec2;
use crate::domain::Particle;

use super::UpdateContext;

/// Pointer closer than this exerts no force (avoids the 1/d² spike)
pub const POINTER_MIN_DISTANCE: f32 = 5.0;

/// Sum of attractor pulls at `pos`, per reference frame
#[inline]
pub fn attractor_acceleration(pos: Vec2, ctx: &UpdateContext) -> Vec2 {
    let mut acc = Vec2::ZERO;
    for attractor in ctx.attractors {
        acc += attractor.pull(pos, ctx.config.softening);
    }
    acc
}

/// Pointer pull and colour retargeting.
///
/// Returns the proximity falloff `(R - d) / R` when the particle is inside the pointer
/// radius, `None` otherwise.
#[inline]
pub fn pointer_influence(p: &mut Particle, index: usize, ctx: &UpdateContext, acc: &mut Vec2) -> Option<f32> {
    let pointer = ctx.pointer?;
    let radius = ctx.config.mouse_radius;
    let delta = pointer - p.pos;
    let dist_sq = delta.length_squared();
    if dist_sq >= radius * radius {
        return None;
    }
    let dist = dist_sq.sqrt();

    if dist > POINTER_MIN_DISTANCE {
        let magnitude = ctx.config.mouse_strength / (dist_sq + ctx.config.softening);
        *acc += delta * (magnitude / dist);
    }

    if let Some(shift_radius) = ctx.config.color_shift_radius {
        if dist < shift_radius && !ctx.palette.is_empty() {
            let slot = (index + ctx.time_s.max(0.0) as usize) % ctx.palette.len();
            p.target_color = ctx.palette[slot];
            p.color_transition = 1.0;
        }
    }

    if radius > 0.0 {
        Some((radius - dist) / radius)
    } else {
        None
    }
}

/// Random jitter plus the page-scroll impulse
#[inline]
pub fn drift_and_scroll(p: &mut Particle, ctx: &UpdateContext, acc: &mut Vec2) {
    let drift = ctx.config.drift;
    if drift > 0.0 {
        let half = drift * 0.5;
        acc.x += next_signed(&mut p.rng, half);
        acc.y += next_signed(&mut p.rng, half);
    }
    acc.y -= ctx.scroll_impulse;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AttractorConfig, FieldConfig};
    use crate::env::Viewport;
    use crate::systems::spawn::spawn_particle;

    fn ctx<'a>(config: &'a FieldConfig, attractors: &'a [crate::domain::Attractor]) -> UpdateContext<'a> {
        UpdateContext {
            config,
            attractors,
            pointer: None,
            scroll_impulse: 0.0,
            viewport: Viewport::new(400.0, 400.0, 1.0),
            scale: 1.0,
            time_s: 0.0,
            palette: &config.colors,
        }
    }

    #[test]
    fn attractors_pull_towards_anchor() {
        let config = FieldConfig::default();
        let vp = Viewport::new(400.0, 400.0, 1.0);
        let attractors = [AttractorConfig::fraction(0.5, 0.5, 50.0).resolve(&vp, 0.0)];
        let c = ctx(&config, &attractors);
        let acc = attractor_acceleration(Vec2::new(100.0, 200.0), &c);
        assert!(acc.x > 0.0);
        assert!(acc.y.abs() < 1e-6);
    }

    #[test]
    fn pointer_pulls_only_inside_radius() {
        let config = FieldConfig::default();
        let mut c = ctx(&config, &[]);
        c.pointer = Some(Vec2::new(200.0, 200.0));
        let mut p = spawn_particle(&config, &c.viewport, 1, 0);

        p.pos = Vec2::new(150.0, 200.0);
        let mut acc = Vec2::ZERO;
        let falloff = pointer_influence(&mut p, 0, &c, &mut acc);
        assert!(acc.x > 0.0);
        assert!(matches!(falloff, Some(f) if f > 0.0 && f < 1.0));

        p.pos = Vec2::new(0.0, 0.0);
        let mut acc = Vec2::ZERO;
        assert!(pointer_influence(&mut p, 0, &c, &mut acc).is_none());
        assert_eq!(acc, Vec2::ZERO);
    }

    #[test]
    fn pointer_on_top_of_particle_exerts_no_force() {
        let config = FieldConfig::default();
        let mut c = ctx(&config, &[]);
        c.pointer = Some(Vec2::new(200.0, 200.0));
        let mut p = spawn_particle(&config, &c.viewport, 1, 0);
        p.pos = Vec2::new(202.0, 200.0);
        let mut acc = Vec2::ZERO;
        pointer_influence(&mut p, 0, &c, &mut acc);
        assert_eq!(acc, Vec2::ZERO);
    }

    #[test]
    fn close_pointer_retargets_colour() {
        let mut config = FieldConfig::default();
        config.colors = vec![crate::core::Rgb::new(255.0, 0.0, 0.0), crate::core::Rgb::new(0.0, 255.0, 0.0)];
        config.color_shift_radius = Some(100.0);
        let mut c = ctx(&config, &[]);
        c.pointer = Some(Vec2::new(200.0, 200.0));
        c.time_s = 3.4;
        let mut p = spawn_particle(&config, &c.viewport, 1, 0);
        p.pos = Vec2::new(160.0, 200.0);
        let mut acc = Vec2::ZERO;
        pointer_influence(&mut p, 0, &c, &mut acc);
        assert_eq!(p.target_color, config.colors[1]);
        assert_eq!(p.color_transition, 1.0);
    }

    #[test]
    fn scroll_impulse_pushes_up() {
        let config = FieldConfig::default();
        let mut c = ctx(&config, &[]);
        c.scroll_impulse = 2.0;
        let mut p = spawn_particle(&config, &c.viewport, 1, 0);
        let mut acc = Vec2::ZERO;
        drift_and_scroll(&mut p, &c, &mut acc);
        assert_eq!(acc, Vec2::new(0.0, -2.0));
    }
}
