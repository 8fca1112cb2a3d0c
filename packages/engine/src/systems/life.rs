use crate::core::rng::next_signed;
use crate::domain::{LifePolicy, Particle};

use super::spawn::respawn;
use super::UpdateContext;

/// Fraction of the remaining gap closed per reference frame when easing
const EASE_PER_FRAME: f32 = 0.05;
/// Colour transition budget consumed per reference frame
const TRANSITION_PER_FRAME: f32 = 0.02;
/// Alpha added per reference frame at full pointer proximity
const PROXIMITY_BRIGHTEN: f32 = 0.2;

/// Frame-rate independent form of "close EASE_PER_FRAME of the gap each frame"
#[inline]
fn ease_factor(scale: f32) -> f32 {
    1.0 - (1.0 - EASE_PER_FRAME).powf(scale)
}

/// Radius/alpha response to the pointer and the palette colour transition
#[inline]
pub fn update_appearance(p: &mut Particle, proximity: Option<f32>, ctx: &UpdateContext) {
    let s = ctx.scale;
    let ease = ease_factor(s);
    let scale = ctx.config.proximity_scale;

    match proximity {
        Some(falloff) if scale > 0.0 => {
            p.radius = p.base_radius * (1.0 + falloff * scale);
            p.alpha = (p.alpha + falloff * PROXIMITY_BRIGHTEN * s).min(1.0);
        }
        _ => {
            p.radius += (p.base_radius - p.radius) * ease;
            if ctx.config.life == LifePolicy::Static {
                p.alpha += (p.base_alpha - p.alpha) * ease;
            }
        }
    }

    if p.color_transition > 0.0 {
        p.color = p.color.lerp(p.target_color, ease);
        p.color_transition = (p.color_transition - TRANSITION_PER_FRAME * s).max(0.0);
    }
}

/// Twinkle or decay, depending on the life policy
#[inline]
pub fn update_life(p: &mut Particle, ctx: &UpdateContext) {
    match ctx.config.life {
        LifePolicy::Static => {}
        LifePolicy::Twinkle { min, max, step } => {
            p.alpha = (p.alpha + next_signed(&mut p.rng, step) * ctx.scale).clamp(min, max);
        }
        LifePolicy::Decay { rate } => {
            p.life -= rate * ctx.scale;
            if p.life <= 0.0 {
                respawn(p, ctx.config, &ctx.viewport);
            } else {
                p.alpha = p.life * ctx.config.alpha_range[1];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Rgb;
    use crate::domain::FieldConfig;
    use crate::env::Viewport;
    use crate::systems::spawn::spawn_particle;

    fn ctx(config: &FieldConfig) -> UpdateContext<'_> {
        UpdateContext {
            config,
            attractors: &[],
            pointer: None,
            scroll_impulse: 0.0,
            viewport: Viewport::new(300.0, 300.0, 1.0),
            scale: 1.0,
            time_s: 0.0,
            palette: &config.colors,
        }
    }

    #[test]
    fn twinkle_stays_in_range() {
        let mut config = FieldConfig::default();
        config.life = LifePolicy::Twinkle { min: 0.2, max: 0.8, step: 0.05 };
        let c = ctx(&config);
        let mut p = spawn_particle(&config, &c.viewport, 5, 1);
        for _ in 0..2_000 {
            update_life(&mut p, &c);
            assert!((0.2..=0.8).contains(&p.alpha));
        }
    }

    #[test]
    fn decay_fades_then_respawns() {
        let mut config = FieldConfig::default();
        config.life = LifePolicy::Decay { rate: 0.25 };
        let c = ctx(&config);
        let mut p = spawn_particle(&config, &c.viewport, 5, 1);
        p.life = 0.6;
        update_life(&mut p, &c);
        assert!((p.life - 0.35).abs() < 1e-6);
        assert!((p.alpha - 0.35 * config.alpha_range[1]).abs() < 1e-6);
        update_life(&mut p, &c);
        update_life(&mut p, &c);
        assert_eq!(p.life, 1.0);
    }

    #[test]
    fn proximity_grows_radius_then_relaxes() {
        let config = FieldConfig::default();
        let c = ctx(&config);
        let mut p = spawn_particle(&config, &c.viewport, 5, 1);
        update_appearance(&mut p, Some(1.0), &c);
        assert!((p.radius - p.base_radius * 1.5).abs() < 1e-5);
        for _ in 0..400 {
            update_appearance(&mut p, None, &c);
        }
        assert!((p.radius - p.base_radius).abs() < 1e-3);
        assert!((p.alpha - p.base_alpha).abs() < 1e-3);
    }

    #[test]
    fn colour_transition_eases_and_finishes() {
        let config = FieldConfig::default();
        let c = ctx(&config);
        let mut p = spawn_particle(&config, &c.viewport, 5, 1);
        p.color = Rgb::new(0.0, 0.0, 0.0);
        p.target_color = Rgb::new(200.0, 0.0, 0.0);
        p.color_transition = 1.0;
        update_appearance(&mut p, None, &c);
        assert!((p.color.r - 10.0).abs() < 1e-3);
        for _ in 0..60 {
            update_appearance(&mut p, None, &c);
        }
        assert_eq!(p.color_transition, 0.0);
    }
}
