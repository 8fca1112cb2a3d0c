use std::f32::consts::TAU;

use crate::core::rng::{derive_seed, next_range, next_unit};
use crate::core::Vec2;
use crate::domain::{FieldConfig, LifePolicy, Particle};
use crate::env::Viewport;

/// Create particle number `serial` with a uniformly random position, heading and look
pub fn spawn_particle(config: &FieldConfig, viewport: &Viewport, seed: u32, serial: u32) -> Particle {
    let mut rng = derive_seed(seed, serial);

    let pos = random_position(&mut rng, viewport);
    let vel = random_velocity(&mut rng, config);
    let radius = next_range(&mut rng, config.min_radius, config.particle_radius);
    let [alpha_min, alpha_max] = config.alpha_range;
    let palette_idx = ((next_unit(&mut rng) * config.colors.len() as f32) as usize).min(config.colors.len() - 1);
    let color = config.colors[palette_idx];

    let (life, alpha) = match config.life {
        // Staggered lives so the whole field doesn't respawn on the same frame
        LifePolicy::Decay { .. } => {
            let life = next_unit(&mut rng);
            (life, life * alpha_max)
        }
        _ => (1.0, next_range(&mut rng, alpha_min, alpha_max)),
    };

    Particle {
        pos,
        vel,
        base_radius: radius,
        radius,
        alpha,
        base_alpha: alpha,
        life,
        color,
        target_color: color,
        color_transition: 0.0,
        rng,
    }
}

/// Recycle a particle in place: new position and velocity, full life. Look is kept.
pub fn respawn(p: &mut Particle, config: &FieldConfig, viewport: &Viewport) {
    p.pos = random_position(&mut p.rng, viewport);
    p.vel = random_velocity(&mut p.rng, config);
    p.life = 1.0;
    p.radius = p.base_radius;
    p.alpha = match config.life {
        LifePolicy::Decay { .. } => config.alpha_range[1],
        _ => p.base_alpha,
    };
}

fn random_position(rng: &mut u32, viewport: &Viewport) -> Vec2 {
    Vec2::new(next_range(rng, 0.0, viewport.width), next_range(rng, 0.0, viewport.height))
}

fn random_velocity(rng: &mut u32, config: &FieldConfig) -> Vec2 {
    let angle = next_range(rng, 0.0, TAU);
    let speed = next_range(rng, config.min_speed, config.max_speed);
    Vec2::from_angle(angle, speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_particles_respect_config_ranges() {
        let config = FieldConfig::default();
        let vp = Viewport::new(640.0, 480.0, 1.0);
        for serial in 0..500 {
            let p = spawn_particle(&config, &vp, 42, serial);
            assert!(p.pos.x >= 0.0 && p.pos.x <= vp.width);
            assert!(p.pos.y >= 0.0 && p.pos.y <= vp.height);
            assert!(p.speed() <= config.max_speed + 1e-5);
            assert!(p.speed() >= config.min_speed - 1e-5);
            assert!(p.radius >= config.min_radius && p.radius <= config.particle_radius);
            assert!(p.alpha >= config.alpha_range[0] && p.alpha <= config.alpha_range[1]);
        }
    }

    #[test]
    fn same_seed_and_serial_spawn_identically() {
        let config = FieldConfig::default();
        let vp = Viewport::new(640.0, 480.0, 1.0);
        let a = spawn_particle(&config, &vp, 9, 3);
        let b = spawn_particle(&config, &vp, 9, 3);
        assert_eq!(a.pos, b.pos);
        assert_eq!(a.vel, b.vel);
    }

    #[test]
    fn respawn_restores_full_life() {
        let mut config = FieldConfig::default();
        config.life = LifePolicy::Decay { rate: 0.01 };
        let vp = Viewport::new(100.0, 100.0, 1.0);
        let mut p = spawn_particle(&config, &vp, 1, 0);
        p.life = 0.0;
        respawn(&mut p, &config, &vp);
        assert_eq!(p.life, 1.0);
        assert_eq!(p.alpha, config.alpha_range[1]);
    }
}
