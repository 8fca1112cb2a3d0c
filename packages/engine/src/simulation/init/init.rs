use crate::core::{EngineResult, Vec2};
use crate::domain::{FieldConfig, QualityTier};
use crate::env::EnvironmentSnapshot;
use crate::render::Scene;
use crate::systems::density::target_count;
use crate::systems::integrate::apply_boundary;
use crate::systems::spawn::spawn_particle;

use super::{FieldCore, FrameStats, DEFAULT_PARALLEL_THRESHOLD};

pub(super) fn create_field_core(config: FieldConfig, env: &EnvironmentSnapshot) -> EngineResult<FieldCore> {
    config.validate()?;

    let tier = QualityTier::detect(env);
    let budget = tier.budget();
    let viewport = env.viewport.with_max_dpr(config.max_device_pixel_ratio);
    let count = target_count(&config, &viewport, &budget);

    let particles = (0..count as u32)
        .map(|serial| spawn_particle(&config, &viewport, config.seed, serial))
        .collect();
    let attractors = config.attractors.iter().map(|a| a.resolve(&viewport, 0.0)).collect();
    let scene = Scene::new(viewport, config.clear, config.link_color(), config.line_width);

    log::debug!(
        "field: {} particles, {:?} tier, {}x{} @{}x",
        count,
        tier,
        viewport.width,
        viewport.height,
        viewport.dpr
    );

    Ok(FieldCore {
        perf_enabled: config.debug,
        config,
        tier,
        budget,
        hardware_concurrency: env.hardware_concurrency,
        viewport,
        particles,
        attractors,
        pointer: None,
        last_scroll_y: None,
        scroll_impulse: 0.0,
        time_s: 0.0,
        frame: 0,
        spawned: count as u32,
        scene,
        stats: FrameStats { particle_count: count as u32, ..FrameStats::default() },
        parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
    })
}

/// Proportional rescale plus top-up/trim to the new target count
pub(super) fn apply_resize(field: &mut FieldCore, viewport: crate::env::Viewport) {
    let viewport = viewport.with_max_dpr(field.config.max_device_pixel_ratio);
    let old = field.viewport;
    let sx = viewport.width / old.width;
    let sy = viewport.height / old.height;
    for p in &mut field.particles {
        p.pos = Vec2::new(p.pos.x * sx, p.pos.y * sy);
        // Scaled padding can overshoot the new padded bounds
        apply_boundary(p, &field.config, &viewport);
    }

    let target = target_count(&field.config, &viewport, &field.budget);
    if target < field.particles.len() {
        field.particles.truncate(target);
    } else {
        while field.particles.len() < target {
            let p = spawn_particle(&field.config, &viewport, field.config.seed, field.spawned);
            field.spawned = field.spawned.wrapping_add(1);
            field.particles.push(p);
        }
    }

    field.viewport = viewport;
    field.attractors = field
        .config
        .attractors
        .iter()
        .map(|a| a.resolve(&viewport, field.time_s))
        .collect();
    field.stats.particle_count = field.particles.len() as u32;

    log::debug!("field resized to {}x{}: {} particles", viewport.width, viewport.height, target);
}
