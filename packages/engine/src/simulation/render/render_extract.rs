use crate::domain::BackdropConfig;
use crate::env::Viewport;
use crate::render::{Backdrop, Halo, Spot, Sprite};
use crate::systems::connections::collect_links;

use super::{FieldCore, StageTimer};

/// Core colour lift when a halo is drawn behind the particle
const HALO_CORE_BRIGHTEN: f32 = 1.2;

pub(super) fn extract_scene(field: &mut FieldCore) {
    let timer = if field.perf_enabled { Some(StageTimer::start()) } else { None };
    let cfg = &field.config;
    let scene = &mut field.scene;
    scene.reset(field.viewport);

    let scroll_y = field.last_scroll_y.unwrap_or(0.0);
    match &cfg.backdrop {
        Some(config) => {
            let backdrop = scene.backdrop.get_or_insert_with(|| Backdrop {
                style: config.style,
                top: config.top,
                bottom: config.bottom,
                vignette: config.vignette,
                spots: Vec::with_capacity(config.spots.len()),
            });
            fill_spots(backdrop, config, &field.viewport, field.time_s, scroll_y);
        }
        None => scene.backdrop = None,
    }

    if cfg.show_connections && field.budget.connections {
        collect_links(&field.particles, cfg.connection_distance, cfg.connection_opacity, &mut scene.links);
    }

    scene.sprites.extend(field.particles.iter().map(|p| match cfg.glow {
        Some(glow) => Sprite {
            pos: p.pos,
            radius: p.radius,
            color: p.color.scaled(HALO_CORE_BRIGHTEN),
            alpha: p.alpha,
            halo: Some(Halo {
                radius: p.radius * glow.scale,
                color: p.color,
                alpha: p.alpha * glow.alpha,
                gradient: glow.gradient,
            }),
        },
        None => Sprite { pos: p.pos, radius: p.radius, color: p.color, alpha: p.alpha, halo: None },
    }));

    field.stats.link_count = scene.links.len() as u32;
    field.stats.sprite_count = scene.sprites.len() as u32;
    if let Some(t) = timer {
        field.stats.extract_ms = t.elapsed_ms();
    }
}

/// Resolve every spot for this frame, reusing the spot buffer
fn fill_spots(backdrop: &mut Backdrop, config: &BackdropConfig, viewport: &Viewport, time_s: f32, scroll_y: f32) {
    backdrop.spots.clear();
    backdrop.spots.extend(config.spots.iter().enumerate().map(|(i, spot)| Spot {
        pos: spot.position(viewport, time_s, scroll_y),
        radius: spot.radius_at(time_s, i),
        color: spot.color,
        alpha: spot.alpha,
        strength: spot.strength,
    }));
}
