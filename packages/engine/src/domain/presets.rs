//! Named configurations for the site's background effects

use crate::core::color::{BLACK, WHITE};
use crate::core::{EngineError, EngineResult, Rgb};

use super::attractor::{AttractorConfig, Orbit};
use super::backdrop::{BackdropConfig, BackdropStyle, SpotConfig};
use super::config::{BackendKind, ClearMode, FieldConfig, GlowConfig, LifePolicy};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// Slow drifting dots joined by faint lines, pointer pulls and enlarges them
    Constellation,
    /// Seven-colour particles orbiting seven attractors with trails and scroll parallax
    ColoredGravity,
    /// White glowing dots drifting in straight lines, linked when close
    Flowing,
    /// White particles pulled by four strong attractors
    SimpleGravity,
    /// Thousands of decaying GPU points falling towards four centres
    PointCloud,
    /// Twinkling near-static stars
    Starfield,
    /// Stars over a dark gradient with three drifting colour spots
    Ambient,
    /// Shader colour wash banded from three wandering attractors, light dust on top
    FieldWash,
}

pub const PRESET_NAMES: [&str; 8] = [
    "constellation",
    "colored-gravity",
    "flowing",
    "simple-gravity",
    "point-cloud",
    "starfield",
    "ambient",
    "field-wash",
];

const GRAVITY_PALETTE: [Rgb; 7] = [
    Rgb::new(59.0, 130.0, 246.0),
    Rgb::new(168.0, 85.0, 247.0),
    Rgb::new(236.0, 72.0, 153.0),
    Rgb::new(34.0, 197.0, 94.0),
    Rgb::new(251.0, 146.0, 60.0),
    Rgb::new(99.0, 102.0, 241.0),
    Rgb::new(250.0, 204.0, 21.0),
];

impl Preset {
    pub fn from_name(name: &str) -> EngineResult<Self> {
        match name {
            "constellation" => Ok(Preset::Constellation),
            "colored-gravity" => Ok(Preset::ColoredGravity),
            "flowing" => Ok(Preset::Flowing),
            "simple-gravity" => Ok(Preset::SimpleGravity),
            "point-cloud" => Ok(Preset::PointCloud),
            "starfield" => Ok(Preset::Starfield),
            "ambient" => Ok(Preset::Ambient),
            "field-wash" => Ok(Preset::FieldWash),
            other => Err(EngineError::UnknownPreset(other.to_string())),
        }
    }

    pub fn config(self) -> FieldConfig {
        let base = FieldConfig::default();
        match self {
            Preset::Ambient => FieldConfig {
                backdrop: Some(ambient_backdrop()),
                ..Preset::Starfield.config()
            },
            Preset::FieldWash => FieldConfig {
                particle_count: 40,
                max_particles: 80,
                colors: vec![WHITE],
                max_speed: 0.2,
                min_speed: 0.05,
                particle_radius: 1.2,
                min_radius: 0.5,
                alpha_range: [0.1, 0.3],
                opacity: 1.0,
                show_connections: false,
                enable_mouse: false,
                damping: 1.0,
                backend: BackendKind::WebGl,
                backdrop: Some(field_wash_backdrop()),
                ..base
            },
            Preset::Constellation => base,
            Preset::ColoredGravity => FieldConfig {
                particle_count: 520,
                max_particles: 600,
                colors: GRAVITY_PALETTE.to_vec(),
                max_speed: 3.0,
                min_speed: 0.0,
                particle_radius: 1.6,
                min_radius: 0.4,
                alpha_range: [0.2, 0.5],
                opacity: 1.0,
                show_connections: false,
                mouse_radius: 200.0,
                mouse_strength: 80.0,
                color_shift_radius: Some(100.0),
                proximity_scale: 0.0,
                attractors: vec![
                    AttractorConfig::fraction(0.5, 0.2, 31.5).with_range(10.0, 800.0),
                    AttractorConfig::fraction(0.2, 0.4, 28.0).with_range(10.0, 800.0),
                    AttractorConfig::fraction(0.8, 0.4, 28.0).with_range(10.0, 800.0),
                    AttractorConfig::fraction(0.5, 0.5, 35.0).with_range(10.0, 800.0),
                    AttractorConfig::fraction(0.3, 0.7, 31.5).with_range(10.0, 800.0),
                    AttractorConfig::fraction(0.7, 0.7, 31.5).with_range(10.0, 800.0),
                    AttractorConfig::fraction(0.5, 0.9, 28.0).with_range(10.0, 800.0),
                ],
                softening: 100.0,
                damping: 0.99,
                edge_padding: 50.0,
                life: LifePolicy::Twinkle { min: 0.2, max: 0.8, step: 0.003 },
                drift: 0.05,
                scroll_influence: 0.15,
                clear: ClearMode::Trail { color: BLACK, alpha: 0.16 },
                glow: Some(GlowConfig { scale: 3.0, alpha: 0.2, gradient: false }),
                ..base
            },
            Preset::Flowing => FieldConfig {
                particle_count: 50,
                colors: vec![WHITE],
                max_speed: 0.71,
                min_speed: 0.0,
                particle_radius: 4.0,
                min_radius: 1.0,
                alpha_range: [0.3, 0.8],
                opacity: 0.5,
                connection_distance: 150.0,
                connection_opacity: 0.2,
                connection_color: Some(WHITE),
                enable_mouse: false,
                damping: 1.0,
                edge_padding: 50.0,
                life: LifePolicy::Twinkle { min: 0.1, max: 0.8, step: 0.01 },
                clear: ClearMode::Solid { color: BLACK },
                glow: Some(GlowConfig { scale: 4.0, alpha: 1.0, gradient: true }),
                ..base
            },
            Preset::SimpleGravity => FieldConfig {
                particle_count: 100,
                colors: vec![WHITE],
                max_speed: 8.0,
                min_speed: 0.0,
                particle_radius: 3.0,
                min_radius: 1.0,
                alpha_range: [0.7, 1.0],
                opacity: 0.6,
                show_connections: false,
                mouse_radius: 200.0,
                mouse_strength: 200.0,
                proximity_scale: 0.0,
                attractors: vec![
                    AttractorConfig::fraction(0.5, 0.3, 80.0).with_range(10.0, 500.0),
                    AttractorConfig::fraction(0.2, 0.6, 60.0).with_range(10.0, 500.0),
                    AttractorConfig::fraction(0.8, 0.7, 60.0).with_range(10.0, 500.0),
                    AttractorConfig::fraction(0.5, 0.8, 70.0).with_range(10.0, 500.0),
                ],
                softening: 1.0,
                damping: 0.995,
                life: LifePolicy::Twinkle { min: 0.2, max: 1.0, step: 0.005 },
                clear: ClearMode::Solid { color: BLACK },
                glow: Some(GlowConfig { scale: 3.0, alpha: 1.0, gradient: true }),
                ..base
            },
            Preset::PointCloud => FieldConfig {
                particle_count: 4000,
                max_particles: 4000,
                colors: vec![WHITE],
                max_speed: 3.0,
                min_speed: 0.0,
                particle_radius: 3.5,
                min_radius: 1.0,
                alpha_range: [0.0, 1.0],
                opacity: 1.0,
                show_connections: false,
                mouse_radius: 100.0,
                mouse_strength: 5.0,
                proximity_scale: 0.0,
                backend: BackendKind::WebGl,
                attractors: vec![
                    AttractorConfig::fraction(0.5, 0.3, 40.0).with_range(10.0, 960.0),
                    AttractorConfig::fraction(0.2, 0.6, 25.0).with_range(10.0, 960.0),
                    AttractorConfig::fraction(0.8, 0.7, 25.0).with_range(10.0, 960.0),
                    AttractorConfig::fraction(0.5, 0.9, 30.0).with_range(10.0, 960.0),
                ],
                softening: 1.0,
                damping: 0.995,
                edge_padding: 100.0,
                life: LifePolicy::Decay { rate: 0.0003 },
                clear: ClearMode::Solid { color: BLACK },
                ..base
            },
            Preset::Starfield => FieldConfig {
                particle_count: 150,
                density: Some(0.5),
                max_particles: 220,
                colors: vec![WHITE],
                max_speed: 0.05,
                min_speed: 0.0,
                particle_radius: 1.6,
                min_radius: 0.4,
                alpha_range: [0.25, 0.6],
                opacity: 1.0,
                show_connections: false,
                enable_mouse: false,
                damping: 1.0,
                life: LifePolicy::Twinkle { min: 0.25, max: 0.6, step: 0.02 },
                scroll_influence: 0.02,
                ..base
            },
        }
    }
}

/// Dark diagonal gradient, three soft spots drifting together and leaning with the scroll
fn ambient_backdrop() -> BackdropConfig {
    let drift = |sx: f32, sy: f32| Orbit {
        radius_y: Some(40.0 * sy),
        speed_y: Some(0.1),
        ..Orbit::circle(60.0 * sx, 0.12, -std::f32::consts::FRAC_PI_2)
    };
    BackdropConfig {
        style: BackdropStyle::Spots,
        top: Rgb::new(11.0, 15.0, 20.0),
        bottom: Rgb::new(14.0, 20.0, 28.0),
        vignette: 0.0,
        spots: vec![
            SpotConfig::new(0.2, 0.25, 420.0, Rgb::new(90.0, 200.0, 255.0), 0.14)
                .with_orbit(drift(1.0, 0.5))
                .with_pulse(20.0)
                .with_parallax(0.02, 0.0075),
            SpotConfig::new(0.8, 0.2, 360.0, Rgb::new(140.0, 90.0, 255.0), 0.12)
                .with_orbit(drift(-0.6, 0.5))
                .with_pulse(20.0)
                .with_parallax(-0.012, 0.0075),
            SpotConfig::new(0.5, 0.8, 380.0, Rgb::new(255.0, 107.0, 53.0), 0.06)
                .with_orbit(drift(0.4, -1.0))
                .with_pulse(20.0)
                .with_parallax(0.008, -0.015),
        ],
    }
}

/// Blue, purple and warm bands over near-black, from three slow Lissajous attractors
fn field_wash_backdrop() -> BackdropConfig {
    let wander = |rx: f32, sx: f32, ry: f32, sy: f32, phase: f32| Orbit {
        radius_y: Some(ry),
        speed_y: Some(sy),
        ..Orbit::circle(rx, sx, phase)
    };
    let base = Rgb::new(11.0, 15.0, 21.0);
    BackdropConfig {
        style: BackdropStyle::Field,
        top: base,
        bottom: base,
        vignette: 0.15,
        spots: vec![
            SpotConfig::new(0.5, 0.5, 420.0, Rgb::new(59.0, 154.0, 254.0), 0.6)
                .with_strength(0.020)
                .with_orbit(wander(315.0, 0.12, 225.0, 0.10, 0.0))
                .with_parallax(0.0, -0.05),
            SpotConfig::new(0.5, 0.5, 380.0, Rgb::new(168.0, 90.0, 247.0), 0.5)
                .with_strength(0.018)
                .with_orbit(wander(360.0, 0.09, 270.0, 0.11, 1.7))
                .with_parallax(0.0, -0.03),
            SpotConfig::new(0.5, 0.5, 340.0, Rgb::new(255.0, 107.0, 54.0), 0.3)
                .with_strength(0.016)
                .with_orbit(wander(405.0, 0.07, 315.0, 0.08, 3.1))
                .with_parallax(0.0, 0.02),
        ],
    }
}

impl FieldConfig {
    pub fn preset(name: &str) -> EngineResult<Self> {
        Ok(Preset::from_name(name)?.config())
    }
}
