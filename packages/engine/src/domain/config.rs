//! Field configuration.
//!
//! Loaded from JSON (camelCase keys, every field optional) and validated once at
//! construction. Named presets live in `presets.rs`.

use serde::{Deserialize, Serialize};

use crate::core::color::SKY_BLUE;
use crate::core::{EngineError, EngineResult, Rgb};

use super::attractor::AttractorConfig;
use super::backdrop::BackdropConfig;

/// Rendering backend requested by the page
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    #[default]
    #[serde(rename = "2d")]
    Canvas2d,
    #[serde(rename = "webgl")]
    WebGl,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Canvas2d => "2d",
            BackendKind::WebGl => "webgl",
        }
    }
}

/// What happens at the padded viewport edge
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Leave one edge, reappear at the opposite one
    #[default]
    Wrap,
    /// Reflect velocity and clamp to the edge
    Bounce,
}

/// Per-particle opacity behaviour
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum LifePolicy {
    /// Alpha stays where it spawned
    #[default]
    Static,
    /// Alpha random-walks by up to `step` per reference frame, clamped to `[min, max]`
    Twinkle { min: f32, max: f32, step: f32 },
    /// Life drains by `rate` per reference frame; alpha follows life; respawn at zero
    Decay { rate: f32 },
}

/// How a frame starts
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ClearMode {
    /// Transparent hard clear
    #[default]
    Clear,
    /// Opaque fill
    Solid { color: Rgb },
    /// Low-alpha fill that leaves motion trails
    Trail { color: Rgb, alpha: f32 },
}

/// Halo drawn behind each particle
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlowConfig {
    /// Halo radius as a multiple of the particle radius
    pub scale: f32,
    /// Halo alpha as a fraction of the particle alpha
    pub alpha: f32,
    /// Radial gradient halo instead of a flat disc
    pub gradient: bool,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self { scale: 3.0, alpha: 0.2, gradient: false }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FieldConfig {
    /// Particle count for a desktop-width viewport (ignored when `density` is set)
    pub particle_count: u32,
    /// Particles per 10 000 CSS px²
    pub density: Option<f32>,
    pub max_particles: u32,
    pub colors: Vec<Rgb>,
    pub max_speed: f32,
    pub min_speed: f32,
    pub particle_radius: f32,
    pub min_radius: f32,
    pub alpha_range: [f32; 2],
    /// CSS opacity of the whole canvas
    pub opacity: f32,

    pub connection_distance: f32,
    pub show_connections: bool,
    pub connection_opacity: f32,
    pub connection_color: Option<Rgb>,
    pub line_width: f32,

    pub enable_mouse: bool,
    pub mouse_radius: f32,
    pub mouse_strength: f32,
    pub color_shift_radius: Option<f32>,
    pub proximity_scale: f32,

    pub target_frame_rate: u32,
    pub backend: BackendKind,

    pub attractors: Vec<AttractorConfig>,
    pub softening: f32,
    pub damping: f32,
    pub boundary: BoundaryPolicy,
    pub edge_padding: f32,
    pub life: LifePolicy,
    /// Random velocity jitter per reference frame (total width of the uniform range)
    pub drift: f32,
    /// Fraction of each scroll delta turned into a vertical impulse
    pub scroll_influence: f32,

    pub clear: ClearMode,
    pub glow: Option<GlowConfig>,
    /// Colour wash painted after the clear, under links and particles
    pub backdrop: Option<BackdropConfig>,

    pub max_device_pixel_ratio: f32,
    pub resize_debounce_ms: f64,
    pub z_index: i32,
    pub class_name: String,
    pub debug: bool,
    pub seed: u32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 50,
            density: None,
            max_particles: 600,
            colors: vec![SKY_BLUE],
            max_speed: 1.0,
            min_speed: 0.3,
            particle_radius: 2.0,
            min_radius: 1.0,
            alpha_range: [0.3, 1.0],
            opacity: 0.4,

            connection_distance: 120.0,
            show_connections: true,
            connection_opacity: 0.3,
            connection_color: None,
            line_width: 0.5,

            enable_mouse: true,
            mouse_radius: 150.0,
            mouse_strength: 80.0,
            color_shift_radius: None,
            proximity_scale: 0.5,

            target_frame_rate: 60,
            backend: BackendKind::Canvas2d,

            attractors: Vec::new(),
            softening: 100.0,
            damping: 0.99,
            boundary: BoundaryPolicy::Wrap,
            edge_padding: 0.0,
            life: LifePolicy::Static,
            drift: 0.0,
            scroll_influence: 0.0,

            clear: ClearMode::Clear,
            glow: None,
            backdrop: None,

            max_device_pixel_ratio: 2.0,
            resize_debounce_ms: 250.0,
            z_index: -1,
            class_name: "particle-field-canvas".to_string(),
            debug: false,
            seed: 0x2545_F491,
        }
    }
}

impl FieldConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn link_color(&self) -> Rgb {
        self.connection_color
            .or_else(|| self.colors.first().copied())
            .unwrap_or(SKY_BLUE)
    }

    pub fn validate(&self) -> EngineResult<()> {
        fn invalid(msg: impl Into<String>) -> EngineResult<()> {
            Err(EngineError::InvalidConfig(msg.into()))
        }
        fn finite_non_negative(v: f32) -> bool {
            v.is_finite() && v >= 0.0
        }

        if self.particle_count == 0 && self.density.is_none() {
            return invalid("particleCount must be > 0");
        }
        if let Some(d) = self.density {
            if !(d.is_finite() && d > 0.0) {
                return invalid("density must be > 0");
            }
        }
        if self.max_particles == 0 {
            return invalid("maxParticles must be > 0");
        }
        if self.colors.is_empty() {
            return invalid("colors must not be empty");
        }
        if let Some(c) = self.colors.iter().chain(self.connection_color.iter()).find(|c| !c.is_valid()) {
            return invalid(format!("colour channel out of range: {:?}", c));
        }
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return invalid("maxSpeed must be > 0");
        }
        if !finite_non_negative(self.min_speed) || self.min_speed > self.max_speed {
            return invalid("minSpeed must be in [0, maxSpeed]");
        }
        if !(self.min_radius.is_finite() && self.min_radius > 0.0) || self.particle_radius < self.min_radius {
            return invalid("radii must satisfy 0 < minRadius <= particleRadius");
        }
        let [a_min, a_max] = self.alpha_range;
        if !(0.0..=1.0).contains(&a_min) || !(0.0..=1.0).contains(&a_max) || a_min > a_max {
            return invalid("alphaRange must be an ordered pair inside [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return invalid("opacity must be in [0, 1]");
        }
        if !finite_non_negative(self.connection_distance)
            || !finite_non_negative(self.mouse_radius)
            || !finite_non_negative(self.edge_padding)
            || !finite_non_negative(self.line_width)
        {
            return invalid("distances must be finite and >= 0");
        }
        if !finite_non_negative(self.proximity_scale)
            || !finite_non_negative(self.drift)
            || !self.mouse_strength.is_finite()
            || !self.scroll_influence.is_finite()
        {
            return invalid("force parameters must be finite (proximityScale and drift >= 0)");
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return invalid("damping must be in (0, 1]");
        }
        if !(self.softening.is_finite() && self.softening > 0.0) {
            return invalid("softening must be > 0");
        }
        if self.target_frame_rate == 0 {
            return invalid("targetFrameRate must be > 0");
        }
        if !(self.max_device_pixel_ratio.is_finite() && self.max_device_pixel_ratio >= 1.0) {
            return invalid("maxDevicePixelRatio must be >= 1");
        }
        if !(self.resize_debounce_ms.is_finite() && self.resize_debounce_ms >= 0.0) {
            return invalid("resizeDebounceMs must be >= 0");
        }
        match self.life {
            LifePolicy::Static => {}
            LifePolicy::Twinkle { min, max, step } => {
                if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) || min > max || !finite_non_negative(step) {
                    return invalid("twinkle needs 0 <= min <= max <= 1 and step >= 0");
                }
            }
            LifePolicy::Decay { rate } => {
                if !(rate.is_finite() && rate > 0.0) {
                    return invalid("decay rate must be > 0");
                }
            }
        }
        if let ClearMode::Trail { alpha, .. } = self.clear {
            if !(alpha > 0.0 && alpha <= 1.0) {
                return invalid("trail alpha must be in (0, 1]");
            }
        }
        if let Some(glow) = self.glow {
            if !(glow.scale >= 1.0 && glow.scale.is_finite()) || !(0.0..=1.0).contains(&glow.alpha) {
                return invalid("glow needs scale >= 1 and alpha in [0, 1]");
            }
        }
        if let Some(backdrop) = &self.backdrop {
            if let Some(problem) = backdrop.problem() {
                return invalid(problem);
            }
            if matches!(self.clear, ClearMode::Trail { .. }) {
                return invalid("an opaque backdrop would erase trails; use clear or solid");
            }
        }
        for a in &self.attractors {
            if !a.x.is_finite()
                || !a.y.is_finite()
                || !a.strength.is_finite()
                || !finite_non_negative(a.min_distance)
                || !a.orbit.map_or(true, |o| o.is_finite())
            {
                return invalid("attractor values must be finite");
            }
            if let Some(max) = a.max_distance {
                if !(max > a.min_distance) {
                    return invalid("attractor maxDistance must exceed minDistance");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backdrop::BackdropStyle;

    #[test]
    fn empty_json_gives_defaults() {
        let cfg = FieldConfig::from_json("{}").unwrap();
        assert_eq!(cfg, FieldConfig::default());
    }

    #[test]
    fn camel_case_keys_and_tags_parse() {
        let cfg = FieldConfig::from_json(
            r#"{
                "particleCount": 80,
                "maxSpeed": 3,
                "minSpeed": 0.5,
                "showConnections": false,
                "enableMouse": false,
                "mouseRadius": 200,
                "targetFrameRate": 30,
                "backend": "webgl",
                "boundary": "bounce",
                "life": { "mode": "decay", "rate": 0.001 },
                "clear": { "mode": "trail", "color": [0, 0, 0], "alpha": 0.16 },
                "colors": [[59, 130, 246], [168, 85, 247]],
                "attractors": [{ "x": 0.5, "y": 0.2, "strength": 45, "maxDistance": 800 }]
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.particle_count, 80);
        assert_eq!(cfg.backend, BackendKind::WebGl);
        assert_eq!(cfg.boundary, BoundaryPolicy::Bounce);
        assert_eq!(cfg.life, LifePolicy::Decay { rate: 0.001 });
        assert!(matches!(cfg.clear, ClearMode::Trail { .. }));
        assert_eq!(cfg.colors.len(), 2);
        assert_eq!(cfg.attractors[0].max_distance, Some(800.0));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            FieldConfig::from_json(r#"{ "particleCont": 10 }"#),
            Err(EngineError::ConfigParse(_))
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases = [
            r#"{ "particleCount": 0 }"#,
            r#"{ "maxSpeed": 0 }"#,
            r#"{ "minSpeed": 2, "maxSpeed": 1 }"#,
            r#"{ "damping": 1.5 }"#,
            r#"{ "damping": 0 }"#,
            r#"{ "softening": 0 }"#,
            r#"{ "colors": [] }"#,
            r#"{ "colors": [[300, 0, 0]] }"#,
            r#"{ "targetFrameRate": 0 }"#,
            r#"{ "alphaRange": [0.9, 0.1] }"#,
            r#"{ "life": { "mode": "decay", "rate": 0 } }"#,
            r#"{ "attractors": [{ "x": 0, "y": 0, "strength": 1, "minDistance": 10, "maxDistance": 5 }] }"#,
        ];
        for json in cases {
            assert!(
                matches!(FieldConfig::from_json(json), Err(EngineError::InvalidConfig(_))),
                "expected rejection for {json}"
            );
        }
    }

    #[test]
    fn backdrop_parses_and_validates() {
        let cfg = FieldConfig::from_json(
            r#"{
                "backdrop": {
                    "style": "field",
                    "vignette": 0.15,
                    "spots": [
                        { "x": 0.5, "y": 0.5, "radius": 400, "color": [59, 154, 254], "alpha": 0.6,
                          "strength": 0.02, "orbit": { "radius": 300, "speed": 0.12, "radiusY": 220, "speedY": 0.1 },
                          "parallax": { "x": 0, "y": -0.05 } }
                    ]
                }
            }"#,
        )
        .unwrap();
        let backdrop = cfg.backdrop.unwrap();
        assert_eq!(backdrop.style, BackdropStyle::Field);
        assert_eq!(backdrop.spots[0].orbit.and_then(|o| o.radius_y), Some(220.0));
        // Unset base colours keep their defaults
        assert_eq!(backdrop.top, BackdropConfig::default().top);
    }

    #[test]
    fn backdrop_cannot_sit_under_trails() {
        let json = r#"{ "backdrop": {}, "clear": { "mode": "trail", "color": [0, 0, 0], "alpha": 0.2 } }"#;
        assert!(matches!(FieldConfig::from_json(json), Err(EngineError::InvalidConfig(_))));
        let json = r#"{ "backdrop": { "vignette": 3 } }"#;
        assert!(matches!(FieldConfig::from_json(json), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn damping_of_one_is_allowed() {
        assert!(FieldConfig::from_json(r#"{ "damping": 1.0 }"#).is_ok());
    }

    #[test]
    fn link_color_falls_back_to_palette() {
        let mut cfg = FieldConfig::default();
        cfg.colors = vec![Rgb::new(1.0, 2.0, 3.0)];
        assert_eq!(cfg.link_color(), Rgb::new(1.0, 2.0, 3.0));
        cfg.connection_color = Some(Rgb::new(9.0, 9.0, 9.0));
        assert_eq!(cfg.link_color(), Rgb::new(9.0, 9.0, 9.0));
    }
}
