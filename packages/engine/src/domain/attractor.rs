//! Attractors - points that pull particles with an inverse-square falloff

use serde::{Deserialize, Serialize};

use crate::core::Vec2;
use crate::env::Viewport;

/// Units for an attractor anchor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorUnits {
    /// Fraction of the viewport (0..1 on each axis); follows resizes
    #[default]
    Fraction,
    /// Absolute CSS pixels
    Pixels,
}

/// Slow drift around an anchor: a circle, or a Lissajous loop when the vertical axis
/// gets its own radius or speed
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Orbit {
    /// CSS pixels
    pub radius: f32,
    /// Radians per second
    pub speed: f32,
    #[serde(default)]
    pub phase: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_y: Option<f32>,
}

impl Orbit {
    pub fn circle(radius: f32, speed: f32, phase: f32) -> Self {
        Self { radius, speed, phase, radius_y: None, speed_y: None }
    }

    /// Offset from the anchor after `time_s` seconds
    pub fn offset(&self, time_s: f32) -> Vec2 {
        let ry = self.radius_y.unwrap_or(self.radius);
        let sy = self.speed_y.unwrap_or(self.speed);
        Vec2::new(
            (self.phase + self.speed * time_s).cos() * self.radius,
            (self.phase + sy * time_s).sin() * ry,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.radius.is_finite()
            && self.speed.is_finite()
            && self.phase.is_finite()
            && self.radius_y.map_or(true, f32::is_finite)
            && self.speed_y.map_or(true, f32::is_finite)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttractorConfig {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub units: AnchorUnits,
    pub strength: f32,
    /// Inner cut-off; particles closer than this feel nothing
    #[serde(default)]
    pub min_distance: f32,
    /// Outer cut-off (`None` = unbounded)
    #[serde(default)]
    pub max_distance: Option<f32>,
    #[serde(default)]
    pub orbit: Option<Orbit>,
}

impl AttractorConfig {
    pub fn fraction(x: f32, y: f32, strength: f32) -> Self {
        Self {
            x,
            y,
            units: AnchorUnits::Fraction,
            strength,
            min_distance: 0.0,
            max_distance: None,
            orbit: None,
        }
    }

    pub fn with_range(mut self, min_distance: f32, max_distance: f32) -> Self {
        self.min_distance = min_distance;
        self.max_distance = Some(max_distance);
        self
    }

    pub fn with_orbit(mut self, radius: f32, speed: f32, phase: f32) -> Self {
        self.orbit = Some(Orbit::circle(radius, speed, phase));
        self
    }

    /// Position in CSS pixels for the given viewport and elapsed time
    pub fn resolve(&self, viewport: &Viewport, time_s: f32) -> Attractor {
        let anchor = match self.units {
            AnchorUnits::Fraction => Vec2::new(self.x * viewport.width, self.y * viewport.height),
            AnchorUnits::Pixels => Vec2::new(self.x, self.y),
        };
        let pos = match self.orbit {
            Some(orbit) => anchor + orbit.offset(time_s),
            None => anchor,
        };
        Attractor {
            pos,
            strength: self.strength,
            min_distance_sq: self.min_distance * self.min_distance,
            max_distance_sq: self.max_distance.map(|d| d * d).unwrap_or(f32::INFINITY),
        }
    }
}

/// Attractor resolved for the current frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attractor {
    pub pos: Vec2,
    pub strength: f32,
    pub min_distance_sq: f32,
    pub max_distance_sq: f32,
}

impl Attractor {
    /// Acceleration this attractor applies at `at`: `strength / (d² + softening)` towards the anchor
    #[inline]
    pub fn pull(&self, at: Vec2, softening: f32) -> Vec2 {
        let delta = self.pos - at;
        let dist_sq = delta.length_squared();
        if dist_sq <= self.min_distance_sq || dist_sq >= self.max_distance_sq || dist_sq == 0.0 {
            return Vec2::ZERO;
        }
        let dist = dist_sq.sqrt();
        let force = self.strength / (dist_sq + softening);
        delta * (force / dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_anchor_follows_viewport() {
        let cfg = AttractorConfig::fraction(0.5, 0.25, 10.0);
        let a = cfg.resolve(&Viewport::new(800.0, 400.0, 1.0), 0.0);
        assert_eq!(a.pos, Vec2::new(400.0, 100.0));
        let b = cfg.resolve(&Viewport::new(1600.0, 800.0, 1.0), 0.0);
        assert_eq!(b.pos, Vec2::new(800.0, 200.0));
    }

    #[test]
    fn pull_points_towards_anchor_and_falls_off() {
        let a = AttractorConfig::fraction(0.0, 0.0, 100.0).resolve(&Viewport::new(100.0, 100.0, 1.0), 0.0);
        let near = a.pull(Vec2::new(10.0, 0.0), 1.0);
        let far = a.pull(Vec2::new(20.0, 0.0), 1.0);
        assert!(near.x < 0.0 && far.x < 0.0);
        assert!(near.x.abs() > far.x.abs());
        assert_eq!(near.y, 0.0);
    }

    #[test]
    fn pull_respects_range() {
        let a = AttractorConfig::fraction(0.0, 0.0, 100.0)
            .with_range(10.0, 50.0)
            .resolve(&Viewport::new(100.0, 100.0, 1.0), 0.0);
        assert_eq!(a.pull(Vec2::new(5.0, 0.0), 1.0), Vec2::ZERO);
        assert_eq!(a.pull(Vec2::new(60.0, 0.0), 1.0), Vec2::ZERO);
        assert_ne!(a.pull(Vec2::new(30.0, 0.0), 1.0), Vec2::ZERO);
    }

    #[test]
    fn pull_is_finite_at_the_anchor() {
        let a = AttractorConfig::fraction(0.5, 0.5, 1e6).resolve(&Viewport::new(100.0, 100.0, 1.0), 0.0);
        assert!(a.pull(Vec2::new(50.0, 50.0), 100.0).is_finite());
    }

    #[test]
    fn orbit_moves_with_time() {
        let cfg = AttractorConfig::fraction(0.5, 0.5, 1.0).with_orbit(10.0, 1.0, 0.0);
        let vp = Viewport::new(100.0, 100.0, 1.0);
        assert_ne!(cfg.resolve(&vp, 0.0).pos, cfg.resolve(&vp, 1.0).pos);
    }

    #[test]
    fn stretched_orbit_stays_in_its_box() {
        let orbit = Orbit { radius_y: Some(20.0), speed_y: Some(0.7), ..Orbit::circle(60.0, 1.2, 0.3) };
        for i in 0..200 {
            let o = orbit.offset(i as f32 * 0.1);
            assert!(o.x.abs() <= 60.0 + 1e-3);
            assert!(o.y.abs() <= 20.0 + 1e-3);
        }
        assert_eq!(orbit.offset(0.0).x, 0.3f32.cos() * 60.0);
    }
}
