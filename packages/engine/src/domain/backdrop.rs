//! Backdrop - the colour wash painted under the particles.
//!
//! A diagonal base gradient plus up to `MAX_BACKDROP_SPOTS` coloured spots. Each spot
//! is anchored to a viewport fraction, drifts on an `Orbit`, breathes its radius and
//! shifts with the page scroll. `Spots` blends them as soft radial discs; `Field` sums
//! their inverse-square potential and bands it into their colours (WebGL only, the 2D
//! canvas draws `Field` as spots).

use serde::{Deserialize, Serialize};

use crate::core::{Rgb, Vec2};
use crate::env::Viewport;

use super::attractor::Orbit;

/// Uniform array size in the backdrop shader
pub const MAX_BACKDROP_SPOTS: usize = 4;
/// Radians per second of the radius breathing
const PULSE_RATE: f32 = 0.2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackdropStyle {
    #[default]
    Spots,
    Field,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotConfig {
    /// Anchor as a viewport fraction
    pub x: f32,
    pub y: f32,
    /// CSS pixels
    pub radius: f32,
    pub color: Rgb,
    pub alpha: f32,
    /// Weight in the `Field` potential
    #[serde(default)]
    pub strength: f32,
    #[serde(default)]
    pub orbit: Option<Orbit>,
    /// Radius swing in CSS pixels
    #[serde(default)]
    pub pulse: f32,
    /// CSS pixels moved per pixel scrolled
    #[serde(default)]
    pub parallax: Vec2,
}

impl SpotConfig {
    pub fn new(x: f32, y: f32, radius: f32, color: Rgb, alpha: f32) -> Self {
        Self {
            x,
            y,
            radius,
            color,
            alpha,
            strength: 0.0,
            orbit: None,
            pulse: 0.0,
            parallax: Vec2::ZERO,
        }
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_orbit(mut self, orbit: Orbit) -> Self {
        self.orbit = Some(orbit);
        self
    }

    pub fn with_pulse(mut self, pulse: f32) -> Self {
        self.pulse = pulse;
        self
    }

    pub fn with_parallax(mut self, x: f32, y: f32) -> Self {
        self.parallax = Vec2::new(x, y);
        self
    }

    /// Centre in CSS pixels
    pub fn position(&self, viewport: &Viewport, time_s: f32, scroll_y: f32) -> Vec2 {
        let anchor = Vec2::new(self.x * viewport.width, self.y * viewport.height);
        let drift = self.orbit.map_or(Vec2::ZERO, |o| o.offset(time_s));
        anchor + drift + self.parallax * scroll_y
    }

    /// Radius at `time_s`; `index` staggers the breathing between spots
    pub fn radius_at(&self, time_s: f32, index: usize) -> f32 {
        (self.radius + (time_s * PULSE_RATE + index as f32).sin() * self.pulse).max(1.0)
    }

    fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.radius.is_finite()
            && self.radius > 0.0
            && self.color.is_valid()
            && (0.0..=1.0).contains(&self.alpha)
            && self.strength.is_finite()
            && self.strength >= 0.0
            && self.pulse.is_finite()
            && self.pulse >= 0.0
            && self.parallax.is_finite()
            && self.orbit.map_or(true, |o| o.is_finite())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackdropConfig {
    pub style: BackdropStyle,
    /// Base gradient, top-left corner
    pub top: Rgb,
    /// Base gradient, bottom-right corner
    pub bottom: Rgb,
    /// Corner darkening in `0..=1`
    pub vignette: f32,
    pub spots: Vec<SpotConfig>,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            style: BackdropStyle::Spots,
            top: Rgb::new(11.0, 15.0, 20.0),
            bottom: Rgb::new(14.0, 20.0, 28.0),
            vignette: 0.0,
            spots: Vec::new(),
        }
    }
}

impl BackdropConfig {
    /// Reason the backdrop is unusable, if any
    pub fn problem(&self) -> Option<&'static str> {
        if self.spots.len() > MAX_BACKDROP_SPOTS {
            return Some("backdrop supports at most 4 spots");
        }
        if !self.top.is_valid() || !self.bottom.is_valid() {
            return Some("backdrop colour channel out of range");
        }
        if !(0.0..=1.0).contains(&self.vignette) {
            return Some("backdrop vignette must be in [0, 1]");
        }
        if !self.spots.iter().all(SpotConfig::is_valid) {
            return Some("backdrop spots need a finite anchor, radius > 0, alpha in [0, 1] and non-negative strength/pulse");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot() -> SpotConfig {
        SpotConfig::new(0.25, 0.5, 300.0, Rgb::new(90.0, 200.0, 255.0), 0.14)
    }

    #[test]
    fn anchor_follows_viewport() {
        let s = spot();
        assert_eq!(s.position(&Viewport::new(800.0, 600.0, 1.0), 0.0, 0.0), Vec2::new(200.0, 300.0));
        assert_eq!(s.position(&Viewport::new(1600.0, 400.0, 1.0), 0.0, 0.0), Vec2::new(400.0, 200.0));
    }

    #[test]
    fn orbit_and_scroll_move_the_spot() {
        let vp = Viewport::new(800.0, 600.0, 1.0);
        let s = spot().with_orbit(Orbit::circle(50.0, 1.0, 0.0)).with_parallax(0.0, -0.02);
        assert_ne!(s.position(&vp, 0.0, 0.0), s.position(&vp, 2.0, 0.0));
        let shifted = s.position(&vp, 0.0, 1000.0);
        assert!((shifted.y - (300.0 - 20.0)).abs() < 1e-3);
    }

    #[test]
    fn radius_breathes_within_pulse() {
        let s = spot().with_pulse(20.0);
        for i in 0..100 {
            let r = s.radius_at(i as f32, 1);
            assert!((280.0..=320.0).contains(&r));
        }
        assert_eq!(spot().radius_at(5.0, 0), 300.0);
    }

    #[test]
    fn problems_are_reported() {
        assert_eq!(BackdropConfig::default().problem(), None);
        let crowded = BackdropConfig { spots: vec![spot(); 5], ..BackdropConfig::default() };
        assert!(crowded.problem().is_some());
        let dim = BackdropConfig { vignette: 2.0, ..BackdropConfig::default() };
        assert!(dim.problem().is_some());
        let flat = BackdropConfig { spots: vec![SpotConfig { radius: 0.0, ..spot() }], ..BackdropConfig::default() };
        assert!(flat.problem().is_some());
    }
}
