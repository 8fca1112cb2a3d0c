//! Density policy - how many particles a viewport gets

use crate::domain::{BudgetProfile, FieldConfig};
use crate::env::Viewport;

/// Area unit for `density` (particles per 10 000 CSS px²)
pub const DENSITY_AREA: f32 = 10_000.0;
pub const MOBILE_WIDTH: f32 = 768.0;
pub const TABLET_WIDTH: f32 = 1024.0;

/// Particle count for `viewport`.
///
/// Pure in its inputs, so shrinking and restoring a viewport lands on the same count.
pub fn target_count(config: &FieldConfig, viewport: &Viewport, budget: &BudgetProfile) -> usize {
    let base = match config.density {
        Some(density) => density * viewport.area() / DENSITY_AREA,
        None => config.particle_count as f32 * width_scale(viewport.width),
    };
    let scaled = (base * budget.count_scale).floor();
    if !scaled.is_finite() {
        return 1;
    }
    (scaled as usize).clamp(1, config.max_particles.max(1) as usize)
}

fn width_scale(width: f32) -> f32 {
    if width < MOBILE_WIDTH {
        0.5
    } else if width < TABLET_WIDTH {
        0.75
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QualityTier;

    fn standard() -> BudgetProfile {
        QualityTier::Standard.budget()
    }

    #[test]
    fn width_classes_scale_the_count() {
        let config = FieldConfig::default();
        assert_eq!(target_count(&config, &Viewport::new(1440.0, 900.0, 1.0), &standard()), 50);
        assert_eq!(target_count(&config, &Viewport::new(900.0, 900.0, 1.0), &standard()), 37);
        assert_eq!(target_count(&config, &Viewport::new(375.0, 800.0, 1.0), &standard()), 25);
    }

    #[test]
    fn low_tier_reduces_count() {
        let config = FieldConfig::default();
        let vp = Viewport::new(1440.0, 900.0, 1.0);
        assert_eq!(target_count(&config, &vp, &QualityTier::Low.budget()), 30);
    }

    #[test]
    fn density_uses_area_and_caps() {
        let mut config = FieldConfig::default();
        config.density = Some(1.0);
        assert_eq!(target_count(&config, &Viewport::new(1000.0, 500.0, 1.0), &standard()), 50);
        config.max_particles = 20;
        assert_eq!(target_count(&config, &Viewport::new(1000.0, 500.0, 1.0), &standard()), 20);
    }

    #[test]
    fn never_zero() {
        let mut config = FieldConfig::default();
        config.particle_count = 1;
        assert_eq!(target_count(&config, &Viewport::new(320.0, 200.0, 1.0), &QualityTier::Low.budget()), 1);
    }
}
