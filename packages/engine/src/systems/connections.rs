use crate::domain::Particle;
use crate::render::scene::Link;

/// Links between every pair closer than `max_distance`, alpha fading with distance.
///
/// Plain pair scan; particle counts are capped low enough that a spatial index doesn't pay off.
pub fn collect_links(particles: &[Particle], max_distance: f32, opacity: f32, out: &mut Vec<Link>) {
    if max_distance <= 0.0 || opacity <= 0.0 {
        return;
    }
    let max_sq = max_distance * max_distance;

    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            let d_sq = (b.pos - a.pos).length_squared();
            if d_sq >= max_sq {
                continue;
            }
            let alpha = (1.0 - d_sq.sqrt() / max_distance) * opacity;
            if alpha > 0.0 {
                out.push(Link { from: a.pos, to: b.pos, alpha });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Vec2;
    use crate::domain::FieldConfig;
    use crate::env::Viewport;
    use crate::systems::spawn::spawn_particle;

    fn at(x: f32, y: f32, serial: u32) -> Particle {
        let mut p = spawn_particle(&FieldConfig::default(), &Viewport::new(100.0, 100.0, 1.0), 1, serial);
        p.pos = Vec2::new(x, y);
        p
    }

    #[test]
    fn alpha_fades_with_distance() {
        let particles = [at(0.0, 0.0, 0), at(60.0, 0.0, 1), at(500.0, 0.0, 2)];
        let mut links = Vec::new();
        collect_links(&particles, 120.0, 0.3, &mut links);
        assert_eq!(links.len(), 1);
        assert!((links[0].alpha - 0.15).abs() < 1e-6);
    }

    #[test]
    fn each_pair_linked_once() {
        let particles = [at(0.0, 0.0, 0), at(10.0, 0.0, 1), at(0.0, 10.0, 2)];
        let mut links = Vec::new();
        collect_links(&particles, 120.0, 0.3, &mut links);
        assert_eq!(links.len(), 3);
    }

    #[test]
    fn zero_distance_disables_links() {
        let particles = [at(0.0, 0.0, 0), at(1.0, 0.0, 1)];
        let mut links = Vec::new();
        collect_links(&particles, 0.0, 0.3, &mut links);
        assert!(links.is_empty());
    }
}
