use serde::{Deserialize, Serialize};

/// RGB colour with floating channels in `0..=255`, so palette transitions can ease smoothly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

pub const WHITE: Rgb = Rgb::new(255.0, 255.0, 255.0);
pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
pub const SKY_BLUE: Rgb = Rgb::new(96.0, 165.0, 250.0);

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Move `t` of the way towards `target` (`t` in 0..=1)
    pub fn lerp(self, target: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        Rgb {
            r: self.r + (target.r - self.r) * t,
            g: self.g + (target.g - self.g) * t,
            b: self.b + (target.b - self.b) * t,
        }
    }

    /// Multiply every channel, saturating at 255
    pub fn scaled(self, factor: f32) -> Rgb {
        Rgb {
            r: (self.r * factor).clamp(0.0, 255.0),
            g: (self.g * factor).clamp(0.0, 255.0),
            b: (self.b * factor).clamp(0.0, 255.0),
        }
    }

    pub fn is_valid(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| c.is_finite() && (0.0..=255.0).contains(c))
    }

    /// Channels normalised to `0..=1` for GL vertex data
    pub fn unit(&self) -> [f32; 3] {
        [self.r / 255.0, self.g / 255.0, self.b / 255.0]
    }

    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.r.floor() as u8, self.g.floor() as u8, self.b.floor() as u8)
    }

    pub fn css_with_alpha(&self, alpha: f32) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.r.floor() as u8,
            self.g.floor() as u8,
            self.b.floor() as u8,
            alpha.clamp(0.0, 1.0)
        )
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(c: [f32; 3]) -> Self {
        Rgb::new(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [f32; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_from_json_triples() {
        let c: Rgb = serde_json::from_str("[59, 130, 246]").unwrap();
        assert_eq!(c, Rgb::new(59.0, 130.0, 246.0));
    }

    #[test]
    fn css_strings_floor_channels() {
        let c = Rgb::new(10.9, 20.2, 255.0);
        assert_eq!(c.css(), "rgb(10, 20, 255)");
        assert_eq!(c.css_with_alpha(0.5), "rgba(10, 20, 255, 0.500)");
    }

    #[test]
    fn scaled_saturates() {
        assert_eq!(Rgb::new(250.0, 100.0, 0.0).scaled(1.2), Rgb::new(255.0, 120.0, 0.0));
    }
}
