//! Backend-neutral draw list, rebuilt once per frame and reused

use crate::core::{Rgb, Vec2};
use crate::domain::{BackdropStyle, ClearMode};
use crate::env::Viewport;

/// Halo behind a sprite
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Halo {
    pub radius: f32,
    pub color: Rgb,
    pub alpha: f32,
    pub gradient: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgb,
    pub alpha: f32,
    pub halo: Option<Halo>,
}

/// Backdrop spot resolved for this frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spot {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgb,
    pub alpha: f32,
    pub strength: f32,
}

/// Opaque wash painted right after the clear
#[derive(Clone, Debug, PartialEq)]
pub struct Backdrop {
    pub style: BackdropStyle,
    pub top: Rgb,
    pub bottom: Rgb,
    pub vignette: f32,
    pub spots: Vec<Spot>,
}

/// Line between two nearby particles
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub from: Vec2,
    pub to: Vec2,
    pub alpha: f32,
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub viewport: Viewport,
    pub clear: ClearMode,
    pub link_color: Rgb,
    pub line_width: f32,
    pub backdrop: Option<Backdrop>,
    pub links: Vec<Link>,
    pub sprites: Vec<Sprite>,
}

impl Scene {
    pub fn new(viewport: Viewport, clear: ClearMode, link_color: Rgb, line_width: f32) -> Self {
        Self {
            viewport,
            clear,
            link_color,
            line_width,
            backdrop: None,
            links: Vec::new(),
            sprites: Vec::new(),
        }
    }

    /// Drop last frame's primitives, keep the allocations
    pub fn reset(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.links.clear();
        self.sprites.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.sprites.is_empty()
    }
}
