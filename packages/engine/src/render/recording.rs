use crate::core::EngineResult;
use crate::domain::BackendKind;
use crate::env::Viewport;

use super::{DrawStats, Scene, Surface};

/// Headless surface that keeps what it was asked to draw
#[derive(Debug)]
pub struct RecordingSurface {
    kind: BackendKind,
    viewport: Option<Viewport>,
    presents: usize,
    last: Option<DrawStats>,
    last_scene: Option<Scene>,
    keep_scenes: bool,
}

impl RecordingSurface {
    pub fn new(kind: BackendKind) -> Self {
        Self { kind, viewport: None, presents: 0, last: None, last_scene: None, keep_scenes: true }
    }

    /// Count presents without cloning scenes (for long runs)
    pub fn counting(kind: BackendKind) -> Self {
        Self { keep_scenes: false, ..Self::new(kind) }
    }

    pub fn presents(&self) -> usize { self.presents }

    pub fn last_stats(&self) -> Option<DrawStats> { self.last }

    pub fn last_scene(&self) -> Option<&Scene> { self.last_scene.as_ref() }

    pub fn viewport(&self) -> Option<Viewport> { self.viewport }
}

impl Surface for RecordingSurface {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn resize(&mut self, viewport: &Viewport) -> EngineResult<()> {
        self.viewport = Some(*viewport);
        Ok(())
    }

    fn present(&mut self, scene: &Scene) -> EngineResult<DrawStats> {
        let stats = DrawStats {
            sprites: scene.sprites.len() as u32,
            links: scene.links.len() as u32,
            draw_calls: 1
                + u32::from(scene.backdrop.is_some())
                + scene.sprites.len() as u32
                + u32::from(!scene.links.is_empty()),
        };
        self.presents += 1;
        self.last = Some(stats);
        if self.keep_scenes {
            self.last_scene = Some(scene.clone());
        }
        Ok(stats)
    }
}
