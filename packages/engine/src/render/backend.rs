use web_sys::HtmlCanvasElement;

use crate::core::EngineResult;
use crate::domain::BackendKind;
use crate::env::Viewport;

use super::canvas2d::Canvas2dSurface;
use super::webgl::WebGlSurface;
use super::{DrawStats, Scene, Surface, SurfaceProvider};

/// Browser backend picked at mount time
pub enum Backend {
    Canvas2d(Canvas2dSurface),
    WebGl(WebGlSurface),
}

impl Surface for Backend {
    fn kind(&self) -> BackendKind {
        match self {
            Backend::Canvas2d(s) => s.kind(),
            Backend::WebGl(s) => s.kind(),
        }
    }

    fn resize(&mut self, viewport: &Viewport) -> EngineResult<()> {
        match self {
            Backend::Canvas2d(s) => s.resize(viewport),
            Backend::WebGl(s) => s.resize(viewport),
        }
    }

    fn present(&mut self, scene: &Scene) -> EngineResult<DrawStats> {
        match self {
            Backend::Canvas2d(s) => s.present(scene),
            Backend::WebGl(s) => s.present(scene),
        }
    }
}

/// Opens backends on the page canvas
pub struct CanvasProvider {
    canvas: HtmlCanvasElement,
    preserve_drawing_buffer: bool,
}

impl CanvasProvider {
    pub fn new(canvas: HtmlCanvasElement, preserve_drawing_buffer: bool) -> Self {
        Self { canvas, preserve_drawing_buffer }
    }
}

impl SurfaceProvider for CanvasProvider {
    type Output = Backend;

    fn open(&mut self, kind: BackendKind) -> EngineResult<Backend> {
        match kind {
            BackendKind::Canvas2d => Ok(Backend::Canvas2d(Canvas2dSurface::new(self.canvas.clone())?)),
            BackendKind::WebGl => Ok(Backend::WebGl(WebGlSurface::new(
                self.canvas.clone(),
                self.preserve_drawing_buffer,
            )?)),
        }
    }
}
