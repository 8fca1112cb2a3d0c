//! Output surfaces.
//!
//! `Surface` is the seam between the headless field and a drawing API. The browser
//! backends (Canvas2D, WebGL) only exist on wasm32; `RecordingSurface` works everywhere
//! and backs the native tests.

pub mod recording;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod backend;
#[cfg(target_arch = "wasm32")]
pub mod canvas2d;
#[cfg(target_arch = "wasm32")]
pub mod webgl;

pub use recording::RecordingSurface;
pub use scene::{Backdrop, Halo, Link, Scene, Spot, Sprite};

#[cfg(target_arch = "wasm32")]
pub use backend::Backend;

use crate::core::EngineResult;
use crate::domain::BackendKind;
use crate::env::Viewport;

/// What one `present` call drew
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub sprites: u32,
    pub links: u32,
    pub draw_calls: u32,
}

pub trait Surface {
    fn kind(&self) -> BackendKind;

    /// Match the backing store to the viewport (CSS size × pixel ratio)
    fn resize(&mut self, viewport: &Viewport) -> EngineResult<()>;

    fn present(&mut self, scene: &Scene) -> EngineResult<DrawStats>;
}

/// Something that can create surfaces of a given kind (the page canvas, or a mock)
pub trait SurfaceProvider {
    type Output: Surface;

    fn open(&mut self, kind: BackendKind) -> EngineResult<Self::Output>;
}

/// Open the preferred backend, falling back to Canvas2D when WebGL is unavailable.
///
/// Other failures (shader compile/link, DOM errors) are returned as-is.
pub fn open_surface<P: SurfaceProvider>(provider: &mut P, preferred: BackendKind) -> EngineResult<P::Output> {
    match provider.open(preferred) {
        Ok(surface) => Ok(surface),
        Err(err) if preferred != BackendKind::Canvas2d && err.is_backend_unavailable() => {
            log::info!("{}; falling back to 2d canvas", err);
            provider.open(BackendKind::Canvas2d)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EngineError;

    struct NoGl {
        attempts: Vec<BackendKind>,
        shader_broken: bool,
    }

    impl SurfaceProvider for NoGl {
        type Output = RecordingSurface;

        fn open(&mut self, kind: BackendKind) -> EngineResult<RecordingSurface> {
            self.attempts.push(kind);
            match kind {
                BackendKind::WebGl if self.shader_broken => Err(EngineError::ShaderCompile("0:1 syntax error".into())),
                BackendKind::WebGl => Err(EngineError::WebGlUnavailable),
                BackendKind::Canvas2d => Ok(RecordingSurface::new(kind)),
            }
        }
    }

    #[test]
    fn missing_webgl_falls_back_to_canvas() {
        let mut provider = NoGl { attempts: Vec::new(), shader_broken: false };
        let surface = open_surface(&mut provider, BackendKind::WebGl).unwrap();
        assert_eq!(surface.kind(), BackendKind::Canvas2d);
        assert_eq!(provider.attempts, vec![BackendKind::WebGl, BackendKind::Canvas2d]);
    }

    #[test]
    fn shader_failure_is_not_a_fallback() {
        let mut provider = NoGl { attempts: Vec::new(), shader_broken: true };
        let err = open_surface(&mut provider, BackendKind::WebGl).unwrap_err();
        assert!(matches!(err, EngineError::ShaderCompile(_)));
        assert_eq!(provider.attempts, vec![BackendKind::WebGl]);
    }

    #[test]
    fn canvas_is_opened_directly() {
        let mut provider = NoGl { attempts: Vec::new(), shader_broken: false };
        open_surface(&mut provider, BackendKind::Canvas2d).unwrap();
        assert_eq!(provider.attempts, vec![BackendKind::Canvas2d]);
    }
}
