use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::core::{EngineError, EngineResult};
use crate::driver::FrameScheduler;

/// `requestAnimationFrame` scheduler. The callback is attached after the frame loop
/// exists, since it has to call back into it.
pub(crate) struct RafScheduler {
    window: Window,
    callback: Option<Closure<dyn FnMut(f64)>>,
    handle: Option<i32>,
}

impl RafScheduler {
    pub(crate) fn new(window: Window) -> Self {
        Self { window, callback: None, handle: None }
    }

    pub(crate) fn attach(&mut self, callback: Closure<dyn FnMut(f64)>) {
        self.callback = Some(callback);
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> EngineResult<()> {
        let callback = self
            .callback
            .as_ref()
            .ok_or_else(|| EngineError::Dom("frame callback not attached".into()))?;
        let handle = self.window.request_animation_frame(callback.as_ref().unchecked_ref())?;
        self.handle = Some(handle);
        Ok(())
    }

    fn cancel_frame(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.window.cancel_animation_frame(handle);
        }
    }
}
