use crate::core::EngineResult;

/// Source of "draw the next frame" callbacks (`requestAnimationFrame` in the browser)
pub trait FrameScheduler {
    /// Ask for one callback. Calling again before it fires is allowed but wasteful.
    fn request_frame(&mut self) -> EngineResult<()>;

    /// Drop the outstanding callback, if any
    fn cancel_frame(&mut self);
}

/// Scheduler that only counts; tests fire frames by calling `FrameLoop::on_frame` themselves
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pub requests: usize,
    pub cancels: usize,
    pub pending: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> EngineResult<()> {
        self.requests += 1;
        self.pending = true;
        Ok(())
    }

    fn cancel_frame(&mut self) {
        if self.pending {
            self.cancels += 1;
        }
        self.pending = false;
    }
}
