//! Frame loop: lifecycle, pacing, visibility, debounced resize.
//!
//! Generic over the surface and the scheduler so the whole lifecycle runs headless
//! in tests (`RecordingSurface` + `ManualScheduler`). Errors inside a frame are
//! logged and the frame is skipped; the loop keeps going.

pub mod scheduler;

pub use scheduler::{FrameScheduler, ManualScheduler};

use crate::core::{EngineResult, Vec2};
use crate::env::Viewport;
use crate::render::Surface;
use crate::simulation::{FieldCore, StageTimer};

/// Frames closer together than `interval - PACING_TOLERANCE_MS` are skipped
pub const PACING_TOLERANCE_MS: f64 = 1.0;
const FPS_WINDOW_MS: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Built, not started
    Idle,
    Running,
    /// Paused by the caller or because the page is hidden
    Paused,
    /// Reduced motion: drawn once, redrawn only on resize
    Static,
    Destroyed,
}

struct PendingResize {
    viewport: Viewport,
    due_ms: f64,
}

#[derive(Default)]
struct FpsWindow {
    start_ms: Option<f64>,
    frames: u32,
}

pub struct FrameLoop<S: Surface, F: FrameScheduler> {
    core: FieldCore,
    surface: S,
    scheduler: F,
    state: LoopState,

    user_paused: bool,
    hidden: bool,
    reduced_motion: bool,

    frame_pending: bool,
    last_frame_ms: Option<f64>,
    pending_resize: Option<PendingResize>,
    fps: FpsWindow,
}

impl<S: Surface, F: FrameScheduler> FrameLoop<S, F> {
    pub fn new(core: FieldCore, surface: S, scheduler: F) -> Self {
        let reduced_motion = !core.is_animated();
        Self {
            core,
            surface,
            scheduler,
            state: LoopState::Idle,
            user_paused: false,
            hidden: false,
            reduced_motion,
            frame_pending: false,
            last_frame_ms: None,
            pending_resize: None,
            fps: FpsWindow::default(),
        }
    }

    pub fn state(&self) -> LoopState { self.state }

    pub fn is_active(&self) -> bool { self.state == LoopState::Running }

    pub fn core(&self) -> &FieldCore { &self.core }

    pub fn surface(&self) -> &S { &self.surface }

    pub fn scheduler(&self) -> &F { &self.scheduler }

    pub fn scheduler_mut(&mut self) -> &mut F { &mut self.scheduler }

    /// Size the surface and either draw the static frame or schedule the first animated one
    pub fn start(&mut self, hidden: bool) -> EngineResult<()> {
        if self.state != LoopState::Idle {
            return Ok(());
        }
        self.surface.resize(&self.core.viewport())?;
        self.hidden = hidden;

        if self.reduced_motion {
            self.state = LoopState::Static;
            self.present_static();
        } else if hidden {
            self.state = LoopState::Paused;
        } else {
            self.state = LoopState::Running;
            self.request_frame();
        }
        log::debug!("frame loop started: {:?}", self.state);
        Ok(())
    }

    /// Scheduler callback; `timestamp_ms` is the rAF timestamp
    pub fn on_frame(&mut self, timestamp_ms: f64) {
        self.frame_pending = false;
        if self.state != LoopState::Running {
            return;
        }

        let interval = self.core.frame_interval_ms();
        if let Some(last) = self.last_frame_ms {
            if timestamp_ms - last < interval - PACING_TOLERANCE_MS {
                self.request_frame();
                return;
            }
        }
        let dt_seconds = self.last_frame_ms.map_or(0.0, |last| ((timestamp_ms - last) / 1000.0).max(0.0));
        self.last_frame_ms = Some(timestamp_ms);

        self.apply_due_resize(timestamp_ms);
        self.core.step(dt_seconds as f32);
        if let Err(err) = self.render() {
            log::warn!("frame {} skipped: {}", self.core.frame(), err);
        }
        self.track_fps(timestamp_ms);

        self.request_frame();
    }

    pub fn pause(&mut self) {
        self.user_paused = true;
        self.refresh_state();
    }

    pub fn resume(&mut self) {
        self.user_paused = false;
        self.refresh_state();
    }

    /// `document.hidden` changed
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
        self.refresh_state();
    }

    /// `prefers-reduced-motion` changed at runtime
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        if self.state == LoopState::Destroyed || reduced == self.reduced_motion {
            return;
        }
        self.reduced_motion = reduced;
        self.core.set_reduced_motion(reduced);
        if let Err(err) = self.surface.resize(&self.core.viewport()) {
            log::warn!("surface resize failed: {}", err);
        }
        self.refresh_state();
    }

    /// Window resized. Animated fields apply it on the first frame after the debounce
    /// window; a static field redraws right away.
    pub fn handle_resize(&mut self, viewport: Viewport, now_ms: f64) {
        match self.state {
            LoopState::Destroyed => {}
            LoopState::Static => {
                self.pending_resize = Some(PendingResize { viewport, due_ms: now_ms });
                self.present_static();
            }
            _ => {
                let due_ms = now_ms + self.core.config().resize_debounce_ms;
                self.pending_resize = Some(PendingResize { viewport, due_ms });
            }
        }
    }

    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        if self.state != LoopState::Destroyed {
            self.core.set_pointer(pointer);
        }
    }

    pub fn set_scroll(&mut self, scroll_y: f32) {
        if self.state != LoopState::Destroyed {
            self.core.set_scroll(scroll_y);
        }
    }

    pub fn boost(&mut self) {
        if self.state != LoopState::Destroyed {
            self.core.boost();
        }
    }

    /// Cancel the outstanding frame; every later call is a no-op
    pub fn destroy(&mut self) {
        if self.state == LoopState::Destroyed {
            return;
        }
        self.cancel_frame();
        self.pending_resize = None;
        self.state = LoopState::Destroyed;
        log::debug!("frame loop destroyed after {} frames", self.core.frame());
    }

    fn refresh_state(&mut self) {
        if matches!(self.state, LoopState::Idle | LoopState::Destroyed) {
            return;
        }
        let next = if self.reduced_motion {
            LoopState::Static
        } else if self.user_paused || self.hidden {
            LoopState::Paused
        } else {
            LoopState::Running
        };
        if next == self.state {
            return;
        }
        self.state = next;
        match next {
            LoopState::Running => {
                // Don't integrate the time spent paused
                self.last_frame_ms = None;
                self.fps = FpsWindow::default();
                self.request_frame();
            }
            LoopState::Paused => self.cancel_frame(),
            LoopState::Static => {
                self.cancel_frame();
                self.present_static();
            }
            LoopState::Idle | LoopState::Destroyed => {}
        }
    }

    fn request_frame(&mut self) {
        if self.frame_pending {
            return;
        }
        match self.scheduler.request_frame() {
            Ok(()) => self.frame_pending = true,
            Err(err) => log::warn!("could not schedule frame: {}", err),
        }
    }

    fn cancel_frame(&mut self) {
        if self.frame_pending {
            self.scheduler.cancel_frame();
            self.frame_pending = false;
        }
    }

    fn apply_due_resize(&mut self, now_ms: f64) {
        let due = matches!(&self.pending_resize, Some(p) if now_ms >= p.due_ms);
        if !due {
            return;
        }
        if let Some(pending) = self.pending_resize.take() {
            self.core.resize(pending.viewport);
            if let Err(err) = self.surface.resize(&self.core.viewport()) {
                log::warn!("surface resize failed: {}", err);
            }
        }
    }

    fn present_static(&mut self) {
        if let Some(pending) = self.pending_resize.take() {
            self.core.resize(pending.viewport);
            if let Err(err) = self.surface.resize(&self.core.viewport()) {
                log::warn!("surface resize failed: {}", err);
            }
        }
        if let Err(err) = self.render() {
            log::warn!("static frame failed: {}", err);
        }
    }

    fn render(&mut self) -> EngineResult<()> {
        let timer = StageTimer::start();
        let scene = self.core.extract_scene();
        self.surface.present(scene)?;
        self.core.record_present(timer.elapsed_ms());
        Ok(())
    }

    fn track_fps(&mut self, now_ms: f64) {
        let start = *self.fps.start_ms.get_or_insert(now_ms);
        self.fps.frames += 1;
        let elapsed = now_ms - start;
        if elapsed >= FPS_WINDOW_MS {
            let fps = (self.fps.frames as f64 * 1000.0 / elapsed) as f32;
            self.core.record_fps(fps);
            if self.core.config().debug {
                log::debug!("{:.0} fps, {} particles", fps, self.core.particle_count());
            }
            self.fps = FpsWindow { start_ms: Some(now_ms), frames: 0 };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BackendKind, FieldConfig};
    use crate::env::EnvironmentSnapshot;
    use crate::render::RecordingSurface;

    type TestLoop = FrameLoop<RecordingSurface, ManualScheduler>;

    fn build(env: EnvironmentSnapshot, config: FieldConfig) -> TestLoop {
        let core = FieldCore::new(config, &env).unwrap();
        FrameLoop::new(core, RecordingSurface::new(BackendKind::Canvas2d), ManualScheduler::new())
    }

    fn desktop() -> EnvironmentSnapshot {
        EnvironmentSnapshot::new(Viewport::new(1280.0, 800.0, 1.0))
    }

    #[test]
    fn reduced_motion_draws_once_and_never_schedules() {
        let mut lp = build(desktop().with_reduced_motion(true), FieldConfig::default());
        lp.start(false).unwrap();
        assert_eq!(lp.state(), LoopState::Static);
        assert_eq!(lp.surface().presents(), 1);
        assert_eq!(lp.scheduler().requests, 0);

        // Stray callbacks do nothing
        lp.on_frame(16.0);
        lp.resume();
        assert_eq!(lp.surface().presents(), 1);
        assert_eq!(lp.scheduler().requests, 0);
    }

    #[test]
    fn static_field_redraws_on_resize_only() {
        let mut lp = build(desktop().with_reduced_motion(true), FieldConfig::default());
        lp.start(false).unwrap();
        lp.handle_resize(Viewport::new(600.0, 400.0, 1.0), 10.0);
        assert_eq!(lp.surface().presents(), 2);
        assert_eq!(lp.core().viewport().width, 600.0);
        assert_eq!(lp.scheduler().requests, 0);
    }

    #[test]
    fn running_loop_presents_and_reschedules() {
        let mut lp = build(desktop(), FieldConfig::default());
        lp.start(false).unwrap();
        assert_eq!(lp.scheduler().requests, 1);
        lp.on_frame(0.0);
        lp.on_frame(16.7);
        assert_eq!(lp.surface().presents(), 2);
        assert_eq!(lp.scheduler().requests, 3);
        assert_eq!(lp.core().frame(), 2);
    }

    #[test]
    fn frames_faster_than_target_are_skipped() {
        let config = FieldConfig { target_frame_rate: 30, ..FieldConfig::default() };
        let mut lp = build(desktop(), config);
        lp.start(false).unwrap();
        // 120 Hz display, 30 fps target: one frame in four is drawn
        for i in 0..8 {
            lp.on_frame(i as f64 * 8.33);
        }
        assert_eq!(lp.surface().presents(), 2);
        assert_eq!(lp.scheduler().requests, 9);
    }

    #[test]
    fn hidden_page_requests_nothing_until_visible() {
        let mut lp = build(desktop(), FieldConfig::default());
        lp.start(false).unwrap();
        lp.on_frame(0.0);
        let before = lp.scheduler().requests;

        lp.set_hidden(true);
        assert_eq!(lp.state(), LoopState::Paused);
        assert_eq!(lp.scheduler().cancels, 1);
        lp.on_frame(16.0);
        assert_eq!(lp.scheduler().requests, before);

        lp.set_hidden(false);
        assert_eq!(lp.state(), LoopState::Running);
        assert_eq!(lp.scheduler().requests, before + 1);
    }

    #[test]
    fn user_pause_survives_visibility_change() {
        let mut lp = build(desktop(), FieldConfig::default());
        lp.start(false).unwrap();
        lp.pause();
        lp.set_hidden(true);
        lp.set_hidden(false);
        assert_eq!(lp.state(), LoopState::Paused);
        lp.resume();
        assert!(lp.is_active());
    }

    #[test]
    fn dt_restarts_after_pause() {
        let mut lp = build(desktop(), FieldConfig::default());
        lp.start(false).unwrap();
        lp.on_frame(0.0);
        lp.on_frame(16.7);
        let t = lp.core().elapsed();
        lp.pause();
        lp.resume();
        // A long gap while paused must not be integrated
        lp.on_frame(60_000.0);
        assert_eq!(lp.core().elapsed(), t);
    }

    #[test]
    fn resize_waits_for_debounce() {
        let mut lp = build(desktop(), FieldConfig::default());
        lp.start(false).unwrap();
        lp.on_frame(0.0);
        lp.handle_resize(Viewport::new(500.0, 500.0, 1.0), 10.0);
        lp.on_frame(100.0);
        assert_eq!(lp.core().viewport().width, 1280.0);
        lp.on_frame(300.0);
        assert_eq!(lp.core().viewport().width, 500.0);
        assert_eq!(lp.surface().viewport().map(|v| v.width), Some(500.0));
    }

    #[test]
    fn reduced_motion_toggle_switches_modes() {
        let mut lp = build(desktop(), FieldConfig::default());
        lp.start(false).unwrap();
        lp.on_frame(0.0);
        lp.set_reduced_motion(true);
        assert_eq!(lp.state(), LoopState::Static);
        assert_eq!(lp.surface().presents(), 2);
        lp.set_reduced_motion(false);
        assert_eq!(lp.state(), LoopState::Running);
    }

    #[test]
    fn destroy_is_final() {
        let mut lp = build(desktop(), FieldConfig::default());
        lp.start(false).unwrap();
        lp.destroy();
        assert_eq!(lp.state(), LoopState::Destroyed);
        assert_eq!(lp.scheduler().cancels, 1);
        lp.resume();
        lp.on_frame(16.0);
        lp.set_hidden(false);
        assert_eq!(lp.state(), LoopState::Destroyed);
        assert_eq!(lp.surface().presents(), 0);
    }
}
