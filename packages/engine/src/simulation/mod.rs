//! FieldCore - the headless particle field.
//!
//! Owns the particles and attractors, advances them with the systems in
//! `crate::systems` and flattens them into a reusable `Scene` for a surface to draw.
//! No DOM access happens here; the driver and the wasm API feed it environment signals.

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/frame_stats.rs"]
mod frame_stats;
#[path = "init/init.rs"]
mod init;
#[path = "step/step.rs"]
mod step;
#[path = "render/render_extract.rs"]
mod render_extract;

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;

pub use frame_stats::FrameStats;

pub(crate) use perf_timer::StageTimer;

use crate::core::{EngineResult, Vec2};
use crate::domain::{Attractor, BudgetProfile, FieldConfig, Particle, QualityTier};
use crate::env::{EnvironmentSnapshot, Viewport};
use crate::render::Scene;

/// Below this many particles the update stays on the calling thread
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 2048;

pub struct FieldCore {
    config: FieldConfig,
    tier: QualityTier,
    budget: BudgetProfile,
    hardware_concurrency: Option<u32>,
    viewport: Viewport,
    particles: Vec<Particle>,
    attractors: Vec<Attractor>,

    // Input
    pointer: Option<Vec2>,
    last_scroll_y: Option<f32>,
    scroll_impulse: f32,

    // State
    time_s: f32,
    frame: u64,
    /// Serial number for the next spawned particle (seeds its RNG)
    spawned: u32,
    scene: Scene,

    // Perf
    perf_enabled: bool,
    stats: FrameStats,
    parallel_threshold: usize,
}

impl FieldCore {
    /// Validate `config` and populate the field for the given environment
    pub fn new(config: FieldConfig, env: &EnvironmentSnapshot) -> EngineResult<Self> {
        init::create_field_core(config, env)
    }

    pub fn config(&self) -> &FieldConfig { &self.config }

    pub fn tier(&self) -> QualityTier { self.tier }

    pub fn budget(&self) -> &BudgetProfile { &self.budget }

    pub fn viewport(&self) -> Viewport { self.viewport }

    pub fn particles(&self) -> &[Particle] { &self.particles }

    pub fn particle_count(&self) -> usize { self.particles.len() }

    pub fn attractors(&self) -> &[Attractor] { &self.attractors }

    pub fn frame(&self) -> u64 { self.frame }

    /// Simulated seconds since construction
    pub fn elapsed(&self) -> f32 { self.time_s }

    /// False under reduced motion: the field is drawn once and never stepped
    pub fn is_animated(&self) -> bool { self.budget.animate }

    /// Minimum time between presented frames
    pub fn frame_interval_ms(&self) -> f64 {
        let fps = match self.budget.max_frame_rate {
            0 => self.config.target_frame_rate,
            cap => self.config.target_frame_rate.min(cap),
        };
        1000.0 / fps.max(1) as f64
    }

    pub fn stats(&self) -> FrameStats { self.stats.clone() }

    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.perf_enabled = enabled;
        if !enabled {
            self.stats.reset_timings();
        }
    }

    pub(crate) fn record_present(&mut self, present_ms: f64) {
        if self.perf_enabled {
            self.stats.present_ms = present_ms;
        }
    }

    pub(crate) fn record_fps(&mut self, fps: f32) {
        self.stats.fps = fps;
    }

    /// Particle counts at or above `threshold` are updated on the rayon pool
    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    /// Pointer in CSS pixels, `None` when it left the page
    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.pointer = pointer.filter(|p| p.is_finite());
    }

    pub fn pointer(&self) -> Option<Vec2> { self.pointer }

    /// Feed the page scroll position; the delta since the last call becomes a vertical impulse
    pub fn set_scroll(&mut self, scroll_y: f32) {
        if !scroll_y.is_finite() {
            return;
        }
        if let Some(last) = self.last_scroll_y {
            self.scroll_impulse = (scroll_y - last) * self.config.scroll_influence;
        }
        self.last_scroll_y = Some(scroll_y);
    }

    pub fn scroll_impulse(&self) -> f32 { self.scroll_impulse }

    /// Advance the field by `dt_seconds` of wall time (clamped to 0.1 s)
    pub fn step(&mut self, dt_seconds: f32) {
        step::step(self, dt_seconds)
    }

    /// Rebuild the draw list for the current state
    pub fn extract_scene(&mut self) -> &Scene {
        render_extract::extract_scene(self);
        &self.scene
    }

    /// Last extracted draw list
    pub fn scene(&self) -> &Scene { &self.scene }

    /// Adopt a new viewport: rescale positions, then spawn or drop particles to the new target count
    pub fn resize(&mut self, viewport: Viewport) {
        init::apply_resize(self, viewport)
    }

    /// Re-derive the quality tier after `prefers-reduced-motion` changed; the count follows the new budget
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        let mut env = EnvironmentSnapshot::new(self.viewport).with_reduced_motion(reduced);
        env.hardware_concurrency = self.hardware_concurrency;
        let tier = QualityTier::detect(&env);
        if tier != self.tier {
            self.tier = tier;
            self.budget = tier.budget();
            init::apply_resize(self, self.viewport);
        }
    }

    pub fn boost(&mut self) {
        step::boost(self)
    }
}
