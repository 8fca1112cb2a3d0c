//! Environment signals - everything the engine reads from the host page.
//!
//! The wasm API fills these from `window`/`document`; tests build them by hand.

/// Viewport in CSS pixels plus the device pixel ratio used for the backing store
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, dpr: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            dpr: if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 },
        }
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Same viewport with the pixel ratio capped (high-DPR screens cost fill rate for no visible gain)
    pub fn with_max_dpr(self, max_dpr: f32) -> Self {
        Self { dpr: self.dpr.min(max_dpr.max(1.0)), ..self }
    }

    /// Backing store size in device pixels
    pub fn device_size(&self) -> (u32, u32) {
        (
            (self.width * self.dpr).floor().max(1.0) as u32,
            (self.height * self.dpr).floor().max(1.0) as u32,
        )
    }
}

/// Snapshot of the host environment at construction time
#[derive(Clone, Copy, Debug)]
pub struct EnvironmentSnapshot {
    pub viewport: Viewport,
    pub reduced_motion: bool,
    pub hidden: bool,
    /// `navigator.hardwareConcurrency`, when the browser reports it
    pub hardware_concurrency: Option<u32>,
}

impl EnvironmentSnapshot {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            reduced_motion: false,
            hidden: false,
            hardware_concurrency: None,
        }
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    pub fn with_hardware_concurrency(mut self, cores: u32) -> Self {
        self.hardware_concurrency = Some(cores);
        self
    }
}
