use wasm_bindgen::prelude::*;

/// Snapshot of the last simulated frame
#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct FrameStats {
    pub(crate) step_ms: f64,
    pub(crate) extract_ms: f64,
    pub(crate) present_ms: f64,
    pub(crate) particle_count: u32,
    pub(crate) link_count: u32,
    pub(crate) sprite_count: u32,
    pub(crate) frame: u64,
    pub(crate) fps: f32,
}

impl FrameStats {
    pub(crate) fn reset_timings(&mut self) {
        self.step_ms = 0.0;
        self.extract_ms = 0.0;
        self.present_ms = 0.0;
    }
}

#[wasm_bindgen]
impl FrameStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn extract_ms(&self) -> f64 { self.extract_ms }
    #[wasm_bindgen(getter)]
    pub fn present_ms(&self) -> f64 { self.present_ms }
    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> u32 { self.particle_count }
    #[wasm_bindgen(getter)]
    pub fn link_count(&self) -> u32 { self.link_count }
    #[wasm_bindgen(getter)]
    pub fn sprite_count(&self) -> u32 { self.sprite_count }
    /// Frames simulated so far (f64 for JS)
    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> f64 { self.frame as f64 }
    /// Measured over the last second; 0 until the first second has passed
    #[wasm_bindgen(getter)]
    pub fn fps(&self) -> f32 { self.fps }
}
