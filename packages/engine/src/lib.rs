//! Backdrop Engine - particle and gravity page backgrounds in WASM
//!
//! Architecture:
//! - core/       - vectors, colours, RNG, errors, logging
//! - domain/     - particles, attractors, config + presets, quality tiers
//! - env/        - environment signals read from the page
//! - systems/    - per-frame physics and density policy
//! - simulation/ - FieldCore: owns the particles, steps them, extracts the scene
//! - render/     - Surface trait, recording surface, Canvas2D / WebGL backends
//! - driver/     - FrameLoop: lifecycle, pacing, visibility, resize
//! - api/        - wasm-bindgen handle mounted by the page

pub mod core;
pub mod domain;
pub mod env;
pub mod systems;
pub mod simulation;
pub mod render;
pub mod driver;
pub mod api;

use wasm_bindgen::prelude::*;

// Thread pool for the parallel particle update; the page awaits `initThreadPool(n)` once
#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine: panic hook and logger
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    crate::core::logging::init_logging(log::Level::Info);
    log::info!("backdrop engine {} initialized", version());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Names accepted by `ParticleField.mountPreset`
#[wasm_bindgen(js_name = presetNames)]
pub fn preset_names() -> Vec<String> {
    crate::domain::PRESET_NAMES.iter().map(|s| s.to_string()).collect()
}

// Re-export main types
pub use crate::core::{EngineError, EngineResult, Rgb, Vec2};
pub use crate::domain::{BackendKind, FieldConfig, Preset, QualityTier};
pub use crate::driver::{FrameLoop, FrameScheduler, LoopState, ManualScheduler};
pub use crate::env::{EnvironmentSnapshot, Viewport};
pub use crate::render::{RecordingSurface, Scene, Surface};
pub use crate::simulation::{FieldCore, FrameStats};

#[cfg(target_arch = "wasm32")]
pub use api::wasm::ParticleField;
