//! Browser-facing API. Everything here needs a DOM, so it only builds for wasm32.

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod raf;
#[cfg(target_arch = "wasm32")]
pub mod wasm;
