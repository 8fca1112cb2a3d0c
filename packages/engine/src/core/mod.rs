//! Core building blocks shared by every layer

pub mod color;
pub mod error;
pub mod logging;
pub mod rng;
pub mod vec2;

pub use color::Rgb;
pub use error::{EngineError, EngineResult};
pub use vec2::Vec2;
