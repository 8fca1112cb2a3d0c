//! Domain types: particles, attractors, backdrops, configuration, quality tiers

pub mod attractor;
pub mod backdrop;
pub mod config;
pub mod particle;
pub mod presets;
pub mod quality;

pub use attractor::{AnchorUnits, Attractor, AttractorConfig, Orbit};
pub use backdrop::{BackdropConfig, BackdropStyle, SpotConfig, MAX_BACKDROP_SPOTS};
pub use config::{BackendKind, BoundaryPolicy, ClearMode, FieldConfig, GlowConfig, LifePolicy};
pub use particle::Particle;
pub use presets::{Preset, PRESET_NAMES};
pub use quality::{BudgetProfile, QualityTier};
