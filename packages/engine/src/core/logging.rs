//! Logger setup: `console_log` in the browser, `env_logger` on native builds

use log::Level;

/// Install the logger for this target. Later calls only move the level.
pub fn init_logging(level: Level) {
    #[cfg(target_arch = "wasm32")]
    console_log::init_with_level(level).ok();

    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .is_test(cfg!(test))
        .try_init()
        .ok();

    // The first init sets the level; the logger is already installed on later calls
    log::set_max_level(level.to_level_filter());
}
