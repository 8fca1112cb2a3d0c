//! Stage stopwatch on the page clock
//!
//! The browser build reads `performance.now()`, the same clock the frame callback gets, so
//! stage times and frame timestamps share an origin. Native builds measure from a
//! process-wide `Instant`.

#[cfg(not(target_arch = "wasm32"))]
use std::{sync::OnceLock, time::Instant};

/// Milliseconds on the page clock
#[cfg(target_arch = "wasm32")]
pub(crate) fn clock_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or_else(js_sys::Date::now, |p| p.now())
}

/// Milliseconds since the first call in this process
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn clock_ms() -> f64 {
    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    ORIGIN.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct StageTimer {
    started_ms: f64,
}

impl StageTimer {
    pub(crate) fn start() -> Self {
        Self { started_ms: clock_ms() }
    }

    /// Never negative, even if the wall clock steps back
    pub(crate) fn elapsed_ms(&self) -> f64 {
        (clock_ms() - self.started_ms).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotonic() {
        let mut last = clock_ms();
        for _ in 0..1000 {
            let now = clock_ms();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn elapsed_grows_with_work() {
        let timer = StageTimer::start();
        let first = timer.elapsed_ms();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = timer.elapsed_ms();
        assert!(first >= 0.0);
        assert!(second >= first + 1.0);
    }
}
