//! Monotonic time sources
//!
//! The orchestrator samples its clock once per host call and hands the value
//! down; nothing inside a minigame reads time on its own.

use std::cell::Cell;
use std::rc::Rc;

/// Milliseconds on a monotonic timeline
pub type Millis = f64;

pub trait Clock {
    fn now_ms(&self) -> Millis;
}

/// Real monotonic time since construction
pub struct MonotonicClock {
    #[cfg(not(target_arch = "wasm32"))]
    origin: std::time::Instant,
    #[cfg(target_arch = "wasm32")]
    performance: Option<web_sys::Performance>,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        let performance = web_sys::window().and_then(|w| w.performance());
        if performance.is_none() {
            log::warn!("performance.now() unavailable - falling back to Date.now()");
        }
        Self { performance }
    }
}

impl Clock for MonotonicClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> Millis {
        match &self.performance {
            Some(p) => p.now(),
            None => js_sys::Date::now(),
        }
    }
}

/// Hand-driven clock; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, now: Millis) {
        // Never runs backwards
        self.now.set(now.max(self.now.get()));
    }

    pub fn advance(&self, ms: Millis) {
        self.set(self.now.get() + ms.max(0.0));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_and_monotonic() {
        let clock = ManualClock::new(10.0);
        let handle = clock.clone();
        handle.advance(5.0);
        assert_eq!(clock.now_ms(), 15.0);
        handle.set(3.0);
        assert_eq!(clock.now_ms(), 15.0);
    }

    #[test]
    fn test_monotonic_clock_never_decreases() {
        let clock = MonotonicClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
