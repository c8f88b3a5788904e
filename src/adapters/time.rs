//! Monotonic millisecond clock.
//!
//! One `u32` millisecond counter for the whole firmware; it wraps after
//! ~49.7 days, and every consumer computes elapsed time with
//! `wrapping_sub`, so the wrap is harmless.

/// Milliseconds since boot (target) or since construction (host).
pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    #[cfg(target_os = "espidf")]
    pub fn now_ms(&self) -> u32 {
        // esp_timer counts microseconds from boot in i64; truncating to
        // u32 milliseconds gives the wrapping counter the consumers expect.
        (unsafe { esp_idf_sys::esp_timer_get_time() } / 1000) as u32
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
