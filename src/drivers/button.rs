//! Edge-interrupt button classifier.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up. The GPIO fires on both
//! edges; the ISR reads the instantaneous level plus the monotonic
//! clock and classifies the transition into a [`ButtonEvent`], which is
//! pushed into the bounded event queue with a non-blocking send.
//!
//! ## Classification
//!
//! | Edge    | Condition            | Event       |
//! |---------|----------------------|-------------|
//! | Press   | always               | `Pressed`   |
//! | Release | held >= 500 ms       | `LongClick` |
//! | Release | 20 ms <= held < 500 ms | `Click`   |
//! | Release | held < 20 ms         | `Released` (contact bounce) |
//!
//! Debounce happens only on the trailing edge, by elapsed-time
//! thresholding; every press edge emits `Pressed` unconditionally.
//! Inherited behavior — see the note on `press_edge_is_never_debounced`.

use core::sync::atomic::{AtomicU32, Ordering};

/// Minimum hold time for a release to count as a real click.
pub const CLICK_MS: u32 = 20;
/// Hold time at which a release becomes a long click.
pub const LONG_CLICK_MS: u32 = 500;

/// Semantic button events, one per physical edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Released,
    Pressed,
    Click,
    LongClick,
}

/// Per-edge classifier state: the timestamp of the most recent press
/// edge, or 0 while released.
///
/// Written and read only from ISR context (single, non-reentrant
/// writer); the atomic covers the host-test path, where multiple test
/// threads hold their own instances.
pub struct ButtonClassifier {
    last_pressed_ms: AtomicU32,
}

impl ButtonClassifier {
    pub const fn new() -> Self {
        Self {
            last_pressed_ms: AtomicU32::new(0),
        }
    }

    /// Classify one edge transition. ISR-safe: lock-free, never blocks.
    ///
    /// `pressed` is the instantaneous level after the edge, `now_ms`
    /// the monotonic clock (wraps per u32; elapsed math is
    /// wraparound-correct).
    pub fn on_edge(&self, pressed: bool, now_ms: u32) -> ButtonEvent {
        if pressed {
            self.last_pressed_ms.store(now_ms, Ordering::Release);
            ButtonEvent::Pressed
        } else {
            let pressed_at = self.last_pressed_ms.swap(0, Ordering::AcqRel);
            let held_ms = now_ms.wrapping_sub(pressed_at);
            if held_ms >= LONG_CLICK_MS {
                ButtonEvent::LongClick
            } else if held_ms >= CLICK_MS {
                ButtonEvent::Click
            } else {
                ButtonEvent::Released
            }
        }
    }
}

impl Default for ButtonClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classifier instance backing the hardware button ISR.
static CLASSIFIER: ButtonClassifier = ButtonClassifier::new();

/// ISR handler — register this on both button edges.
///
/// Classifies the edge and enqueues the event fire-and-forget: a full
/// queue drops the event rather than blocking or retrying in interrupt
/// context.
pub fn button_isr_handler(pressed: bool, now_ms: u32) {
    let event = CLASSIFIER.on_edge(pressed, now_ms);
    let _ = crate::channels::BUTTON_EVENTS.send_from_isr(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Press then release, returning the release classification.
    fn press_release(pressed_at: u32, released_at: u32) -> ButtonEvent {
        let c = ButtonClassifier::new();
        assert_eq!(c.on_edge(true, pressed_at), ButtonEvent::Pressed);
        c.on_edge(false, released_at)
    }

    #[test]
    fn bounce_release_is_noise() {
        // Press at t=0, release at t=10ms.
        assert_eq!(press_release(0, 10), ButtonEvent::Released);
    }

    #[test]
    fn short_hold_is_a_click() {
        // Press at t=0, release at t=100ms.
        assert_eq!(press_release(0, 100), ButtonEvent::Click);
    }

    #[test]
    fn long_hold_is_a_long_click() {
        // Press at t=0, release at t=600ms.
        assert_eq!(press_release(0, 600), ButtonEvent::LongClick);
    }

    #[test]
    fn threshold_edges_are_inclusive() {
        assert_eq!(press_release(1000, 1019), ButtonEvent::Released);
        assert_eq!(press_release(1000, 1020), ButtonEvent::Click);
        assert_eq!(press_release(1000, 1499), ButtonEvent::Click);
        assert_eq!(press_release(1000, 1500), ButtonEvent::LongClick);
    }

    #[test]
    fn elapsed_is_correct_across_clock_wraparound() {
        // Press just before the u32 clock wraps, release 300ms "later".
        let pressed_at = u32::MAX - 100;
        let released_at = pressed_at.wrapping_add(300);
        assert_eq!(press_release(pressed_at, released_at), ButtonEvent::Click);
    }

    #[test]
    fn press_edge_is_never_debounced() {
        // Inherited behavior: every press edge emits `Pressed`, so a
        // bouncing contact can emit several `Pressed` events per
        // physical press. Debounce filtering applies to releases only.
        // Kept as-is for parity with the deployed classifier.
        let c = ButtonClassifier::new();
        assert_eq!(c.on_edge(true, 0), ButtonEvent::Pressed);
        assert_eq!(c.on_edge(true, 2), ButtonEvent::Pressed);
        assert_eq!(c.on_edge(true, 4), ButtonEvent::Pressed);
    }

    #[test]
    fn release_clears_the_press_timestamp() {
        // Inherited behavior: after a release the timestamp resets to 0,
        // so a stray second release classifies against t=0.
        let c = ButtonClassifier::new();
        c.on_edge(true, 1000);
        assert_eq!(c.on_edge(false, 1100), ButtonEvent::Click);
        assert_eq!(c.on_edge(false, 1200), ButtonEvent::LongClick);
    }
}
