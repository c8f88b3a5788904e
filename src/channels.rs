//! Inter-task channels.
//!
//! Two distinct delivery semantics, kept as two distinct abstractions:
//!
//! - [`ModeMailbox`] — single-slot overwrite mailbox for the indicator
//!   mode. A new write replaces any unread value; the indicator only
//!   ever observes the most recent mode. Mode is a level, not an edge.
//! - [`EventQueue`] — bounded FIFO (capacity 32) for button events.
//!   Non-blocking ISR-side send (drop on full), blocking single-consumer
//!   receive, arrival order preserved.
//!
//! Collapsing the two into one generic queue would change observable
//! behavior (mode-loss vs. event-loss trade-offs differ), so don't.
//!
//! Both are `static`s shared without heap allocation; creation cannot
//! fail at runtime.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use crate::drivers::button::ButtonEvent;
use crate::drivers::indicator::IndicatorMode;
use crate::supervisor::{ModePort, ModeSetError};

/// Button event queue depth.
pub const EVENT_QUEUE_DEPTH: usize = 32;

// ───────────────────────────────────────────────────────────────
// Overwrite mailbox
// ───────────────────────────────────────────────────────────────

/// Last-write-wins mailbox carrying the requested indicator mode.
pub struct ModeMailbox {
    slot: Signal<CriticalSectionRawMutex, IndicatorMode>,
}

impl ModeMailbox {
    pub const fn new() -> Self {
        Self { slot: Signal::new() }
    }

    /// Store a mode, replacing any value not yet observed.
    pub fn set(&self, mode: IndicatorMode) {
        self.slot.signal(mode);
    }

    /// Suspend until a mode is available, then take it.
    pub async fn wait(&self) -> IndicatorMode {
        self.slot.wait().await
    }

    /// Take the pending mode without blocking, if any.
    pub fn try_take(&self) -> Option<IndicatorMode> {
        self.slot.try_take()
    }
}

impl Default for ModeMailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl ModePort for ModeMailbox {
    fn set_mode(&self, mode: IndicatorMode) -> Result<(), ModeSetError> {
        self.set(mode);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Bounded FIFO event queue
// ───────────────────────────────────────────────────────────────

/// Bounded FIFO carrying classified button events from the ISR to the
/// dispatcher.
pub struct EventQueue {
    queue: Channel<CriticalSectionRawMutex, ButtonEvent, EVENT_QUEUE_DEPTH>,
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            queue: Channel::new(),
        }
    }

    /// Non-blocking, interrupt-safe send. A full queue drops the event;
    /// returns whether it was accepted.
    pub fn send_from_isr(&self, event: ButtonEvent) -> bool {
        self.queue.try_send(event).is_ok()
    }

    /// Suspend until an event arrives.
    pub async fn receive(&self) -> ButtonEvent {
        self.queue.receive().await
    }

    /// Take the next event without blocking, if any.
    pub fn try_receive(&self) -> Option<ButtonEvent> {
        self.queue.try_receive().ok()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Shared instances
// ───────────────────────────────────────────────────────────────

/// Indicator mode mailbox: supervisor (and any future producer) → indicator.
pub static MODE_MAILBOX: ModeMailbox = ModeMailbox::new();

/// Button event queue: button ISR → dispatcher.
pub static BUTTON_EVENTS: EventQueue = EventQueue::new();

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
