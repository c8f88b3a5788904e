//! WiFi link supervisor.
//!
//! Owns the attempt/retry state machine for the network link and drives
//! the status indicator as a side effect:
//!
//! ```text
//! Disconnected ──begin──▶ Connecting ──link up──▶ Connected
//!      ▲                      │ 30 s timeout          │ link lost
//!      └──── 30 s ── BackingOff ◀──┘                  │
//!      └──────────────────────────────────────────────┘
//! ```
//!
//! Blink4Hz while connecting, Blink1Hz once connected, Off during
//! backoff. A connection timeout is not an error — it is a modeled
//! transition with a fixed-delay retry; the supervisor retries forever.
//!
//! The transition function [`LinkSupervisor::step`] is pure over
//! `now_ms` and returns the delay until the next step, so host tests
//! drive it with a virtual clock.

use core::fmt;
use core::time::Duration;

use async_io_mini::Timer;
use log::{debug, info, warn};

use crate::adapters::time::MonotonicClock;
use crate::adapters::wifi::LinkPort;
use crate::config::Credentials;
use crate::drivers::indicator::IndicatorMode;

/// Ceiling for a single connection attempt.
pub const CONNECT_TIMEOUT_MS: u32 = 30_000;
/// Fixed delay between failed attempts. No exponential growth, no limit.
pub const RETRY_BACKOFF_MS: u32 = 30_000;
/// Link poll interval while an attempt is in flight.
pub const CONNECT_POLL_MS: u32 = 500;
/// Link poll interval while connected.
pub const CONNECTED_POLL_MS: u32 = 1_000;

// ───────────────────────────────────────────────────────────────
// Mode port
// ───────────────────────────────────────────────────────────────

/// A mode update was not accepted by the indicator mailbox.
///
/// The production mailbox is infallible; the port contract keeps the
/// failure leg so the supervisor's handling (log, proceed) stays
/// visible and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSetError;

impl fmt::Display for ModeSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "indicator mode update rejected")
    }
}

/// Write-side port for indicator mode updates (overwrite semantics —
/// a rapid sequence of pushes may collapse into the final one).
pub trait ModePort {
    fn set_mode(&self, mode: IndicatorMode) -> Result<(), ModeSetError>;
}

impl<T: ModePort> ModePort for &T {
    fn set_mode(&self, mode: IndicatorMode) -> Result<(), ModeSetError> {
        (*self).set_mode(mode)
    }
}

// ───────────────────────────────────────────────────────────────
// State machine
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting { started_ms: u32 },
    Connected,
    BackingOff { since_ms: u32 },
}

pub struct LinkSupervisor<L, M> {
    link: L,
    modes: M,
    credentials: Credentials,
    state: LinkState,
}

impl<L: LinkPort, M: ModePort> LinkSupervisor<L, M> {
    pub fn new(link: L, modes: M, credentials: Credentials) -> Self {
        Self {
            link,
            modes,
            credentials,
            state: LinkState::Disconnected,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn link_ref(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Advance the state machine once. Returns the delay in
    /// milliseconds before the next step (0 = step again immediately).
    pub fn step(&mut self, now_ms: u32) -> u32 {
        match self.state {
            LinkState::Disconnected => {
                info!("wifi: connecting to '{}'", self.credentials.ssid());
                if let Err(e) = self.link.begin(&self.credentials) {
                    // The attempt still runs; the timeout path recovers.
                    warn!("wifi: begin failed ({e})");
                }
                self.push_mode(IndicatorMode::Blink4Hz);
                self.state = LinkState::Connecting { started_ms: now_ms };
                CONNECT_POLL_MS
            }

            LinkState::Connecting { started_ms } => {
                if self.link.is_connected() {
                    match self.link.local_address() {
                        Some(ip) => info!("wifi: connected (ip {ip})"),
                        None => info!("wifi: connected"),
                    }
                    self.push_mode(IndicatorMode::Blink1Hz);
                    self.state = LinkState::Connected;
                    return CONNECTED_POLL_MS;
                }

                let elapsed = now_ms.wrapping_sub(started_ms);
                if elapsed >= CONNECT_TIMEOUT_MS {
                    self.link.disconnect();
                    warn!(
                        "wifi: no link after {}s, retrying in {}s",
                        CONNECT_TIMEOUT_MS / 1000,
                        RETRY_BACKOFF_MS / 1000
                    );
                    self.push_mode(IndicatorMode::Off);
                    self.state = LinkState::BackingOff { since_ms: now_ms };
                    RETRY_BACKOFF_MS
                } else {
                    debug!("wifi: still connecting ({elapsed}ms)");
                    CONNECT_POLL_MS
                }
            }

            LinkState::BackingOff { since_ms } => {
                // Re-check elapsed time rather than trusting the sleep,
                // so an early wakeup cannot shorten the backoff.
                let elapsed = now_ms.wrapping_sub(since_ms);
                if elapsed >= RETRY_BACKOFF_MS {
                    self.state = LinkState::Disconnected;
                    0
                } else {
                    RETRY_BACKOFF_MS - elapsed
                }
            }

            LinkState::Connected => {
                if self.link.is_connected() {
                    CONNECTED_POLL_MS
                } else {
                    warn!("wifi: connection lost");
                    self.state = LinkState::Disconnected;
                    0
                }
            }
        }
    }

    fn push_mode(&self, mode: IndicatorMode) {
        if let Err(e) = self.modes.set_mode(mode) {
            warn!("wifi: failed to update indicator ({e})");
        }
    }
}

/// Supervisor worker. Runs for the lifetime of the device.
pub async fn run<L: LinkPort, M: ModePort>(
    mut supervisor: LinkSupervisor<L, M>,
    clock: &MonotonicClock,
) -> ! {
    loop {
        let delay_ms = supervisor.step(clock.now_ms());
        if delay_ms > 0 {
            Timer::after(Duration::from_millis(u64::from(delay_ms))).await;
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::wifi::SimLink;
    use std::cell::RefCell;

    struct RecordingModes {
        pushed: RefCell<Vec<IndicatorMode>>,
    }

    impl RecordingModes {
        fn new() -> Self {
            Self {
                pushed: RefCell::new(Vec::new()),
            }
        }

        fn all(&self) -> Vec<IndicatorMode> {
            self.pushed.borrow().clone()
        }
    }

    impl ModePort for RecordingModes {
        fn set_mode(&self, mode: IndicatorMode) -> Result<(), ModeSetError> {
            self.pushed.borrow_mut().push(mode);
            Ok(())
        }
    }

    fn creds() -> Credentials {
        Credentials::new("TestNet", "password1").unwrap()
    }

    /// Drive the supervisor with a virtual clock until `t_end`, tagging
    /// every mode push with the time it happened.
    fn drive(
        sup: &mut LinkSupervisor<SimLink, &RecordingModes>,
        modes: &RecordingModes,
        t_end: u32,
    ) -> Vec<(u32, IndicatorMode)> {
        let mut timeline = Vec::new();
        let mut t = 0u32;
        loop {
            let seen = modes.all().len();
            let delay = sup.step(t);
            for &mode in &modes.all()[seen..] {
                timeline.push((t, mode));
            }
            // delay == 0 means "step again now" — keep going so the
            // follow-up transition at the same instant is captured.
            if t >= t_end && delay > 0 {
                return timeline;
            }
            t += delay;
        }
    }

    #[test]
    fn first_step_starts_an_attempt() {
        let modes = RecordingModes::new();
        let mut sup = LinkSupervisor::new(SimLink::unreachable(), &modes, creds());
        let delay = sup.step(0);
        assert_eq!(delay, CONNECT_POLL_MS);
        assert!(matches!(sup.state(), LinkState::Connecting { started_ms: 0 }));
        assert_eq!(modes.all(), vec![IndicatorMode::Blink4Hz]);
    }

    #[test]
    fn successful_attempt_reaches_connected() {
        // Link comes up on the poll at t=3000 (6th poll at 500ms cadence).
        let modes = RecordingModes::new();
        let mut sup = LinkSupervisor::new(SimLink::connects_after(5), &modes, creds());
        let timeline = drive(&mut sup, &modes, 3000);

        assert_eq!(
            timeline,
            vec![(0, IndicatorMode::Blink4Hz), (3000, IndicatorMode::Blink1Hz)]
        );
        assert_eq!(sup.state(), LinkState::Connected);
    }

    #[test]
    fn timeout_backs_off_then_retries() {
        let modes = RecordingModes::new();
        let mut sup = LinkSupervisor::new(SimLink::unreachable(), &modes, creds());
        let timeline = drive(&mut sup, &modes, 60_000);

        // Off at the 30s ceiling, next attempt exactly 30s later.
        assert_eq!(
            timeline,
            vec![
                (0, IndicatorMode::Blink4Hz),
                (30_000, IndicatorMode::Off),
                (60_000, IndicatorMode::Blink4Hz),
            ]
        );
        assert!(matches!(sup.state(), LinkState::Connecting { started_ms: 60_000 }));
    }

    #[test]
    fn timeout_aborts_the_attempt() {
        let modes = RecordingModes::new();
        let mut sup = LinkSupervisor::new(SimLink::unreachable(), &modes, creds());
        let mut t = 0;
        while !matches!(sup.state(), LinkState::BackingOff { .. }) {
            t += sup.step(t);
        }
        assert_eq!(sup.link.begin_calls(), 1);
        assert_eq!(sup.link.disconnect_calls(), 1);
    }

    #[test]
    fn lost_link_restarts_the_cycle() {
        let modes = RecordingModes::new();
        let mut sup = LinkSupervisor::new(SimLink::connects_after(0), &modes, creds());
        let mut t = 0;
        t += sup.step(t); // Disconnected -> Connecting
        t += sup.step(t); // Connecting -> Connected
        assert_eq!(sup.state(), LinkState::Connected);

        sup.link.sever();
        let delay = sup.step(t); // Connected -> Disconnected
        assert_eq!(delay, 0);
        assert_eq!(sup.state(), LinkState::Disconnected);

        sup.step(t); // immediately begins a fresh attempt
        assert!(matches!(sup.state(), LinkState::Connecting { .. }));
        assert_eq!(sup.link.begin_calls(), 2);
    }

    #[test]
    fn early_wakeup_does_not_shorten_backoff() {
        let modes = RecordingModes::new();
        let mut sup = LinkSupervisor::new(SimLink::unreachable(), &modes, creds());
        let mut t = 0;
        while !matches!(sup.state(), LinkState::BackingOff { .. }) {
            t += sup.step(t);
        }
        // Spurious wakeup 10s into the 30s backoff.
        let remaining = sup.step(t + 10_000);
        assert_eq!(remaining, 20_000);
        assert!(matches!(sup.state(), LinkState::BackingOff { .. }));
    }

    #[test]
    fn backoff_survives_clock_wraparound() {
        let modes = RecordingModes::new();
        let mut sup = LinkSupervisor::new(SimLink::unreachable(), &modes, creds());
        // Start an attempt just before the u32 clock wraps.
        let t0 = u32::MAX - 10_000;
        sup.step(t0);
        // Timeout fires 30s later, across the wrap.
        let t1 = t0.wrapping_add(CONNECT_TIMEOUT_MS);
        sup.step(t1);
        assert!(matches!(sup.state(), LinkState::BackingOff { .. }));
        // Backoff completes another 30s later.
        let t2 = t1.wrapping_add(RETRY_BACKOFF_MS);
        assert_eq!(sup.step(t2), 0);
        assert_eq!(sup.state(), LinkState::Disconnected);
    }
}
