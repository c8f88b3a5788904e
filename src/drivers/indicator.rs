//! Status LED blink driver.
//!
//! Turns the current [`IndicatorMode`] into an on/off waveform on the
//! status LED. Mode updates arrive through the overwrite mailbox
//! ([`ModeMailbox`](crate::channels::ModeMailbox)): the worker blocks on
//! the mailbox while the mode is static, and polls it without blocking
//! between pulses while blinking, so a pending change takes effect
//! before the next pulse.
//!
//! The pulse width is fixed at 25 ms regardless of rate — a faster rate
//! therefore looks dimmer, which is deliberate signal design: the rate,
//! not the brightness, carries the information.

use core::time::Duration;

use async_io_mini::Timer;

use crate::channels::ModeMailbox;
use crate::drivers::hw_init;
use crate::pins;

/// Asserted time per blink cycle, in milliseconds. Fixed for all rates.
pub const PULSE_MS: u32 = 25;

/// What the status LED is signalling.
///
/// Ordered by activity level: `Off` < `On` < the blink rates. `Off` and
/// `On` are static levels; the `Blink*` variants are periodic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IndicatorMode {
    Off,
    On,
    Blink1Hz,
    Blink2Hz,
    Blink4Hz,
}

impl IndicatorMode {
    /// Full blink period in milliseconds, or `None` for the static modes.
    pub const fn period_ms(self) -> Option<u32> {
        match self {
            Self::Off | Self::On => None,
            Self::Blink1Hz => Some(1000),
            Self::Blink2Hz => Some(500),
            Self::Blink4Hz => Some(250),
        }
    }

    pub const fn is_periodic(self) -> bool {
        self.period_ms().is_some()
    }

    /// `(asserted_ms, deasserted_ms)` for one blink cycle, or `None` for
    /// the static modes.
    pub const fn pulse_timing(self) -> Option<(u32, u32)> {
        match self.period_ms() {
            Some(period) => Some((PULSE_MS, period - PULSE_MS)),
            None => None,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Output port
// ───────────────────────────────────────────────────────────────

/// Write-side port for the single LED output. Lets host tests record
/// level changes instead of touching GPIO registers.
pub trait IndicatorOutput {
    /// `true` = LED lit. Active-level translation happens below the port.
    fn set_active(&mut self, on: bool);
}

/// Production output: drives [`pins::LED_GPIO`].
pub struct GpioOutput;

impl IndicatorOutput for GpioOutput {
    fn set_active(&mut self, on: bool) {
        hw_init::gpio_write(pins::LED_GPIO, on == pins::LED_ACTIVE_HIGH);
    }
}

// ───────────────────────────────────────────────────────────────
// Worker loop
// ───────────────────────────────────────────────────────────────

/// Apply a static mode to the output. Periodic modes leave the pin to
/// the pulse loop.
fn apply_static(mode: IndicatorMode, out: &mut impl IndicatorOutput) {
    match mode {
        IndicatorMode::Off => out.set_active(false),
        IndicatorMode::On => out.set_active(true),
        _ => {}
    }
}

/// Indicator worker. Runs for the lifetime of the device.
///
/// Static mode held: suspend on the mailbox (zero duty cycle while idle).
/// Periodic mode held: non-blocking mailbox poll, then one pulse cycle.
pub async fn run(mut out: impl IndicatorOutput, mailbox: &ModeMailbox) -> ! {
    let mut mode = IndicatorMode::Off;
    out.set_active(false);

    loop {
        let update = if mode.is_periodic() {
            mailbox.try_take()
        } else {
            Some(mailbox.wait().await)
        };

        if let Some(next) = update {
            mode = next;
            apply_static(mode, &mut out);
        }

        if let Some((on_ms, off_ms)) = mode.pulse_timing() {
            out.set_active(true);
            Timer::after(Duration::from_millis(u64::from(on_ms))).await;
            out.set_active(false);
            Timer::after(Duration::from_millis(u64::from(off_ms))).await;
        }
    }
}

/// Spawn the indicator worker on the application core.
pub fn spawn(mailbox: &'static ModeMailbox) -> std::io::Result<std::thread::JoinHandle<()>> {
    crate::drivers::task_pin::spawn_on_core(
        crate::drivers::task_pin::Core::App,
        5,
        4,
        "indicator\0",
        move || {
            futures_lite::future::block_on(run(GpioOutput, mailbox));
        },
    )
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
