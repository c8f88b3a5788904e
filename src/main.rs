//! Netbeacon firmware — main entry point.
//!
//! Three long-lived workers on the dual-core ESP32:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Core 0 (PRO)              │ Core 1 (APP)                │
//! │                           │                             │
//! │  wifi-sup ──────────────┐ │  indicator ◀── ModeMailbox  │
//! │  (link state machine)   └─┼──▶ mode pushes              │
//! │                           │                             │
//! │  main / dispatcher ◀── EventQueue ◀── button ISR        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The mailbox carries levels (latest indicator mode wins); the queue
//! carries edges (every surviving button event, in order). Startup
//! failures halt the device; steady-state failures are logged and the
//! workers carry on.

use anyhow::Result;
use log::{error, info};

use netbeacon::adapters::time::MonotonicClock;
use netbeacon::adapters::wifi::EspLink;
use netbeacon::channels::{BUTTON_EVENTS, MODE_MAILBOX};
use netbeacon::config::{self, Credentials};
use netbeacon::diagnostics::halt;
use netbeacon::drivers::{hw_init, indicator, task_pin};
use netbeacon::{dispatcher, supervisor};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::wifi::EspWifi;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("netbeacon v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripheral bring-up (fatal on failure) ─────────────
    if let Err(e) = hw_init::init_peripherals() {
        halt(&format!("peripheral init failed: {e}"));
    }

    let credentials = match config::station_credentials() {
        Ok(c) => c,
        Err(e) => halt(&format!("compiled-in credentials invalid: {e}")),
    };

    // ── 3. Workers (fatal if they cannot spawn) ───────────────
    if let Err(e) = indicator::spawn(&MODE_MAILBOX) {
        halt(&format!("indicator spawn failed: {e}"));
    }
    if let Err(e) = spawn_supervisor(credentials) {
        halt(&format!("wifi supervisor spawn failed: {e}"));
    }

    // ── 4. Button interrupt (degraded operation on failure) ───
    if let Err(e) = hw_init::init_isr_service() {
        error!("button ISR init failed: {e} — continuing without button input");
    }

    info!("system ready, entering dispatch loop");

    // ── 5. Dispatcher owns the main thread forever ────────────
    futures_lite::future::block_on(dispatcher::run(&BUTTON_EVENTS))
}

/// Build the WiFi driver and hand it to the supervisor worker on the
/// protocol core.
fn spawn_supervisor(credentials: Credentials) -> Result<()> {
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let link = EspLink::new(EspWifi::new(peripherals.modem, sysloop, None)?);

    task_pin::spawn_on_core(task_pin::Core::Pro, 5, 6, "wifi-sup\0", move || {
        let clock = MonotonicClock::new();
        let sup = supervisor::LinkSupervisor::new(link, &MODE_MAILBOX, credentials);
        futures_lite::future::block_on(supervisor::run(sup, &clock));
    })?;
    Ok(())
}
