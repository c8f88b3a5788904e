//! Terminal diagnostics.
//!
//! [`halt`] is the one-way exit for unrecoverable startup failures
//! (peripheral init, worker spawn, invalid compiled-in credentials).
//! It never returns — the divergent signature makes the terminal nature
//! visible at every call site. Steady-state errors never come here.

/// Log the failure and stop the device permanently.
///
/// On target: enter deep sleep with no wakeup source configured — the
/// chip stays down until external reset. On the host: exit the process.
pub fn halt(msg: &str) -> ! {
    log::error!("{msg} — halting");

    #[cfg(target_os = "espidf")]
    // SAFETY: esp_deep_sleep_start takes no arguments and does not
    // return; any state worth flushing was logged above.
    unsafe {
        esp_idf_svc::sys::esp_deep_sleep_start()
    }

    #[cfg(not(target_os = "espidf"))]
    std::process::exit(1)
}
