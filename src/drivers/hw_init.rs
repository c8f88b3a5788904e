//! GPIO bring-up and the raw button ISR.
//!
//! Two-phase startup, both called once from `main`:
//!
//! 1. [`init_peripherals`] — configure the LED output (deasserted) and
//!    the button input (pull-up). Failure here is fatal; the caller
//!    halts the device.
//! 2. [`init_isr_service`] — install the GPIO ISR service and attach
//!    the both-edges button interrupt. Failure here degrades the device
//!    (no button input) but the rest keeps running.
//!
//! On non-ESP targets everything is a logged no-op so host tests and
//! the simulation binary link without the IDF.

use core::fmt;

use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
}

impl fmt::Display for HwInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioConfigFailed(code) => write!(f, "gpio_config failed (esp_err {code})"),
            Self::IsrInstallFailed(code) => write!(f, "ISR install failed (esp_err {code})"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Peripheral bring-up
// ───────────────────────────────────────────────────────────────

/// Configure the LED output (driven inactive) and the button input.
#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    unsafe {
        let led_cfg = esp_idf_sys::gpio_config_t {
            pin_bit_mask: 1u64 << pins::LED_GPIO,
            mode: esp_idf_sys::gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: esp_idf_sys::gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: esp_idf_sys::gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: esp_idf_sys::gpio_int_type_t_GPIO_INTR_DISABLE,
            ..Default::default()
        };
        let ret = esp_idf_sys::gpio_config(&led_cfg);
        if ret != esp_idf_sys::ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }

        // LED off until a worker takes over the pin.
        esp_idf_sys::gpio_set_level(pins::LED_GPIO, u32::from(!pins::LED_ACTIVE_HIGH));

        let btn_cfg = esp_idf_sys::gpio_config_t {
            pin_bit_mask: 1u64 << pins::BUTTON_GPIO,
            mode: esp_idf_sys::gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: esp_idf_sys::gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: esp_idf_sys::gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: esp_idf_sys::gpio_int_type_t_GPIO_INTR_DISABLE,
            ..Default::default()
        };
        let ret = esp_idf_sys::gpio_config(&btn_cfg);
        if ret != esp_idf_sys::ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    log::info!(
        "hw_init: LED on GPIO{}, button on GPIO{}",
        pins::LED_GPIO,
        pins::BUTTON_GPIO
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!(
        "hw_init(sim): LED on GPIO{}, button on GPIO{}",
        pins::LED_GPIO,
        pins::BUTTON_GPIO
    );
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// GPIO access
// ───────────────────────────────────────────────────────────────

/// Set a GPIO level. `high` is the electrical level, not the logical one.
#[cfg(target_os = "espidf")]
pub fn gpio_write(gpio: i32, high: bool) {
    unsafe {
        esp_idf_sys::gpio_set_level(gpio, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(gpio: i32, high: bool) {
    log::trace!("gpio_write(sim): GPIO{gpio} <- {}", i32::from(high));
}

/// Read a GPIO level.
#[cfg(target_os = "espidf")]
pub fn gpio_read(gpio: i32) -> i32 {
    unsafe { esp_idf_sys::gpio_get_level(gpio) }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_gpio: i32) -> i32 {
    // Pulled-up input reads high (not pressed) in simulation.
    1
}

// ───────────────────────────────────────────────────────────────
// Button interrupt
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_gpio_isr(_arg: *mut core::ffi::c_void) {
    let now_ms = unsafe { esp_idf_sys::esp_timer_get_time() / 1000 } as u32;
    let pressed = unsafe { esp_idf_sys::gpio_get_level(pins::BUTTON_GPIO) }
        == pins::BUTTON_PRESSED_LEVEL;
    crate::drivers::button::button_isr_handler(pressed, now_ms);
}

/// Install the GPIO ISR service and hook the button on both edges.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    unsafe {
        let ret = esp_idf_sys::gpio_install_isr_service(0);
        // Already installed is fine (idempotent restart paths).
        if ret != esp_idf_sys::ESP_OK as i32 && ret != esp_idf_sys::ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        let ret = esp_idf_sys::gpio_set_intr_type(
            pins::BUTTON_GPIO,
            esp_idf_sys::gpio_int_type_t_GPIO_INTR_ANYEDGE,
        );
        if ret != esp_idf_sys::ESP_OK as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        let ret = esp_idf_sys::gpio_isr_handler_add(
            pins::BUTTON_GPIO,
            Some(button_gpio_isr),
            core::ptr::null_mut(),
        );
        if ret != esp_idf_sys::ESP_OK as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
    }

    log::info!("hw_init: button ISR armed on GPIO{}", pins::BUTTON_GPIO);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): no button ISR, event queue stays idle");
    Ok(())
}
