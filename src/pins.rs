//! GPIO pin assignments for the netbeacon board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Status LED
// ---------------------------------------------------------------------------

/// Digital output driving the status LED (on-board LED on GPIO 25).
pub const LED_GPIO: i32 = 25;
/// `true` = the LED lights when the pin is driven HIGH.
pub const LED_ACTIVE_HIGH: bool = true;

// ---------------------------------------------------------------------------
// User button (active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button (BOOT button on GPIO 0).
pub const BUTTON_GPIO: i32 = 0;
/// GPIO level that means "pressed" (active low).
pub const BUTTON_PRESSED_LEVEL: i32 = 0;
