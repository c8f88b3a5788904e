//! Hardware-facing drivers. Each module keeps its logic host-testable
//! and confines ESP-IDF calls behind `#[cfg(target_os = "espidf")]`.

pub mod button;
pub mod hw_init;
pub mod indicator;
pub mod task_pin;
