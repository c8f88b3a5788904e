//! Netbeacon firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod channels;
pub mod config;
pub mod diagnostics;
pub mod dispatcher;
pub mod supervisor;

pub mod adapters;
pub mod drivers;

mod pins;

// Host critical-section implementation for the embassy-sync primitives
// used by unit tests.
#[cfg(test)]
use critical_section as _;
