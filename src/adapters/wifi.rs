//! WiFi station link adapter.
//!
//! [`LinkPort`] is the boundary the supervisor drives: fire off a
//! connection attempt, poll the link, tear it down. The port is
//! deliberately non-blocking — attempt progress is observed by polling
//! `is_connected`, and the 30 s attempt ceiling lives in the supervisor,
//! not here.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: [`EspLink`], real driver calls via
//!   `esp_idf_svc::wifi::EspWifi`.
//! - **all other targets**: [`SimLink`], a scripted stand-in for
//!   host-side tests and the simulation binary.

use core::fmt;
use core::net::Ipv4Addr;

use crate::config::Credentials;

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The radio driver rejected the request (ESP-IDF error code).
    Driver(i32),
    /// The simulated link refused the request.
    Refused,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Driver(code) => write!(f, "wifi driver error (esp_err {code})"),
            Self::Refused => write!(f, "simulated link refused"),
        }
    }
}

pub trait LinkPort {
    /// Kick off a connection attempt with the given credentials.
    /// Returns once the attempt is in flight, not once it succeeds.
    fn begin(&mut self, credentials: &Credentials) -> Result<(), LinkError>;

    /// Current link status. Cheap; polled every 500-1000 ms.
    fn is_connected(&self) -> bool;

    /// Abort the in-flight attempt or tear down the association.
    fn disconnect(&mut self);

    /// Station IPv4 address, once the link is up and DHCP has settled.
    fn local_address(&self) -> Option<Ipv4Addr>;
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF adapter
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use espidf::EspLink;

#[cfg(target_os = "espidf")]
mod espidf {
    use super::{Credentials, Ipv4Addr, LinkError, LinkPort};
    use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};
    use log::warn;

    /// [`LinkPort`] over the ESP-IDF WiFi driver in station mode.
    pub struct EspLink {
        wifi: EspWifi<'static>,
    }

    impl EspLink {
        pub fn new(wifi: EspWifi<'static>) -> Self {
            Self { wifi }
        }
    }

    fn driver_err(e: esp_idf_svc::sys::EspError) -> LinkError {
        LinkError::Driver(e.code())
    }

    impl LinkPort for EspLink {
        fn begin(&mut self, credentials: &Credentials) -> Result<(), LinkError> {
            let auth_method = if credentials.is_open() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            };
            // Credentials are validated to fit; try_from cannot fail here.
            let config = Configuration::Client(ClientConfiguration {
                ssid: heapless::String::try_from(credentials.ssid())
                    .map_err(|()| LinkError::Refused)?,
                password: heapless::String::try_from(credentials.password())
                    .map_err(|()| LinkError::Refused)?,
                auth_method,
                ..Default::default()
            });

            self.wifi.set_configuration(&config).map_err(driver_err)?;
            if !self.wifi.is_started().map_err(driver_err)? {
                self.wifi.start().map_err(driver_err)?;
            }
            self.wifi.connect().map_err(driver_err)
        }

        fn is_connected(&self) -> bool {
            self.wifi.is_connected().unwrap_or(false)
        }

        fn disconnect(&mut self) {
            if let Err(e) = self.wifi.disconnect() {
                warn!("wifi: disconnect failed (esp_err {})", e.code());
            }
        }

        fn local_address(&self) -> Option<Ipv4Addr> {
            self.wifi
                .sta_netif()
                .get_ip_info()
                .ok()
                .map(|info| info.ip)
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Simulation adapter
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub use sim::SimLink;

#[cfg(not(target_os = "espidf"))]
mod sim {
    use super::{Credentials, Ipv4Addr, LinkError, LinkPort};
    use std::cell::Cell;
    use log::info;

    /// Scripted [`LinkPort`] for deterministic host tests.
    ///
    /// The script is fixed at construction: either the network is
    /// unreachable, or the link comes up after a set number of
    /// `is_connected` polls. [`SimLink::sever`] drops an established
    /// link until the next `begin`.
    pub struct SimLink {
        reachable: bool,
        polls_until_up: Cell<u32>,
        severed: Cell<bool>,
        begins: Cell<u32>,
        disconnects: Cell<u32>,
    }

    impl SimLink {
        /// Network that never answers; every poll reports down.
        pub fn unreachable() -> Self {
            Self {
                reachable: false,
                polls_until_up: Cell::new(0),
                severed: Cell::new(false),
                begins: Cell::new(0),
                disconnects: Cell::new(0),
            }
        }

        /// Link reports down for the first `polls` `is_connected` calls,
        /// then up.
        pub fn connects_after(polls: u32) -> Self {
            Self {
                reachable: true,
                polls_until_up: Cell::new(polls),
                severed: Cell::new(false),
                begins: Cell::new(0),
                disconnects: Cell::new(0),
            }
        }

        /// Drop the link out from under the consumer.
        pub fn sever(&self) {
            self.severed.set(true);
        }

        pub fn begin_calls(&self) -> u32 {
            self.begins.get()
        }

        pub fn disconnect_calls(&self) -> u32 {
            self.disconnects.get()
        }
    }

    impl LinkPort for SimLink {
        fn begin(&mut self, credentials: &Credentials) -> Result<(), LinkError> {
            self.begins.set(self.begins.get() + 1);
            self.severed.set(false);
            info!("wifi(sim): begin '{}'", credentials.ssid());
            Ok(())
        }

        fn is_connected(&self) -> bool {
            if !self.reachable || self.severed.get() {
                return false;
            }
            let remaining = self.polls_until_up.get();
            if remaining == 0 {
                true
            } else {
                self.polls_until_up.set(remaining - 1);
                false
            }
        }

        fn disconnect(&mut self) {
            self.disconnects.set(self.disconnects.get() + 1);
        }

        fn local_address(&self) -> Option<Ipv4Addr> {
            if self.is_connected() {
                Some(Ipv4Addr::new(192, 168, 4, 2))
            } else {
                None
            }
        }
    }

}
