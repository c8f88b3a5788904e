//! Station credentials.
//!
//! Compiled in at build time (`WIFI_SSID` / `WIFI_PSWD` environment
//! variables); there is no runtime provisioning surface. Validation
//! follows WPA2 station rules: 1–32 printable-ASCII bytes of SSID,
//! password either empty (open network) or 8–64 bytes.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsError {
    InvalidSsid,
    InvalidPassword,
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
        }
    }
}

/// Validated WiFi station credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl Credentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, CredentialsError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        let mut s = heapless::String::new();
        s.push_str(ssid).map_err(|()| CredentialsError::InvalidSsid)?;
        let mut p = heapless::String::new();
        p.push_str(password)
            .map_err(|()| CredentialsError::InvalidPassword)?;
        Ok(Self { ssid: s, password: p })
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Open network — no passphrase.
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

/// Credentials baked into this build.
///
/// `WIFI_SSID=... WIFI_PSWD=... cargo build --features espidf ...`
/// The placeholder defaults are valid but unreachable, so an
/// unconfigured build boots and retries forever instead of failing
/// validation.
pub fn station_credentials() -> Result<Credentials, CredentialsError> {
    Credentials::new(
        option_env!("WIFI_SSID").unwrap_or("netbeacon-unset"),
        option_env!("WIFI_PSWD").unwrap_or("netbeacon-unset"),
    )
}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), CredentialsError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(CredentialsError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), CredentialsError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(CredentialsError::InvalidPassword);
    }
    Ok(())
}
