//! Names of the values carried by a credential bundle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the seven values in a [`CredentialBundle`](crate::CredentialBundle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// AWS IoT thing name (device identifier)
    ThingName,
    /// Access point SSID
    WifiSsid,
    /// Access point passphrase
    WifiPassword,
    /// IoT endpoint hostname, no scheme or port
    Endpoint,
    /// Trust anchor for the endpoint's server certificate
    RootCa,
    /// Certificate the device presents to the endpoint
    DeviceCertificate,
    /// Private key matching the device certificate
    PrivateKey,
}

impl Field {
    /// Every field, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::ThingName,
        Self::WifiSsid,
        Self::WifiPassword,
        Self::Endpoint,
        Self::RootCa,
        Self::DeviceCertificate,
        Self::PrivateKey,
    ];

    /// Key used in bundle files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ThingName => "thing_name",
            Self::WifiSsid => "wifi_ssid",
            Self::WifiPassword => "wifi_password",
            Self::Endpoint => "endpoint",
            Self::RootCa => "root_ca",
            Self::DeviceCertificate => "device_certificate",
            Self::PrivateKey => "private_key",
        }
    }

    /// Environment variable read by [`from_env`](crate::loader::from_env).
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::ThingName => "CRASHWATCH_THING_NAME",
            Self::WifiSsid => "CRASHWATCH_WIFI_SSID",
            Self::WifiPassword => "CRASHWATCH_WIFI_PASSWORD",
            Self::Endpoint => "CRASHWATCH_ENDPOINT",
            Self::RootCa => "CRASHWATCH_ROOT_CA",
            Self::DeviceCertificate => "CRASHWATCH_DEVICE_CERTIFICATE",
            Self::PrivateKey => "CRASHWATCH_PRIVATE_KEY",
        }
    }

    /// True for the three PEM-armored blobs.
    pub const fn is_pem(self) -> bool {
        matches!(self, Self::RootCa | Self::DeviceCertificate | Self::PrivateKey)
    }

    /// True for values that must never be printed in clear.
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::WifiPassword | Self::PrivateKey)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
