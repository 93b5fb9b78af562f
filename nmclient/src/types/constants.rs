//! Constants for NetworkManager D-Bus interface values.
//!
//! These constants correspond to the numeric codes and well-known names
//! used by NetworkManager's D-Bus API.

/// Bus name, object paths and interface names.
pub mod dbus_names {
    pub const SERVICE: &str = "org.freedesktop.NetworkManager";
    pub const ACTIVE_CONNECTION_IFACE: &str = "org.freedesktop.NetworkManager.Connection.Active";
    pub const UNKNOWN_DEVICE_ERROR: &str = "org.freedesktop.NetworkManager.UnknownDevice";
    /// Placeholder path meaning "no object" (or "let NetworkManager choose").
    pub const NO_OBJECT: &str = "/";
}

/// NetworkManager device type constants.
pub mod device_type {
    pub const WIFI: u32 = 2;
}

/// Active connection state codes (`NMActiveConnectionState`).
pub mod active_state {
    pub const UNKNOWN: u32 = 0;
    pub const ACTIVATING: u32 = 1;
    pub const ACTIVATED: u32 = 2;
    pub const DEACTIVATING: u32 = 3;
    pub const DEACTIVATED: u32 = 4;
}

/// Wi-Fi mode constants (`NM80211Mode`).
pub mod wifi_mode {
    pub const ADHOC: u32 = 1;
    pub const INFRA: u32 = 2;
    pub const AP: u32 = 3;
}

/// Setting (category) names inside a connection profile.
pub mod setting {
    pub const CONNECTION: &str = "connection";
    pub const BOND: &str = "bond";
    pub const WIRED: &str = "802-3-ethernet";
    pub const WIRELESS: &str = "802-11-wireless";
    pub const IPV4: &str = "ipv4";
    pub const IPV6: &str = "ipv6";

    /// Connection types this crate knows how to build and validate.
    pub const KNOWN_TYPES: [&str; 3] = [BOND, WIRED, WIRELESS];
}

/// Property names inside the `connection` setting.
pub mod connection_key {
    pub const ID: &str = "id";
    pub const UUID: &str = "uuid";
    pub const TYPE: &str = "type";
    pub const STABLE_ID: &str = "stable-id";
    pub const INTERFACE_NAME: &str = "interface-name";
    pub const AUTOCONNECT: &str = "autoconnect";
    pub const AUTOCONNECT_SLAVES: &str = "autoconnect-slaves";
    pub const MASTER: &str = "master";
    pub const SLAVE_TYPE: &str = "slave-type";
}

/// Timeout constants for signal-based waiting.
pub mod timeouts {
    use std::time::Duration;

    /// Maximum time to wait for an activation to reach a terminal state.
    const ACTIVATION_TIMEOUT_SECS: u64 = 30;

    /// Maximum time to wait for an `Update2` completion.
    const UPDATE_TIMEOUT_SECS: u64 = 30;

    /// Returns the default activation timeout.
    pub fn activation_timeout() -> Duration {
        Duration::from_secs(ACTIVATION_TIMEOUT_SECS)
    }

    /// Returns the default update timeout.
    pub fn update_timeout() -> Duration {
        Duration::from_secs(UPDATE_TIMEOUT_SECS)
    }
}

/// Signal strength thresholds for bar display.
///
/// A strength strictly above a threshold earns that many bars.
pub mod signal_strength {
    pub const BAR_4_ABOVE: u8 = 80;
    pub const BAR_3_ABOVE: u8 = 55;
    pub const BAR_2_ABOVE: u8 = 30;
    pub const BAR_1_ABOVE: u8 = 5;
}

/// WiFi frequency constants (MHz)
pub mod frequency {
    pub const BAND_2_4_START: u32 = 2412;
    pub const BAND_2_4_END: u32 = 2472;
    pub const BAND_2_4_CH14: u32 = 2484;
    pub const BAND_5_START: u32 = 5150;
    pub const BAND_5_END: u32 = 5925;
    pub const BAND_6_START: u32 = 5955;
    pub const BAND_6_END: u32 = 7115;
    pub const CHANNEL_SPACING: u32 = 5;
}
