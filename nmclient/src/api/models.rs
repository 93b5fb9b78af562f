use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use thiserror::Error;
use zvariant::{OwnedObjectPath, OwnedValue};

use crate::api::profile::ConnectionProfile;
use crate::types::constants::{active_state, dbus_names, device_type, timeouts};
use crate::types::flags::{ApFlags, ApSecurityFlags, security_summary};
use crate::util::utils::{bars_from_strength, channel_from_freq, decode_ssid, mode_to_string};

/// NetworkManager active connection state.
///
/// These values represent the lifecycle states of an active connection
/// as reported by the NM D-Bus API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveConnectionState {
    /// Connection state is unknown.
    Unknown,
    /// Connection is activating (connecting).
    Activating,
    /// Connection is fully activated (connected).
    Activated,
    /// Connection is deactivating (disconnecting).
    Deactivating,
    /// Connection is fully deactivated (disconnected).
    Deactivated,
    /// Unknown state code not mapped to a specific variant.
    Other(u32),
}

impl ActiveConnectionState {
    /// Whether no further transition is expected for this activation attempt.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Activated | Self::Deactivating | Self::Deactivated)
    }
}

impl From<u32> for ActiveConnectionState {
    fn from(code: u32) -> Self {
        match code {
            active_state::UNKNOWN => Self::Unknown,
            active_state::ACTIVATING => Self::Activating,
            active_state::ACTIVATED => Self::Activated,
            active_state::DEACTIVATING => Self::Deactivating,
            active_state::DEACTIVATED => Self::Deactivated,
            v => Self::Other(v),
        }
    }
}

impl Display for ActiveConnectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Activating => write!(f, "activating"),
            Self::Activated => write!(f, "activated"),
            Self::Deactivating => write!(f, "deactivating"),
            Self::Deactivated => write!(f, "deactivated"),
            Self::Other(v) => write!(f, "unknown state ({v})"),
        }
    }
}

/// Terminal result of watching an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The connection reached `Activated`.
    Connected,
    /// The connection went to `Deactivating` or `Deactivated`.
    Failed(ActiveConnectionState),
}

impl Display for ActivationOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected => write!(f, "connected"),
            Self::Failed(state) => write!(f, "failed ({state})"),
        }
    }
}

/// Path of a saved connection profile in the settings registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileHandle(pub(crate) OwnedObjectPath);

/// Path of a network device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceHandle(pub(crate) OwnedObjectPath);

/// Path of an active connection, valid while an activation is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivationHandle(pub(crate) OwnedObjectPath);

macro_rules! object_handle {
    ($name:ident) => {
        impl $name {
            /// The D-Bus object path.
            pub fn path(&self) -> &OwnedObjectPath {
                &self.0
            }

            /// The D-Bus object path as a string.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl From<OwnedObjectPath> for $name {
            fn from(path: OwnedObjectPath) -> Self {
                Self(path)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.0.as_str())
            }
        }
    };
}

object_handle!(ProfileHandle);
object_handle!(DeviceHandle);
object_handle!(ActivationHandle);

impl DeviceHandle {
    /// The "/" placeholder: lets NetworkManager pick a device on activation.
    pub fn any() -> Self {
        Self(no_object())
    }

    /// Whether this is the "/" placeholder.
    pub fn is_any(&self) -> bool {
        self.0.as_str() == dbus_names::NO_OBJECT
    }
}

/// The "/" object path.
pub(crate) fn no_object() -> OwnedObjectPath {
    OwnedObjectPath::from(zvariant::ObjectPath::from_static_str_unchecked(
        dbus_names::NO_OBJECT,
    ))
}

/// A saved profile together with the handle it lives at.
#[derive(Debug)]
pub struct SavedConnection {
    /// Where the profile lives in the settings registry.
    pub handle: ProfileHandle,
    /// The profile's settings as last read from the daemon.
    pub profile: ConnectionProfile,
}

/// How to pick a saved connection in [`crate::NmClient::find`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionLookup {
    /// Match the display id (`connection.id`).
    Id(String),
    /// Match the UUID (`connection.uuid`).
    Uuid(String),
    /// Match either the display id or the UUID.
    Any(String),
}

impl ConnectionLookup {
    /// Returns `true` if `profile` is selected by this lookup.
    pub fn matches(&self, profile: &ConnectionProfile) -> bool {
        match self {
            Self::Id(id) => profile.id() == Some(id.as_str()),
            Self::Uuid(uuid) => profile.uuid() == Some(uuid.as_str()),
            Self::Any(value) => {
                profile.id() == Some(value.as_str()) || profile.uuid() == Some(value.as_str())
            }
        }
    }

    /// Picks the first connection selected by this lookup, in iteration order.
    pub fn first_match<I>(&self, connections: I) -> Option<SavedConnection>
    where
        I: IntoIterator<Item = SavedConnection>,
    {
        connections
            .into_iter()
            .find(|saved| self.matches(&saved.profile))
    }
}

impl Display for ConnectionLookup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "with id \"{id}\""),
            Self::Uuid(uuid) => write!(f, "with uuid \"{uuid}\""),
            Self::Any(value) => write!(f, "\"{value}\""),
        }
    }
}

/// Result dictionary returned by a successful `Update2` call.
#[derive(Debug, Default)]
pub struct UpdateOutcome {
    /// Extra information from the daemon; currently always empty.
    pub result: HashMap<String, OwnedValue>,
}

impl Display for UpdateOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut entries: Vec<(&String, &OwnedValue)> = self.result.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let entries: Vec<String> = entries
            .into_iter()
            .map(|(key, value)| format!("'{key}': {}", &**value))
            .collect();
        write!(f, "{{{}}}", entries.join(", "))
    }
}

/// Outcome of bumping a profile's stable-id.
#[derive(Debug)]
pub struct StableIdBump {
    /// The updated profile's handle.
    pub handle: ProfileHandle,
    /// Display id of the profile.
    pub id: String,
    /// UUID of the profile.
    pub uuid: String,
    /// The stable-id before the update.
    pub previous: String,
    /// The stable-id that was written.
    pub stable_id: String,
    /// What the daemon returned.
    pub outcome: UpdateOutcome,
}

/// Handles created by [`crate::NmClient::create_bond`].
#[derive(Debug)]
pub struct BondSetup {
    /// The bond master profile.
    pub master: ProfileHandle,
    /// One port profile per member interface, in argument order.
    pub ports: Vec<ProfileHandle>,
    /// The in-flight activation of the master.
    pub activation: ActivationHandle,
}

/// Snapshot of a network device.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Where the device lives on the bus.
    pub handle: DeviceHandle,
    /// Interface name (e.g. "wlan0").
    pub interface: String,
    /// Kernel driver, if reported.
    pub driver: Option<String>,
    /// Raw `NMDeviceType` code.
    pub device_type: u32,
    /// The access point a Wi-Fi device is associated with, if any.
    ///
    /// Always `None` for non-Wi-Fi devices.
    pub active_access_point: Option<AccessPointInfo>,
}

impl DeviceInfo {
    /// Whether this is a Wi-Fi device.
    pub fn is_wifi(&self) -> bool {
        self.device_type == device_type::WIFI
    }
}

/// Snapshot of a scanned access point.
///
/// Every field is re-read from the daemon on each query; nothing is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPointInfo {
    /// Raw SSID bytes as broadcast.
    pub ssid_bytes: Vec<u8>,
    /// BSSID (MAC address).
    pub bssid: String,
    /// Frequency in MHz.
    pub frequency: u32,
    /// Raw `NM80211Mode` code.
    pub mode: u32,
    /// General capability flags.
    pub flags: ApFlags,
    /// WPA (version 1) security flags.
    pub wpa_flags: ApSecurityFlags,
    /// RSN (WPA2/3) security flags.
    pub rsn_flags: ApSecurityFlags,
    /// Signal strength, 0-100.
    pub strength: u8,
}

impl AccessPointInfo {
    /// SSID decoded as UTF-8; invalid sequences become U+FFFD.
    pub fn ssid(&self) -> String {
        decode_ssid(&self.ssid_bytes).into_owned()
    }

    /// Channel number for [`Self::frequency`], if it falls in a known band.
    pub fn channel(&self) -> Option<u16> {
        channel_from_freq(self.frequency)
    }

    /// `INFRA`, `ADHOC`, `AP` or `UNKNOWN`.
    pub fn mode_label(&self) -> &'static str {
        mode_to_string(self.mode)
    }

    /// `PRIVACY` or `NONE`.
    pub fn flags_label(&self) -> &'static str {
        self.flags.label()
    }

    /// Composite security summary, e.g. `WPA1 WPA2 802.1X`.
    pub fn security(&self) -> String {
        security_summary(self.flags, self.wpa_flags, self.rsn_flags)
    }

    /// Signal strength as four bar glyphs.
    pub fn bars(&self) -> &'static str {
        bars_from_strength(self.strength)
    }
}

/// Timeouts applied to the two waits this crate performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// How long to wait for an activation to reach a terminal state.
    pub activation_timeout: Duration,
    /// How long to wait for an `Update2` completion.
    pub update_timeout: Duration,
}

impl TimeoutConfig {
    /// Creates a config with the default timeouts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the activation timeout.
    #[must_use]
    pub fn with_activation_timeout(mut self, timeout: Duration) -> Self {
        self.activation_timeout = timeout;
        self
    }

    /// Overrides the update timeout.
    #[must_use]
    pub fn with_update_timeout(mut self, timeout: Duration) -> Self {
        self.update_timeout = timeout;
        self
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            activation_timeout: timeouts::activation_timeout(),
            update_timeout: timeouts::update_timeout(),
        }
    }
}

/// Errors that can occur while talking to NetworkManager.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A D-Bus communication error occurred.
    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    /// A settings value could not be converted.
    #[error("invalid setting value: {0}")]
    Variant(#[from] zvariant::Error),

    /// No device or connection matched.
    #[error("not found: {0}")]
    NotFound(String),

    /// The profile lacks a setting the operation needs.
    #[error("missing setting: {0}")]
    MissingSetting(String),

    /// The profile failed validation before submission.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// The profile has no stable-id to increment.
    #[error("connection {0} has no stable-id set")]
    NoStableId(String),

    /// The daemon refused to add the profile.
    #[error("{0}")]
    Registration(String),

    /// The daemon refused the update.
    #[error("{0}")]
    Update(String),

    /// A wait exceeded its configured timeout.
    #[error("operation timed out")]
    Timeout,

    /// A background task was requested outside a Tokio runtime.
    #[error("no Tokio runtime available: {0}")]
    NoRuntime(String),

    /// A wait ended without a terminal event.
    #[error("stuck: {0}")]
    Stuck(String),

    /// The caller passed malformed arguments.
    #[error("usage: {0}")]
    Usage(String),
}

/// Extracts the daemon's own message from a failed method call.
///
/// Non-method errors fall back to their `Display` text.
pub(crate) fn daemon_message(err: &zbus::Error) -> String {
    match err {
        zbus::Error::MethodError(_, Some(msg), _) => msg.clone(),
        zbus::Error::MethodError(name, None, _) => name.to_string(),
        other => other.to_string(),
    }
}
