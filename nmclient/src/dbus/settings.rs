//! NetworkManager Settings and Settings.Connection proxies.

use std::collections::HashMap;
use zbus::{Result, proxy};
use zvariant::{OwnedObjectPath, OwnedValue, Value};

/// Proxy for the settings registry.
///
/// Lists and adds persistent connection profiles.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Settings",
    default_service = "org.freedesktop.NetworkManager",
    default_path = "/org/freedesktop/NetworkManager/Settings"
)]
pub trait NMSettings {
    /// Paths of all saved connection profiles, in registry order.
    fn list_connections(&self) -> Result<Vec<OwnedObjectPath>>;

    /// Persists a new profile and returns its path.
    fn add_connection(
        &self,
        connection: &HashMap<String, HashMap<String, Value<'_>>>,
    ) -> Result<OwnedObjectPath>;
}

/// Proxy for a single saved connection profile.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Settings.Connection",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMSettingsConnection {
    /// The profile's settings, without secrets.
    fn get_settings(&self) -> Result<HashMap<String, HashMap<String, OwnedValue>>>;

    /// Replaces the profile atomically.
    ///
    /// `flags` are `NMSettingsUpdate2Flags`; `args` is currently always empty.
    /// The daemon either applies the whole profile or rejects it.
    fn update2(
        &self,
        settings: &HashMap<String, HashMap<String, Value<'_>>>,
        flags: u32,
        args: HashMap<String, Value<'_>>,
    ) -> Result<HashMap<String, OwnedValue>>;
}
