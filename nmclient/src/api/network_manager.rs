use std::time::Duration;
use zbus::Connection;

use crate::Result;
use crate::api::models::{
    AccessPointInfo, ActivationHandle, ActivationOutcome, BondSetup, ConnectionLookup,
    DeviceHandle, DeviceInfo, ProfileHandle, SavedConnection, StableIdBump, TimeoutConfig,
};
use crate::api::profile::ConnectionProfile;
use crate::core::connection::{activate, create_bond};
use crate::core::connection_settings::{
    PendingUpdate, bump_stable_id, create, find, list, read_profile, update,
};
use crate::core::device::{
    access_points, active_access_point, device_info, resolve_device, wifi_devices,
};
use crate::core::state_wait::await_state;
use crate::types::flags::Update2Flags;

/// High-level interface to NetworkManager over D-Bus.
///
/// Owns one system bus connection and the timeouts used by the two waits
/// this crate performs (activation and `Update2` completion).
///
/// # Creating an Instance
///
/// ```no_run
/// use nmclient::NmClient;
///
/// # async fn example() -> nmclient::Result<()> {
/// let nm = NmClient::new().await?;
/// # Ok(())
/// # }
/// ```
///
/// # Examples
///
/// ## Bond setup
///
/// ```no_run
/// use nmclient::{ActivationOutcome, NmClient};
///
/// # async fn example() -> nmclient::Result<()> {
/// let nm = NmClient::new().await?;
///
/// let ports = vec!["eth0".to_string(), "eth1".to_string()];
/// let setup = nm.create_bond("bond0", &ports).await?;
///
/// match nm.await_state(&setup.activation).await? {
///     ActivationOutcome::Connected => println!("bond0 is up"),
///     ActivationOutcome::Failed(state) => println!("bond0 failed: {state}"),
/// }
/// # Ok(())
/// # }
/// ```
///
/// ## Current association
///
/// ```no_run
/// use nmclient::NmClient;
///
/// # async fn example() -> nmclient::Result<()> {
/// let nm = NmClient::new().await?;
///
/// let dev = nm.resolve_device("wlan0").await?;
/// if let Some(ap) = nm.get_active_access_point(&dev).await? {
///     println!("associated to '{}' ({})", ap.ssid(), ap.bssid);
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Thread Safety
///
/// `NmClient` is `Clone` and can be shared across async tasks.
/// Each clone shares the same underlying D-Bus connection.
#[derive(Debug, Clone)]
pub struct NmClient {
    conn: Connection,
    timeouts: TimeoutConfig,
}

impl NmClient {
    /// Creates a new `NmClient` connected to the system D-Bus.
    pub async fn new() -> Result<Self> {
        Self::with_config(TimeoutConfig::default()).await
    }

    /// Creates a new `NmClient` with custom timeouts.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nmclient::{NmClient, TimeoutConfig};
    /// use std::time::Duration;
    ///
    /// # async fn example() -> nmclient::Result<()> {
    /// let config = TimeoutConfig::new()
    ///     .with_activation_timeout(Duration::from_secs(60));
    /// let nm = NmClient::with_config(config).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_config(timeouts: TimeoutConfig) -> Result<Self> {
        let conn = Connection::system().await?;
        Ok(Self { conn, timeouts })
    }

    /// Wraps an existing bus connection.
    pub fn from_connection(conn: Connection, timeouts: TimeoutConfig) -> Self {
        Self { conn, timeouts }
    }

    /// Returns the current timeout configuration.
    pub fn timeout_config(&self) -> TimeoutConfig {
        self.timeouts
    }

    /// Validates and persists a new profile.
    ///
    /// # Errors
    ///
    /// - `ClientError::MissingSetting` / `ClientError::InvalidProfile` if the
    ///   profile fails validation; nothing is sent to the daemon.
    /// - `ClientError::Registration` with the daemon's message if it refuses
    ///   the profile.
    pub async fn create(&self, profile: &ConnectionProfile) -> Result<ProfileHandle> {
        create(&self.conn, profile).await
    }

    /// Lists all saved profiles in registry order.
    pub async fn list(&self) -> Result<Vec<SavedConnection>> {
        list(&self.conn).await
    }

    /// Reads one saved profile.
    pub async fn get_settings(&self, handle: &ProfileHandle) -> Result<ConnectionProfile> {
        read_profile(&self.conn, handle).await
    }

    /// Finds the first saved profile selected by `lookup`.
    ///
    /// Returns `Ok(None)` when nothing matches.
    pub async fn find(&self, lookup: &ConnectionLookup) -> Result<Option<SavedConnection>> {
        find(&self.conn, lookup).await
    }

    /// Starts an atomic `Update2` of a saved profile.
    ///
    /// The call runs in the background; await [`PendingUpdate::wait`] for
    /// the result. Must be called from within a Tokio runtime.
    pub async fn update(
        &self,
        handle: &ProfileHandle,
        profile: &ConnectionProfile,
        flags: Update2Flags,
    ) -> Result<PendingUpdate> {
        update(&self.conn, handle, profile, flags).await
    }

    /// Increments the stable-id of the first profile matching `lookup`.
    ///
    /// Waits up to the configured update timeout for the daemon's reply.
    ///
    /// # Errors
    ///
    /// - `ClientError::NotFound` if no profile matches
    /// - `ClientError::NoStableId` if the profile has no stable-id
    /// - `ClientError::Update` if the daemon rejects the update
    pub async fn bump_stable_id(&self, lookup: &ConnectionLookup) -> Result<StableIdBump> {
        bump_stable_id(&self.conn, lookup, self.timeouts.update_timeout).await
    }

    /// Resolves a device by interface name.
    ///
    /// Returns `ClientError::NotFound` if no device has that interface.
    pub async fn resolve_device(&self, iface: &str) -> Result<DeviceHandle> {
        resolve_device(&self.conn, iface).await
    }

    /// Reads interface, driver, type and active access point of a device.
    pub async fn device_info(&self, device: &DeviceHandle) -> Result<DeviceInfo> {
        device_info(&self.conn, device).await
    }

    /// All Wi-Fi devices.
    pub async fn wifi_devices(&self) -> Result<Vec<DeviceHandle>> {
        wifi_devices(&self.conn).await
    }

    /// The access point a Wi-Fi device is associated with, if any.
    pub async fn get_active_access_point(
        &self,
        device: &DeviceHandle,
    ) -> Result<Option<AccessPointInfo>> {
        active_access_point(&self.conn, device).await
    }

    /// Every access point visible to a Wi-Fi device.
    pub async fn access_points(&self, device: &DeviceHandle) -> Result<Vec<AccessPointInfo>> {
        access_points(&self.conn, device).await
    }

    /// Activates a saved profile on a device, or on any device with
    /// [`DeviceHandle::any`].
    pub async fn activate(
        &self,
        profile: &ProfileHandle,
        device: &DeviceHandle,
    ) -> Result<ActivationHandle> {
        activate(&self.conn, profile, device).await
    }

    /// Waits for an activation to reach a terminal state, using the
    /// configured activation timeout.
    pub async fn await_state(&self, activation: &ActivationHandle) -> Result<ActivationOutcome> {
        self.await_state_for(activation, self.timeouts.activation_timeout)
            .await
    }

    /// Same as [`Self::await_state`] with an explicit timeout.
    pub async fn await_state_for(
        &self,
        activation: &ActivationHandle,
        timeout: Duration,
    ) -> Result<ActivationOutcome> {
        await_state(&self.conn, activation, timeout).await
    }

    /// Creates a bond master named `name` with one port per interface in
    /// `ifaces`, then activates the master on any device.
    ///
    /// The returned [`BondSetup::activation`] can be passed to
    /// [`Self::await_state`].
    pub async fn create_bond(&self, name: &str, ifaces: &[String]) -> Result<BondSetup> {
        create_bond(&self.conn, name, ifaces).await
    }
}
