//! Main NetworkManager proxy.

use zbus::proxy;
use zvariant::OwnedObjectPath;

/// Proxy for the main NetworkManager interface.
///
/// Provides device lookup and connection activation.
#[proxy(
    interface = "org.freedesktop.NetworkManager",
    default_service = "org.freedesktop.NetworkManager",
    default_path = "/org/freedesktop/NetworkManager"
)]
pub trait NM {
    /// Returns paths to all network devices.
    fn get_devices(&self) -> zbus::Result<Vec<OwnedObjectPath>>;

    /// Returns the path of the device whose IP interface is `iface`.
    ///
    /// Fails with `org.freedesktop.NetworkManager.UnknownDevice` when no
    /// such device exists.
    fn get_device_by_ip_iface(&self, iface: &str) -> zbus::Result<OwnedObjectPath>;

    /// Activates an existing saved connection.
    ///
    /// `device` and `specific_object` may be "/" to let NetworkManager pick.
    /// Returns the path of the new active connection.
    fn activate_connection(
        &self,
        connection: &OwnedObjectPath,
        device: &OwnedObjectPath,
        specific_object: &OwnedObjectPath,
    ) -> zbus::Result<OwnedObjectPath>;
}
