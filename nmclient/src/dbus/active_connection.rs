//! NetworkManager Active Connection proxy.

use zbus::{Result, proxy};

/// Proxy for active connection interface.
///
/// Only the property needed to follow an activation is declared.
/// Changes to `State` are observed through the standard
/// `org.freedesktop.DBus.Properties.PropertiesChanged` signal on the same
/// object, see [`crate::core::state_wait`].
#[proxy(
    interface = "org.freedesktop.NetworkManager.Connection.Active",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMActiveConnection {
    /// Current state of the active connection.
    ///
    /// Values:
    /// - 0: Unknown
    /// - 1: Activating
    /// - 2: Activated
    /// - 3: Deactivating
    /// - 4: Deactivated
    #[zbus(property)]
    fn state(&self) -> Result<u32>;
}
