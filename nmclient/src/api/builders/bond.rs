//! Bond master and bond port profiles.
//!
//! A bond is two kinds of profile: one `bond` master that owns the IP
//! configuration, and one `802-3-ethernet` port per member interface that
//! points at the master by interface name.

use std::collections::HashMap;
use zvariant::Value;

use super::connection_builder::ConnectionBuilder;
use crate::api::profile::ConnectionProfile;
use crate::types::constants::{connection_key, setting};

/// Bonding mode used when none is given (802.3ad / LACP).
pub const DEFAULT_BOND_MODE: &str = "4";

/// Builder for a bond master profile.
///
/// Defaults match a typical LACP bond that is brought up manually:
/// `autoconnect=false`, `autoconnect-slaves=1`, IPv4 via DHCP, IPv6 ignored.
///
/// # Example
///
/// ```rust
/// use nmclient::builders::BondBuilder;
///
/// let profile = BondBuilder::new("bond0").mode("active-backup").build();
/// assert_eq!(profile.connection_type(), Some("bond"));
/// assert!(profile.validate().is_ok());
/// ```
#[derive(Debug)]
pub struct BondBuilder {
    inner: ConnectionBuilder,
    options: HashMap<String, String>,
}

impl BondBuilder {
    /// Starts a bond named `name`; the name is both the id and the interface.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let inner = ConnectionBuilder::new(setting::BOND, name.clone())
            .interface_name(name)
            .autoconnect(false)
            .property(
                setting::CONNECTION,
                connection_key::AUTOCONNECT_SLAVES,
                1i32,
            )
            .ipv4_auto()
            .ipv6_ignore();

        let mut options = HashMap::new();
        options.insert("mode".to_string(), DEFAULT_BOND_MODE.to_string());

        Self { inner, options }
    }

    /// Sets the bonding mode (numeric or by name, e.g. "802.3ad").
    pub fn mode(self, mode: impl Into<String>) -> Self {
        self.option("mode", mode)
    }

    /// Sets an arbitrary bonding option such as `miimon`.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Overrides the base builder, e.g. to pin the UUID or IP methods.
    pub fn with_base<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ConnectionBuilder) -> ConnectionBuilder,
    {
        self.inner = f(self.inner);
        self
    }

    /// Builds the master profile.
    pub fn build(self) -> ConnectionProfile {
        self.inner
            .property(setting::BOND, "options", Value::from(self.options))
            .build()
    }
}

/// Builder for a bond port (formerly "slave") ethernet profile.
///
/// The id follows the `bond-<master>-slave-<iface>` naming convention.
#[derive(Debug)]
pub struct BondPortBuilder {
    inner: ConnectionBuilder,
}

impl BondPortBuilder {
    /// Enslaves `iface` to the bond whose interface name is `master`.
    pub fn new(iface: impl Into<String>, master: impl Into<String>) -> Self {
        let iface = iface.into();
        let master = master.into();
        let id = port_id(&master, &iface);

        let inner = ConnectionBuilder::new(setting::WIRED, id)
            .interface_name(iface)
            .autoconnect(false)
            .property(setting::CONNECTION, connection_key::MASTER, master)
            .property(setting::CONNECTION, connection_key::SLAVE_TYPE, setting::BOND)
            .property(setting::WIRED, "duplex", "full");

        Self { inner }
    }

    /// Overrides the base builder.
    pub fn with_base<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ConnectionBuilder) -> ConnectionBuilder,
    {
        self.inner = f(self.inner);
        self
    }

    /// Builds the port profile.
    pub fn build(self) -> ConnectionProfile {
        self.inner.build()
    }
}

/// Display id of the port profile for `iface` in bond `master`.
pub fn port_id(master: &str, iface: &str) -> String {
    format!("bond-{master}-slave-{iface}")
}
