//! Core connection builder for NetworkManager settings.
//!
//! `ConnectionBuilder` owns the sections every profile shares (`connection`,
//! `ipv4`, `ipv6`). Type-specific builders such as [`BondBuilder`] wrap it
//! and add their own sections.
//!
//! # Example
//!
//! ```rust
//! use nmclient::builders::ConnectionBuilder;
//!
//! let profile = ConnectionBuilder::new("802-3-ethernet", "uplink")
//!     .interface_name("eth0")
//!     .autoconnect(false)
//!     .ipv4_auto()
//!     .ipv6_ignore()
//!     .section("802-3-ethernet")
//!     .build();
//!
//! assert!(profile.validate().is_ok());
//! ```
//!
//! [`BondBuilder`]: super::BondBuilder

use uuid::Uuid;
use zvariant::Value;

use crate::api::profile::ConnectionProfile;
use crate::types::constants::{connection_key, setting};

/// Core connection settings builder.
///
/// Every builder starts with a `connection` section carrying `type`, `id`
/// and a fresh random `uuid`, so the result always passes
/// [`ConnectionProfile::validate`] once the type's own section is added.
#[derive(Debug)]
pub struct ConnectionBuilder {
    profile: ConnectionProfile,
}

impl ConnectionBuilder {
    /// Creates a new connection builder with the specified type and ID.
    ///
    /// # Arguments
    ///
    /// * `connection_type` - NetworkManager connection type (e.g. "bond",
    ///   "802-3-ethernet", "802-11-wireless")
    /// * `id` - Human-readable connection identifier
    pub fn new(connection_type: &str, id: impl Into<String>) -> Self {
        let mut profile = ConnectionProfile::new();
        profile
            .set(setting::CONNECTION, connection_key::TYPE, connection_type.to_string())
            .set(setting::CONNECTION, connection_key::ID, id.into())
            .set(setting::CONNECTION, connection_key::UUID, Uuid::new_v4().to_string());

        Self { profile }
    }

    /// Sets a specific UUID for the connection.
    ///
    /// By default, a random UUID is generated. Use this to specify a deterministic
    /// UUID for testing or when recreating existing connections.
    pub fn uuid(mut self, uuid: Uuid) -> Self {
        self.profile
            .set(setting::CONNECTION, connection_key::UUID, uuid.to_string());
        self
    }

    /// Restricts the connection to one interface (e.g. "bond0", "eth0").
    pub fn interface_name(mut self, name: impl Into<String>) -> Self {
        self.profile
            .set(setting::CONNECTION, connection_key::INTERFACE_NAME, name.into());
        self
    }

    /// Enables or disables automatic connection on boot/availability.
    pub fn autoconnect(mut self, enabled: bool) -> Self {
        self.profile
            .set(setting::CONNECTION, connection_key::AUTOCONNECT, enabled);
        self
    }

    /// Sets the stable-id used for deterministic address generation.
    pub fn stable_id(mut self, stable_id: impl Into<String>) -> Self {
        self.profile
            .set(setting::CONNECTION, connection_key::STABLE_ID, stable_id.into());
        self
    }

    /// Configures IPv4 to use automatic configuration (DHCP).
    pub fn ipv4_auto(mut self) -> Self {
        self.profile.set(setting::IPV4, "method", "auto");
        self
    }

    /// Disables IPv4 for this connection.
    pub fn ipv4_disabled(mut self) -> Self {
        self.profile.set(setting::IPV4, "method", "disabled");
        self
    }

    /// Configures IPv6 to use automatic configuration (SLAAC/DHCPv6).
    pub fn ipv6_auto(mut self) -> Self {
        self.profile.set(setting::IPV6, "method", "auto");
        self
    }

    /// Leaves IPv6 unmanaged for this connection.
    pub fn ipv6_ignore(mut self) -> Self {
        self.profile.set(setting::IPV6, "method", "ignore");
        self
    }

    /// Ensures a section exists, even with no properties.
    pub fn section(mut self, name: &str) -> Self {
        self.profile.ensure_setting(name);
        self
    }

    /// Sets one property in any section.
    pub fn property(
        mut self,
        section: &str,
        key: &str,
        value: impl Into<Value<'static>>,
    ) -> Self {
        self.profile.set(section, key, value);
        self
    }

    /// Builds and returns the final profile.
    pub fn build(self) -> ConnectionProfile {
        self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_basic_connection() {
        let profile = ConnectionBuilder::new("802-3-ethernet", "TestWired").build();

        assert!(profile.has_setting("connection"));
        assert_eq!(profile.connection_type(), Some("802-3-ethernet"));
        assert_eq!(profile.id(), Some("TestWired"));
        assert!(profile.uuid().is_some());
    }

    #[test]
    fn generates_distinct_uuids() {
        let a = ConnectionBuilder::new("bond", "a").build();
        let b = ConnectionBuilder::new("bond", "a").build();
        assert_ne!(a.uuid(), b.uuid());
    }

    #[test]
    fn sets_custom_uuid() {
        let test_uuid = Uuid::new_v4();
        let profile = ConnectionBuilder::new("802-3-ethernet", "eth0")
            .uuid(test_uuid)
            .build();

        assert_eq!(profile.uuid(), Some(test_uuid.to_string().as_str()));
    }

    #[test]
    fn sets_interface_name_and_autoconnect() {
        let profile = ConnectionBuilder::new("802-3-ethernet", "MyConnection")
            .interface_name("eth0")
            .autoconnect(false)
            .build();

        assert_eq!(profile.get_str("connection", "interface-name"), Some("eth0"));
        assert_eq!(
            profile.get("connection", "autoconnect"),
            Some(&Value::from(false))
        );
    }

    #[test]
    fn configures_ip_methods() {
        let profile = ConnectionBuilder::new("802-3-ethernet", "eth0")
            .ipv4_auto()
            .ipv6_ignore()
            .build();

        assert_eq!(profile.get_str("ipv4", "method"), Some("auto"));
        assert_eq!(profile.get_str("ipv6", "method"), Some("ignore"));

        let profile = ConnectionBuilder::new("802-3-ethernet", "eth0")
            .ipv4_disabled()
            .ipv6_auto()
            .build();

        assert_eq!(profile.get_str("ipv4", "method"), Some("disabled"));
        assert_eq!(profile.get_str("ipv6", "method"), Some("auto"));
    }

    #[test]
    fn type_section_makes_profile_valid() {
        let builder = ConnectionBuilder::new("802-3-ethernet", "eth0");
        let incomplete = ConnectionBuilder::new("802-3-ethernet", "eth0").build();
        assert!(incomplete.validate().is_err());

        let profile = builder.section("802-3-ethernet").build();
        assert!(profile.validate().is_ok());
    }
}
