//! Connection profiles as exchanged with the settings registry.
//!
//! A profile is a two-level dictionary: setting name (`connection`,
//! `bond`, `802-3-ethernet`, `ipv4`, ...) to property name to value. This is
//! the `a{sa{sv}}` shape NetworkManager uses on the wire, so a profile can be
//! handed to `AddConnection` or `Update2` without conversion.

use std::collections::HashMap;
use zvariant::{OwnedValue, Value};

use crate::Result;
use crate::api::models::ClientError;
use crate::types::constants::{connection_key, setting};

/// Settings of one connection profile.
#[derive(Debug, Default, PartialEq)]
pub struct ConnectionProfile {
    settings: HashMap<String, HashMap<String, Value<'static>>>,
}

impl ConnectionProfile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a profile from the dictionary returned by `GetSettings`.
    pub fn from_dbus(raw: HashMap<String, HashMap<String, OwnedValue>>) -> Self {
        let settings = raw
            .into_iter()
            .map(|(name, props)| {
                let props = props
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect();
                (name, props)
            })
            .collect();
        Self { settings }
    }

    /// The wire representation, ready to pass to `AddConnection`/`Update2`.
    pub fn as_dbus(&self) -> &HashMap<String, HashMap<String, Value<'static>>> {
        &self.settings
    }

    /// Deep copy of the profile.
    ///
    /// Fails only if a value holds a file descriptor that cannot be duplicated.
    pub fn try_clone(&self) -> Result<Self> {
        let mut settings = HashMap::with_capacity(self.settings.len());
        for (name, props) in &self.settings {
            let mut cloned = HashMap::with_capacity(props.len());
            for (key, value) in props {
                cloned.insert(key.clone(), value.try_clone()?);
            }
            settings.insert(name.clone(), cloned);
        }
        Ok(Self { settings })
    }

    /// Sets one property, creating the setting if needed.
    pub fn set(
        &mut self,
        setting_name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value<'static>>,
    ) -> &mut Self {
        self.settings
            .entry(setting_name.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Whether a setting of this name is present (possibly empty).
    pub fn has_setting(&self, setting_name: &str) -> bool {
        self.settings.contains_key(setting_name)
    }

    /// Ensures a setting is present, even if it carries no properties.
    pub fn ensure_setting(&mut self, setting_name: impl Into<String>) -> &mut Self {
        self.settings.entry(setting_name.into()).or_default();
        self
    }

    /// All properties of one setting.
    pub fn setting(&self, setting_name: &str) -> Option<&HashMap<String, Value<'static>>> {
        self.settings.get(setting_name)
    }

    /// One property value.
    pub fn get(&self, setting_name: &str, key: &str) -> Option<&Value<'static>> {
        self.settings.get(setting_name)?.get(key)
    }

    /// One property value, if it is a string.
    pub fn get_str(&self, setting_name: &str, key: &str) -> Option<&str> {
        match self.get(setting_name, key)? {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// `connection.id`
    pub fn id(&self) -> Option<&str> {
        self.get_str(setting::CONNECTION, connection_key::ID)
    }

    /// `connection.uuid`
    pub fn uuid(&self) -> Option<&str> {
        self.get_str(setting::CONNECTION, connection_key::UUID)
    }

    /// `connection.type`
    pub fn connection_type(&self) -> Option<&str> {
        self.get_str(setting::CONNECTION, connection_key::TYPE)
    }

    /// `connection.stable-id`
    pub fn stable_id(&self) -> Option<&str> {
        self.get_str(setting::CONNECTION, connection_key::STABLE_ID)
    }

    /// Checks the `connection` setting before the profile is submitted.
    ///
    /// Requires `uuid`, `id` and `type` string properties, a `type` this crate
    /// knows, and a setting named after that type.
    pub fn validate(&self) -> Result<()> {
        if !self.has_setting(setting::CONNECTION) {
            return Err(ClientError::MissingSetting(setting::CONNECTION.into()));
        }

        for key in [connection_key::UUID, connection_key::ID, connection_key::TYPE] {
            match self.get_str(setting::CONNECTION, key) {
                Some(v) if !v.is_empty() => {}
                _ => {
                    return Err(ClientError::InvalidProfile(format!(
                        "connection.{key}: property is missing"
                    )));
                }
            }
        }

        let kind = self.connection_type().unwrap_or_default();
        if !setting::KNOWN_TYPES.contains(&kind) {
            return Err(ClientError::InvalidProfile(format!(
                "connection.type: unsupported connection type '{kind}'"
            )));
        }
        if !self.has_setting(kind) {
            return Err(ClientError::MissingSetting(kind.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ethernet() -> ConnectionProfile {
        let mut p = ConnectionProfile::new();
        p.set("connection", "id", "eth")
            .set("connection", "uuid", "7d2b0f7e-0000-4000-8000-000000000001")
            .set("connection", "type", "802-3-ethernet")
            .set("802-3-ethernet", "duplex", "full");
        p
    }

    #[test]
    fn typed_getters() {
        let mut p = ethernet();
        assert_eq!(p.id(), Some("eth"));
        assert_eq!(p.connection_type(), Some("802-3-ethernet"));
        assert_eq!(p.stable_id(), None);

        p.set("connection", "stable-id", "eth-2");
        assert_eq!(p.stable_id(), Some("eth-2"));
    }

    #[test]
    fn get_str_rejects_non_strings() {
        let mut p = ethernet();
        p.set("connection", "autoconnect", false);
        assert_eq!(p.get_str("connection", "autoconnect"), None);
        assert_eq!(p.get("connection", "autoconnect"), Some(&Value::from(false)));
    }

    #[test]
    fn clone_is_independent() {
        let original = ethernet();
        let mut copy = original.try_clone().unwrap();
        copy.set("connection", "stable-id", "x-1");

        assert_eq!(original.stable_id(), None);
        assert_eq!(copy.stable_id(), Some("x-1"));
        assert_eq!(copy.id(), original.id());
    }

    #[test]
    fn validate_accepts_complete_profile() {
        assert!(ethernet().validate().is_ok());
    }

    #[test]
    fn validate_requires_connection_setting() {
        let mut p = ConnectionProfile::new();
        p.set("802-3-ethernet", "duplex", "full");
        assert!(matches!(
            p.validate(),
            Err(ClientError::MissingSetting(s)) if s == "connection"
        ));
    }

    #[test]
    fn validate_requires_uuid() {
        let mut p = ConnectionProfile::new();
        p.set("connection", "id", "eth")
            .set("connection", "type", "802-3-ethernet")
            .ensure_setting("802-3-ethernet");
        assert!(matches!(p.validate(), Err(ClientError::InvalidProfile(_))));
    }

    #[test]
    fn validate_rejects_unknown_type() {
        let mut p = ethernet();
        p.set("connection", "type", "vlan");
        assert!(matches!(p.validate(), Err(ClientError::InvalidProfile(_))));
    }

    #[test]
    fn validate_requires_type_section() {
        let mut p = ConnectionProfile::new();
        p.set("connection", "id", "bond0")
            .set("connection", "uuid", "7d2b0f7e-0000-4000-8000-000000000002")
            .set("connection", "type", "bond");
        assert!(matches!(
            p.validate(),
            Err(ClientError::MissingSetting(s)) if s == "bond"
        ));
    }
}
