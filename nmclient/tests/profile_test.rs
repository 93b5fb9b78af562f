//! Tests for profile validation, builders and connection lookup.
//!
//! These run without a bus: profiles are checked before any D-Bus call.

use nmclient::builders::{BondBuilder, BondPortBuilder, ConnectionBuilder};
use nmclient::{ClientError, ConnectionLookup, ConnectionProfile, ProfileHandle, SavedConnection};
use zvariant::OwnedObjectPath;

fn saved(n: u32, id: &str, uuid: &str) -> SavedConnection {
    let path = OwnedObjectPath::try_from(format!("/org/freedesktop/NetworkManager/Settings/{n}"))
        .unwrap();
    let profile = ConnectionBuilder::new("802-3-ethernet", id)
        .uuid(uuid.parse().unwrap())
        .section("802-3-ethernet")
        .build();
    SavedConnection {
        handle: ProfileHandle::from(path),
        profile,
    }
}

const UUID_A: &str = "0c9a4b4e-46a0-4b55-8d5c-2a1e1b7f0001";
const UUID_B: &str = "0c9a4b4e-46a0-4b55-8d5c-2a1e1b7f0002";

#[test]
fn test_find_in_empty_list() {
    let lookup = ConnectionLookup::Any("eth0".into());
    assert!(lookup.first_match(Vec::new()).is_none());
}

#[test]
fn test_find_returns_first_duplicate() {
    let list = vec![saved(1, "eth0", UUID_A), saved(2, "eth0", UUID_B)];

    let found = ConnectionLookup::Id("eth0".into())
        .first_match(list)
        .unwrap();
    assert_eq!(
        found.handle.as_str(),
        "/org/freedesktop/NetworkManager/Settings/1"
    );
}

#[test]
fn test_find_by_uuid() {
    let list = vec![saved(1, "eth0", UUID_A), saved(2, "eth1", UUID_B)];

    let found = ConnectionLookup::Uuid(UUID_B.into())
        .first_match(list)
        .unwrap();
    assert_eq!(found.profile.id(), Some("eth1"));
}

#[test]
fn test_typed_lookup_does_not_cross_fields() {
    let list = vec![saved(1, "eth0", UUID_A)];

    assert!(
        ConnectionLookup::Id(UUID_A.into())
            .first_match(list)
            .is_none()
    );
}

#[test]
fn test_untyped_lookup_matches_id_or_uuid() {
    let by_id = vec![saved(1, "eth0", UUID_A)];
    assert!(ConnectionLookup::Any("eth0".into()).first_match(by_id).is_some());

    let by_uuid = vec![saved(1, "eth0", UUID_A)];
    assert!(ConnectionLookup::Any(UUID_A.into()).first_match(by_uuid).is_some());
}

#[test]
fn test_lookup_display() {
    assert_eq!(
        ConnectionLookup::Id("x".into()).to_string(),
        "with id \"x\""
    );
    assert_eq!(ConnectionLookup::Any("x".into()).to_string(), "\"x\"");
}

#[test]
fn test_bond_and_ports_validate() {
    assert!(BondBuilder::new("bond0").build().validate().is_ok());
    for iface in ["eth0", "eth1"] {
        let port = BondPortBuilder::new(iface, "bond0").build();
        assert!(port.validate().is_ok());
        assert_eq!(port.id(), Some(format!("bond-bond0-slave-{iface}").as_str()));
    }
}

#[test]
fn test_builders_use_fresh_uuids() {
    let a = BondBuilder::new("bond0").build();
    let b = BondBuilder::new("bond0").build();
    assert_ne!(a.uuid(), b.uuid());
}

#[test]
fn test_validation_rejects_missing_connection_setting() {
    let mut p = ConnectionProfile::new();
    p.set("bond", "options", "mode=4");
    assert!(matches!(
        p.validate(),
        Err(ClientError::MissingSetting(s)) if s == "connection"
    ));
}

#[test]
fn test_validation_rejects_missing_fields() {
    for missing in ["id", "uuid", "type"] {
        let mut p = ConnectionProfile::new();
        for (key, value) in [("id", "eth0"), ("uuid", UUID_A), ("type", "802-3-ethernet")] {
            if key != missing {
                p.set("connection", key, value);
            }
        }
        p.ensure_setting("802-3-ethernet");

        assert!(
            matches!(p.validate(), Err(ClientError::InvalidProfile(_))),
            "profile without {missing} was accepted"
        );
    }
}

#[test]
fn test_validation_rejects_unknown_type() {
    let p = ConnectionBuilder::new("vpn", "corp").section("vpn").build();
    assert!(matches!(p.validate(), Err(ClientError::InvalidProfile(_))));
}

#[test]
fn test_validation_rejects_type_without_section() {
    let p = ConnectionBuilder::new("bond", "bond0").build();
    assert!(matches!(
        p.validate(),
        Err(ClientError::MissingSetting(s)) if s == "bond"
    ));
}
