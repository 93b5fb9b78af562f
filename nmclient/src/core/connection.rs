//! Connection activation and bond setup.

use log::{debug, info};
use zbus::Connection;

use crate::Result;
use crate::api::builders::bond::{BondBuilder, BondPortBuilder};
use crate::api::models::{
    ActivationHandle, BondSetup, ClientError, DeviceHandle, ProfileHandle, no_object,
};
use crate::core::connection_settings::create;
use crate::dbus::NMProxy;

/// Activates a saved profile on `device`.
///
/// `device` may be [`DeviceHandle::any`] to let NetworkManager pick one.
/// The specific object is always "/".
pub(crate) async fn activate(
    conn: &Connection,
    profile: &ProfileHandle,
    device: &DeviceHandle,
) -> Result<ActivationHandle> {
    let nm = NMProxy::new(conn).await?;

    debug!("Activating {profile} on device {device}");
    let active = nm
        .activate_connection(profile.path(), device.path(), &no_object())
        .await?;

    info!("Activation started: {}", active.as_str());
    Ok(ActivationHandle::from(active))
}

/// Creates a bond master plus one port per interface, then activates the master.
///
/// Profiles are added in order: master first, then ports in argument order.
/// A failure stops the sequence; profiles already added stay registered.
pub(crate) async fn create_bond(
    conn: &Connection,
    name: &str,
    ifaces: &[String],
) -> Result<BondSetup> {
    if name.is_empty() {
        return Err(ClientError::Usage("bond name must not be empty".into()));
    }
    if ifaces.is_empty() {
        return Err(ClientError::Usage(
            "a bond needs at least one port interface".into(),
        ));
    }

    debug!("Creating bond connection: {name}");
    let master = create(conn, &BondBuilder::new(name).build()).await?;

    let mut ports = Vec::with_capacity(ifaces.len());
    for iface in ifaces {
        debug!("Creating port connection for {iface}");
        let port = create(conn, &BondPortBuilder::new(iface, name).build()).await?;
        ports.push(port);
    }

    let activation = activate(conn, &master, &DeviceHandle::any()).await?;

    Ok(BondSetup {
        master,
        ports,
        activation,
    })
}
