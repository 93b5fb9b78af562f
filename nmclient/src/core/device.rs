//! Network device lookup and Wi-Fi state.
//!
//! Provides functions for resolving devices by interface name, reading
//! device properties and enumerating access points. Every call re-reads
//! the daemon's properties; nothing is cached between calls.

use log::{debug, warn};
use zbus::Connection;

use crate::Result;
use crate::api::models::{AccessPointInfo, ClientError, DeviceHandle, DeviceInfo};
use crate::dbus::{NMDeviceProxy, NMProxy, NMWirelessProxy};
use crate::types::constants::{dbus_names, device_type};
use crate::util::utils::read_access_point;

/// Resolves a device by its IP interface name (e.g. `wlan0`).
///
/// NetworkManager's `UnknownDevice` error becomes [`ClientError::NotFound`].
pub(crate) async fn resolve_device(conn: &Connection, iface: &str) -> Result<DeviceHandle> {
    let nm = NMProxy::new(conn).await?;

    match nm.get_device_by_ip_iface(iface).await {
        Ok(path) => {
            debug!("Interface {iface} is device {}", path.as_str());
            Ok(DeviceHandle::from(path))
        }
        Err(zbus::Error::MethodError(name, _, _))
            if name.as_str() == dbus_names::UNKNOWN_DEVICE_ERROR =>
        {
            Err(ClientError::NotFound(format!("device {iface}")))
        }
        Err(e) => Err(e.into()),
    }
}

/// Reads interface name, driver, type and (for Wi-Fi) the active access point.
pub(crate) async fn device_info(conn: &Connection, device: &DeviceHandle) -> Result<DeviceInfo> {
    let d_proxy = NMDeviceProxy::builder(conn)
        .path(device.path().clone())?
        .build()
        .await?;

    let interface = d_proxy.interface().await?;
    let raw_type = d_proxy.device_type().await?;
    let driver = match d_proxy.driver().await {
        Ok(d) if !d.is_empty() => Some(d),
        Ok(_) => None,
        Err(e) => {
            warn!("Failed to get driver for device {interface}: {e}");
            None
        }
    };

    let active_ap = if raw_type == device_type::WIFI {
        active_access_point(conn, device).await?
    } else {
        None
    };

    Ok(DeviceInfo {
        handle: device.clone(),
        interface,
        driver,
        device_type: raw_type,
        active_access_point: active_ap,
    })
}

/// All devices of type Wi-Fi, in the daemon's order.
pub(crate) async fn wifi_devices(conn: &Connection) -> Result<Vec<DeviceHandle>> {
    let nm = NMProxy::new(conn).await?;

    let mut devices = Vec::new();
    for path in nm.get_devices().await? {
        let d_proxy = NMDeviceProxy::builder(conn)
            .path(path.clone())?
            .build()
            .await?;

        if d_proxy.device_type().await? == device_type::WIFI {
            devices.push(DeviceHandle::from(path));
        }
    }

    debug!("Found {} Wi-Fi devices", devices.len());
    Ok(devices)
}

async fn wireless_proxy<'a>(
    conn: &'a Connection,
    device: &DeviceHandle,
) -> Result<NMWirelessProxy<'a>> {
    Ok(NMWirelessProxy::builder(conn)
        .path(device.path().clone())?
        .build()
        .await?)
}

/// The access point a Wi-Fi device is associated with.
///
/// Returns `None` when `ActiveAccessPoint` is "/".
pub(crate) async fn active_access_point(
    conn: &Connection,
    device: &DeviceHandle,
) -> Result<Option<AccessPointInfo>> {
    let wifi = wireless_proxy(conn, device).await?;
    let ap_path = wifi.active_access_point().await?;

    if ap_path.as_str() == dbus_names::NO_OBJECT {
        debug!("Device {device} is not associated");
        return Ok(None);
    }

    Ok(Some(read_access_point(conn, ap_path).await?))
}

/// Every access point currently visible to a Wi-Fi device.
///
/// Access points that vanish while being read are skipped.
pub(crate) async fn access_points(
    conn: &Connection,
    device: &DeviceHandle,
) -> Result<Vec<AccessPointInfo>> {
    let wifi = wireless_proxy(conn, device).await?;
    let paths = wifi.access_points().await?;

    let mut aps = Vec::with_capacity(paths.len());
    for path in paths {
        match read_access_point(conn, path.clone()).await {
            Ok(ap) => aps.push(ap),
            Err(e) => warn!("Skipping access point {}: {e}", path.as_str()),
        }
    }
    Ok(aps)
}
