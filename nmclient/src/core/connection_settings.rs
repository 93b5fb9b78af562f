//! Saved connection profile management.
//!
//! Provides functions for adding, listing, finding and updating saved
//! NetworkManager connection profiles through the settings registry.

use futures::channel::oneshot;
use futures::{FutureExt, select};
use futures_timer::Delay;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::pin::pin;
use std::time::Duration;
use zbus::Connection;
use zvariant::OwnedValue;

use crate::Result;
use crate::api::models::{
    ClientError, ConnectionLookup, ProfileHandle, SavedConnection, StableIdBump, UpdateOutcome,
    daemon_message,
};
use crate::api::profile::ConnectionProfile;
use crate::dbus::{NMSettingsConnectionProxy, NMSettingsProxy};
use crate::types::constants::{connection_key, setting};
use crate::types::flags::Update2Flags;
use crate::util::utils::next_stable_id;

/// Validates `profile` and persists it with `Settings.AddConnection`.
///
/// A rejection by the daemon is reported as [`ClientError::Registration`]
/// carrying the daemon's own message.
pub(crate) async fn create(conn: &Connection, profile: &ConnectionProfile) -> Result<ProfileHandle> {
    profile.validate()?;

    let settings = NMSettingsProxy::new(conn).await?;
    debug!(
        "Adding connection '{}' ({})",
        profile.id().unwrap_or_default(),
        profile.connection_type().unwrap_or_default()
    );

    match settings.add_connection(profile.as_dbus()).await {
        Ok(path) => {
            debug!("Connection added at {}", path.as_str());
            Ok(ProfileHandle::from(path))
        }
        Err(e @ zbus::Error::MethodError(..)) => {
            let msg = daemon_message(&e);
            warn!("AddConnection rejected: {msg}");
            Err(ClientError::Registration(msg))
        }
        Err(e) => Err(e.into()),
    }
}

/// Reads the settings of one saved profile.
pub(crate) async fn read_profile(
    conn: &Connection,
    handle: &ProfileHandle,
) -> Result<ConnectionProfile> {
    let proxy = NMSettingsConnectionProxy::builder(conn)
        .path(handle.path().clone())?
        .build()
        .await?;

    let raw = proxy.get_settings().await?;
    Ok(ConnectionProfile::from_dbus(raw))
}

/// Lists every saved profile in registry order.
pub(crate) async fn list(conn: &Connection) -> Result<Vec<SavedConnection>> {
    let settings = NMSettingsProxy::new(conn).await?;
    let paths = settings.list_connections().await?;
    debug!("Found {} saved connections", paths.len());

    let mut saved = Vec::with_capacity(paths.len());
    for path in paths {
        let handle = ProfileHandle::from(path);
        let profile = read_profile(conn, &handle).await?;
        saved.push(SavedConnection { handle, profile });
    }
    Ok(saved)
}

/// Finds the first saved profile selected by `lookup`.
pub(crate) async fn find(
    conn: &Connection,
    lookup: &ConnectionLookup,
) -> Result<Option<SavedConnection>> {
    let found = lookup.first_match(list(conn).await?);
    match &found {
        Some(saved) => debug!("Connection {lookup} is {}", saved.handle),
        None => debug!("No connection {lookup}"),
    }
    Ok(found)
}

/// An `Update2` call in flight.
///
/// Returned by [`crate::NmClient::update`]. The call runs on a spawned task;
/// [`PendingUpdate::wait`] resolves once its single reply arrives.
#[derive(Debug)]
pub struct PendingUpdate {
    handle: ProfileHandle,
    reply: oneshot::Receiver<zbus::Result<HashMap<String, OwnedValue>>>,
}

impl PendingUpdate {
    /// The profile being updated.
    pub fn handle(&self) -> &ProfileHandle {
        &self.handle
    }

    /// Waits for the daemon's reply.
    ///
    /// A rejection is reported as [`ClientError::Update`] with the daemon's
    /// message; no reply within `timeout` yields [`ClientError::Timeout`].
    pub async fn wait(self, timeout: Duration) -> Result<UpdateOutcome> {
        let mut timeout_delay = pin!(Delay::new(timeout).fuse());
        let mut reply = self.reply.fuse();

        select! {
            _ = timeout_delay => {
                warn!("Update of {} timed out after {timeout:?}", self.handle);
                Err(ClientError::Timeout)
            }
            received = reply => {
                match received {
                    Ok(Ok(result)) => {
                        debug!("Update of {} succeeded", self.handle);
                        Ok(UpdateOutcome { result })
                    }
                    Ok(Err(e @ zbus::Error::MethodError(..))) => {
                        Err(ClientError::Update(daemon_message(&e)))
                    }
                    Ok(Err(e)) => Err(e.into()),
                    Err(oneshot::Canceled) => {
                        Err(ClientError::Stuck("update task ended without a reply".into()))
                    }
                }
            }
        }
    }
}

/// The Tokio runtime the `Update2` task is spawned on.
fn runtime_handle() -> Result<tokio::runtime::Handle> {
    tokio::runtime::Handle::try_current().map_err(|e| ClientError::NoRuntime(e.to_string()))
}

/// Sends `profile` to `Settings.Connection.Update2` without waiting.
///
/// Fails with [`ClientError::NoRuntime`] outside a Tokio runtime.
pub(crate) async fn update(
    conn: &Connection,
    handle: &ProfileHandle,
    profile: &ConnectionProfile,
    flags: Update2Flags,
) -> Result<PendingUpdate> {
    let runtime = runtime_handle()?;
    let (tx, rx) = oneshot::channel();
    let conn = conn.clone();
    let path = handle.path().clone();
    let profile = profile.try_clone()?;

    debug!("Sending Update2 to {} (flags {flags:?})", path.as_str());
    runtime.spawn(async move {
        let result = async {
            let proxy = NMSettingsConnectionProxy::builder(&conn)
                .path(path)?
                .build()
                .await?;
            proxy
                .update2(profile.as_dbus(), flags.bits(), HashMap::new())
                .await
        }
        .await;

        // The receiver may have given up already.
        let _ = tx.send(result);
    });

    Ok(PendingUpdate {
        handle: handle.clone(),
        reply: rx,
    })
}

/// Replaces the stable-id of the first profile selected by `lookup` with
/// the next one in its sequence, e.g. `office-3` becomes `office-4`.
///
/// The profile is cloned, modified and written back in one `Update2` call
/// with autoconnect blocked.
pub(crate) async fn bump_stable_id(
    conn: &Connection,
    lookup: &ConnectionLookup,
    timeout: Duration,
) -> Result<StableIdBump> {
    let saved = find(conn, lookup)
        .await?
        .ok_or_else(|| ClientError::NotFound(format!("connection {lookup}")))?;

    if !saved.profile.has_setting(setting::CONNECTION) {
        return Err(ClientError::MissingSetting(setting::CONNECTION.into()));
    }

    let id = saved.profile.id().unwrap_or_default().to_string();
    let uuid = saved.profile.uuid().unwrap_or_default().to_string();

    let previous = match saved.profile.stable_id() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => return Err(ClientError::NoStableId(format!("\"{id}\" ({uuid})"))),
    };
    let stable_id = next_stable_id(&previous);

    let mut modified = saved.profile.try_clone()?;
    modified.set(
        setting::CONNECTION,
        connection_key::STABLE_ID,
        stable_id.clone(),
    );

    let outcome = update(
        conn,
        &saved.handle,
        &modified,
        Update2Flags::BLOCK_AUTOCONNECT,
    )
    .await?
    .wait(timeout)
    .await?;

    info!("Stable-id of \"{id}\" changed from \"{previous}\" to \"{stable_id}\"");

    Ok(StableIdBump {
        handle: saved.handle,
        id,
        uuid,
        previous,
        stable_id,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::no_object;

    #[tokio::test]
    async fn wait_reports_daemon_result() {
        let (tx, rx) = oneshot::channel();
        let pending = PendingUpdate {
            handle: ProfileHandle::from(no_object()),
            reply: rx,
        };
        tx.send(Ok(HashMap::new())).unwrap();

        let outcome = pending.wait(Duration::from_secs(5)).await.unwrap();
        assert!(outcome.result.is_empty());
    }

    #[tokio::test]
    async fn wait_times_out_without_reply() {
        let (_tx, rx) = oneshot::channel();
        let pending = PendingUpdate {
            handle: ProfileHandle::from(no_object()),
            reply: rx,
        };

        let err = pending.wait(Duration::from_millis(20)).await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout));
    }

    #[tokio::test]
    async fn wait_reports_dropped_task() {
        let (tx, rx) = oneshot::channel::<zbus::Result<HashMap<String, OwnedValue>>>();
        drop(tx);
        let pending = PendingUpdate {
            handle: ProfileHandle::from(no_object()),
            reply: rx,
        };

        let started = std::time::Instant::now();
        let err = pending.wait(Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, ClientError::Stuck(_)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn runtime_handle_requires_tokio() {
        assert!(matches!(runtime_handle(), Err(ClientError::NoRuntime(_))));
    }

    #[tokio::test]
    async fn runtime_handle_inside_tokio() {
        assert!(runtime_handle().is_ok());
    }

    #[tokio::test]
    async fn wait_surfaces_transport_errors() {
        let (tx, rx) = oneshot::channel();
        let pending = PendingUpdate {
            handle: ProfileHandle::from(no_object()),
            reply: rx,
        };
        tx.send(Err(zbus::Error::Failure("connection closed".into())))
            .unwrap();

        let err = pending.wait(Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, ClientError::Dbus(_)));
    }
}
