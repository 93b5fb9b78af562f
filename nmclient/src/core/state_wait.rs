//! Activation state monitoring using D-Bus signals.
//!
//! An active connection announces its progress through the standard
//! `org.freedesktop.DBus.Properties.PropertiesChanged` signal. Instead of
//! polling `State`, we subscribe to that signal and feed every change set
//! of the `Connection.Active` interface to an [`ActivationObserver`].
//!
//! The observer and the draining loop work on any [`Stream`] of property
//! maps, so the state machine can be driven by a plain iterator in tests.

use futures::future::ready;
use futures::{FutureExt, Stream, StreamExt, select};
use futures_timer::Delay;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::pin::pin;
use std::time::Duration;
use zbus::Connection;
use zbus::fdo::{PropertiesChanged, PropertiesProxy};
use zvariant::{OwnedValue, Value};

use crate::Result;
use crate::api::models::{
    ActivationHandle, ActivationOutcome, ActiveConnectionState, ClientError,
};
use crate::dbus::NMActiveConnectionProxy;
use crate::types::constants::dbus_names;

/// Name of the property that drives activation transitions.
const STATE_PROPERTY: &str = "State";

/// Single-shot state machine for one activation attempt.
///
/// Only the `State` key of a change set is looked at. `Activated` yields
/// [`ActivationOutcome::Connected`], `Deactivating` and `Deactivated` yield
/// [`ActivationOutcome::Failed`]. Once an outcome has been produced, further
/// change sets are ignored.
#[derive(Debug, Default)]
pub struct ActivationObserver {
    finished: bool,
}

impl ActivationObserver {
    /// Creates an observer that has not seen a terminal state yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a terminal outcome has already been reported.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feeds one raw state code.
    pub fn observe_state(&mut self, code: u32) -> Option<ActivationOutcome> {
        if self.finished {
            return None;
        }

        let state = ActiveConnectionState::from(code);
        debug!("Active connection state: {state}");

        let outcome = match state {
            ActiveConnectionState::Activated => ActivationOutcome::Connected,
            ActiveConnectionState::Deactivating | ActiveConnectionState::Deactivated => {
                ActivationOutcome::Failed(state)
            }
            _ => return None,
        };

        self.finished = true;
        Some(outcome)
    }

    /// Feeds one `PropertiesChanged` change set.
    ///
    /// Change sets without a `State` entry, or whose `State` is not a `u32`,
    /// leave the observer untouched.
    pub fn observe(&mut self, changed: &HashMap<String, OwnedValue>) -> Option<ActivationOutcome> {
        let value = changed.get(STATE_PROPERTY)?;
        match &**value {
            Value::U32(code) => self.observe_state(*code),
            other => {
                warn!("Ignoring State property with unexpected type: {other:?}");
                None
            }
        }
    }
}

/// Drains `changes` until the activation reaches a terminal state.
///
/// Returns as soon as the first terminal transition is seen; the stream is
/// not polled past that item. Fails with [`ClientError::Timeout`] when
/// `timeout` elapses first and with [`ClientError::Stuck`] when the stream
/// ends first.
pub async fn await_activation<S>(changes: &mut S, timeout: Duration) -> Result<ActivationOutcome>
where
    S: Stream<Item = HashMap<String, OwnedValue>> + Unpin,
{
    drain(&mut ActivationObserver::new(), changes, timeout).await
}

async fn drain<S>(
    observer: &mut ActivationObserver,
    changes: &mut S,
    timeout: Duration,
) -> Result<ActivationOutcome>
where
    S: Stream<Item = HashMap<String, OwnedValue>> + Unpin,
{
    let mut timeout_delay = pin!(Delay::new(timeout).fuse());
    let mut changes = changes.fuse();

    loop {
        select! {
            _ = timeout_delay => {
                warn!("Activation timed out after {timeout:?}");
                return Err(ClientError::Timeout);
            }
            change = changes.next() => {
                match change {
                    Some(props) => {
                        if let Some(outcome) = observer.observe(&props) {
                            info!("Activation finished: {outcome}");
                            return Ok(outcome);
                        }
                    }
                    None => {
                        return Err(ClientError::Stuck("signal stream ended".into()));
                    }
                }
            }
        }
    }
}

/// Extracts the `Connection.Active` change set from one signal.
fn active_connection_changes(signal: &PropertiesChanged) -> Option<HashMap<String, OwnedValue>> {
    let args = match signal.args() {
        Ok(args) => args,
        Err(e) => {
            warn!("Failed to parse PropertiesChanged signal args: {e}");
            return None;
        }
    };

    if args.interface_name().as_str() != dbus_names::ACTIVE_CONNECTION_IFACE {
        return None;
    }

    let mut changed = HashMap::with_capacity(args.changed_properties().len());
    for (name, value) in args.changed_properties() {
        match value.try_to_owned() {
            Ok(owned) => {
                changed.insert(name.to_string(), owned);
            }
            Err(e) => warn!("Skipping property {name}: {e}"),
        }
    }
    Some(changed)
}

/// Waits for an active connection to reach a terminal state.
///
/// Subscribes to `PropertiesChanged` on the active connection object
/// before reading its current `State`, so a transition that happens in
/// between is still delivered through the stream.
pub(crate) async fn await_state(
    conn: &Connection,
    activation: &ActivationHandle,
    timeout: Duration,
) -> Result<ActivationOutcome> {
    let props = PropertiesProxy::builder(conn)
        .destination(dbus_names::SERVICE)?
        .path(activation.path().clone())?
        .build()
        .await?;

    // Subscribe to signals FIRST to avoid race condition
    let signals = props.receive_properties_changed().await?;
    debug!("Subscribed to PropertiesChanged on {activation}");

    let active = NMActiveConnectionProxy::builder(conn)
        .path(activation.path().clone())?
        .build()
        .await?;

    let mut observer = ActivationObserver::new();
    let current = active.state().await?;
    if let Some(outcome) = observer.observe_state(current) {
        debug!("Activation already terminal: {outcome}");
        return Ok(outcome);
    }

    let mut changes = pin!(signals.filter_map(|signal| ready(active_connection_changes(&signal))));
    drain(&mut observer, &mut changes, timeout).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn state(code: u32) -> HashMap<String, OwnedValue> {
        let mut m = HashMap::new();
        m.insert(
            STATE_PROPERTY.to_string(),
            Value::from(code).try_to_owned().unwrap(),
        );
        m
    }

    #[test]
    fn activating_is_not_terminal() {
        let mut obs = ActivationObserver::new();
        assert_eq!(obs.observe_state(0), None);
        assert_eq!(obs.observe_state(1), None);
        assert!(!obs.is_finished());
    }

    #[test]
    fn observer_is_single_shot() {
        let mut obs = ActivationObserver::new();
        assert_eq!(obs.observe_state(2), Some(ActivationOutcome::Connected));
        assert!(obs.is_finished());
        assert_eq!(obs.observe_state(4), None);
        assert_eq!(obs.observe(&state(2)), None);
    }

    #[test]
    fn deactivating_fails() {
        let mut obs = ActivationObserver::new();
        assert_eq!(
            obs.observe_state(3),
            Some(ActivationOutcome::Failed(ActiveConnectionState::Deactivating))
        );
    }

    #[test]
    fn state_with_wrong_type_is_ignored() {
        let mut obs = ActivationObserver::new();
        let mut m = HashMap::new();
        m.insert(
            STATE_PROPERTY.to_string(),
            Value::from("activated").try_to_owned().unwrap(),
        );
        assert_eq!(obs.observe(&m), None);
        assert!(!obs.is_finished());
    }

    fn properties_changed(iface: &str, changed: HashMap<&str, Value<'_>>) -> PropertiesChanged {
        let msg = zbus::Message::signal(
            "/org/freedesktop/NetworkManager/ActiveConnection/1",
            "org.freedesktop.DBus.Properties",
            "PropertiesChanged",
        )
        .unwrap()
        .build(&(iface, changed, Vec::<&str>::new()))
        .unwrap();
        PropertiesChanged::from_message(msg).unwrap()
    }

    #[test]
    fn foreign_interface_changes_are_dropped() {
        let mut changed = HashMap::new();
        changed.insert(STATE_PROPERTY, Value::from(2u32));
        let signal = properties_changed("org.freedesktop.NetworkManager.Device", changed);

        assert!(active_connection_changes(&signal).is_none());
    }

    #[test]
    fn active_connection_changes_carry_state() {
        let mut changed = HashMap::new();
        changed.insert(STATE_PROPERTY, Value::from(2u32));
        changed.insert("Default", Value::from(true));
        let signal = properties_changed(dbus_names::ACTIVE_CONNECTION_IFACE, changed);

        let props = active_connection_changes(&signal).unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(
            ActivationObserver::new().observe(&props),
            Some(ActivationOutcome::Connected)
        );
    }

    #[test]
    fn non_u32_state_from_signal_keeps_waiting() {
        let mut changed = HashMap::new();
        changed.insert(STATE_PROPERTY, Value::from("activated"));
        let signal = properties_changed(dbus_names::ACTIVE_CONNECTION_IFACE, changed);

        let props = active_connection_changes(&signal).unwrap();
        assert!(props.contains_key(STATE_PROPERTY));

        let mut obs = ActivationObserver::new();
        assert_eq!(obs.observe(&props), None);
        assert!(!obs.is_finished());
    }

    #[tokio::test]
    async fn drain_reports_stuck_on_empty_stream() {
        let mut changes = stream::iter(Vec::<HashMap<String, OwnedValue>>::new());
        let err = await_activation(&mut changes, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Stuck(_)));
    }
}
