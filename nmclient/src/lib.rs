//! An async client for NetworkManager connection profiles over D-Bus.
//!
//! This crate covers a small, practical slice of NetworkManager's API:
//!
//! - Building, validating and registering connection profiles (bond
//!   masters and their Ethernet ports in particular)
//! - Finding saved profiles by id or UUID and updating them atomically
//! - Activating a profile and waiting for it to come up or fail
//! - Reading the active access point and the scan list of Wi-Fi devices
//!
//! # Example
//!
//! ```no_run
//! use nmclient::{ConnectionLookup, NmClient};
//!
//! # async fn example() -> nmclient::Result<()> {
//! let nm = NmClient::new().await?;
//!
//! // Give a profile a fresh stable-id, e.g. "office-3" -> "office-4"
//! let bump = nm.bump_stable_id(&ConnectionLookup::Id("office".into())).await?;
//! println!("set stable-id to \"{}\"", bump.stable_id);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, ClientError>`. Errors raised by the
//! daemon itself (a rejected profile, a failed update) carry the daemon's
//! message verbatim.
//!
//! # Signal-Based State Monitoring
//!
//! Activation progress is followed through the `PropertiesChanged` signal
//! of the active connection object rather than by polling. The
//! subscription is made before the current state is read, so a fast
//! transition is never missed. The state machine itself,
//! [`ActivationObserver`], works on any stream of property maps.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To see
//! log output, add a logging implementation like `env_logger`. For example:
//!
//! ```no_run,ignore
//! env_logger::init();
//! // ...
//! ```

// Internal implementation modules
mod core;
mod dbus;
mod types;
mod util;

// Public API modules
pub mod api;

pub use api::builders;
pub use api::models::{
    AccessPointInfo, ActivationHandle, ActivationOutcome, ActiveConnectionState, BondSetup,
    ClientError, ConnectionLookup, DeviceHandle, DeviceInfo, ProfileHandle, SavedConnection,
    StableIdBump, TimeoutConfig, UpdateOutcome,
};
pub use api::network_manager::NmClient;
pub use api::profile::ConnectionProfile;
pub use crate::core::connection_settings::PendingUpdate;
pub use crate::core::state_wait::{ActivationObserver, await_activation};
pub use crate::types::flags::{ApFlags, ApSecurityFlags, Update2Flags, security_summary};
pub use crate::util::utils::next_stable_id;

/// A specialized `Result` type for NetworkManager operations.
pub type Result<T> = std::result::Result<T, ClientError>;
