//! Connection profile builders.
//!
//! These produce [`ConnectionProfile`](crate::ConnectionProfile) values ready
//! for [`NmClient::create`](crate::NmClient::create).
//!
//! # Examples
//!
//! ```rust
//! use nmclient::builders::{BondBuilder, BondPortBuilder};
//!
//! let master = BondBuilder::new("bond0").build();
//! let port = BondPortBuilder::new("eth0", "bond0").build();
//!
//! assert!(master.validate().is_ok());
//! assert!(port.validate().is_ok());
//! ```

pub mod bond;
pub mod connection_builder;

pub use bond::{BondBuilder, BondPortBuilder, DEFAULT_BOND_MODE};
pub use connection_builder::ConnectionBuilder;
