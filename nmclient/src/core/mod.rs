//! Core internal logic for connection management.
//!
//! This module contains the internal implementation details for managing
//! saved profiles, devices, activation and state monitoring.

pub(crate) mod connection;
pub(crate) mod connection_settings;
pub(crate) mod device;
pub(crate) mod state_wait;
