//! Type definitions and constants.
//!
//! This module contains NetworkManager constants and flag types.

pub(crate) mod constants;
pub mod flags;
