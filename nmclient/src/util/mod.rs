//! Conversion helpers shared by the API and core modules.

pub(crate) mod utils;
