//! Utilities
//!
//! Error type and filesystem paths used throughout the service.

pub mod error;
pub mod paths;

pub use error::*;
pub use paths::*;
