//! Phase Service
//!
//! Current-phase resolution against the flag store and the permission gates
//! derived from it.

pub mod gates;
mod service;

pub use service::PhaseService;
