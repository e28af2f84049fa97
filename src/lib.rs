//! CCA Allocation Service - Rust Backend Library
//!
//! HTTP backend of the hall CCA allocation process. It includes:
//! - Axum route handlers (current phase, rankings, sports/culture membership)
//! - Business logic services (phase resolution, permission gates)
//! - Storage layer (SQLite, Config)
//! - Data models and utilities

pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use routes::build_router;
pub use models::response::*;
pub use models::settings::{AppConfig, ConfigOverrides, RunMode};
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
