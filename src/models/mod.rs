//! Data Models
//!
//! Request, response, configuration and row types shared by handlers,
//! services and storage.

pub mod cca;
pub mod response;
pub mod settings;
pub mod user;

pub use cca::*;
pub use response::*;
pub use settings::*;
pub use user::*;
