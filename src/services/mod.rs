//! Services
//!
//! Business logic services for the application.
//! Services handle the core functionality and are called by route handlers.

pub mod membership;
pub mod phase;
pub mod ranking;
pub mod user;

pub use membership::MembershipService;
pub use phase::PhaseService;
pub use ranking::RankingService;
pub use user::UserService;
