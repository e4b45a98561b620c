pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod router;
pub mod service;
pub mod types;

pub use config::Config;
pub use db::{UserAccount, UserStore};
pub use error::PitfallError;

/// Reported by `GET /health`.
pub const API_VERSION: &str = "1.0";
