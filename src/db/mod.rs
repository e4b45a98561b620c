//! Database module: the single `users` table.
//!
//! Layout:
//! - `guard.rs`: refuses literal SQL carrying more than one statement
//! - `models.rs`: row struct and the reduced view returned by login
//! - `schema.rs`: DDL and the fixed seed rows
//! - `sqlite.rs`: `UserStore`, one connection per operation

pub mod guard;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{LoginUser, UserAccount};
pub use schema::{SEED_USERS, SQLITE_INIT};
pub use sqlite::UserStore;
