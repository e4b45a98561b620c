//! SQL DDL and seed data for the user store.

/// `users` table. Passwords are stored as given, in plaintext.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    username TEXT NOT NULL,
    password TEXT NOT NULL,
    email TEXT,
    role TEXT
)
"#;

pub struct SeedUser {
    pub id: i64,
    pub username: &'static str,
    pub password: &'static str,
    pub email: &'static str,
    pub role: &'static str,
}

/// Rows written by every `UserStore::reset`.
pub const SEED_USERS: [SeedUser; 2] = [
    SeedUser {
        id: 1,
        username: "admin",
        password: "admin123",
        email: "admin@example.com",
        role: "admin",
    },
    SeedUser {
        id: 2,
        username: "user",
        password: "user123",
        email: "user@example.com",
        role: "user",
    },
];
