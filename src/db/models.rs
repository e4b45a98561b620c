use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full `users` row, password included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// The user object embedded in a successful login response (no email).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginUser {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub role: Option<String>,
}

impl From<UserAccount> for LoginUser {
    fn from(u: UserAccount) -> Self {
        Self {
            id: u.id,
            username: u.username,
            password: u.password,
            role: u.role,
        }
    }
}
