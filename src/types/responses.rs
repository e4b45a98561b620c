use serde::Serialize;
use serde_json::Value;

use crate::db::LoginUser;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: LoginUser,
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub result: Value,
}
