use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;

use crate::db::UserAccount;
use crate::types::{LoginRequest, LoginResponse};
use crate::{PitfallError, router::PitfallState};

/// GET /user/{id} -> full record, password included.
///
/// The path segment is handed to the store as a raw SQL fragment.
pub async fn get_user(
    State(state): State<PitfallState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserAccount>, PitfallError> {
    state
        .store
        .find_by_raw_id(&user_id)
        .await?
        .map(Json)
        .ok_or(PitfallError::NotFound)
}

/// GET /users -> every row, passwords included.
pub async fn list_users(
    State(state): State<PitfallState>,
) -> Result<Json<Vec<UserAccount>>, PitfallError> {
    Ok(Json(state.store.list_all().await?))
}

/// POST /login -> plaintext comparison inside a spliced query.
pub async fn login(
    State(state): State<PitfallState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, PitfallError> {
    let user = state
        .store
        .login(&req.username, &req.password)
        .await?
        .ok_or(PitfallError::InvalidCredentials)?;

    info!(id = user.id, username = %user.username, "login accepted");
    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        user: user.into(),
    }))
}
