use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::warn;

/// Request-level failures. Messages reach the caller verbatim.
#[derive(Debug, ThisError)]
pub enum PitfallError {
    #[error("User not found")]
    NotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Query(#[from] SqlxError),

    #[error("You can only execute one statement at a time.")]
    MultipleStatements,

    #[error("{0}")]
    Evaluation(String),
}

impl PitfallError {
    pub fn status(&self) -> StatusCode {
        match self {
            PitfallError::NotFound => StatusCode::NOT_FOUND,
            PitfallError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            PitfallError::Query(_) | PitfallError::MultipleStatements => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            PitfallError::Evaluation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<evalexpr::EvalexprError> for PitfallError {
    fn from(e: evalexpr::EvalexprError) -> Self {
        PitfallError::Evaluation(e.to_string())
    }
}

impl IntoResponse for PitfallError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(status = status.as_u16(), error = %self, "request failed");

        let message = self.to_string();
        match self {
            PitfallError::InvalidCredentials => (
                status,
                Json(LoginFailure {
                    success: false,
                    message,
                }),
            )
                .into_response(),
            _ => (status, Json(ApiErrorBody { error: message })).into_response(),
        }
    }
}

/// `{"error": "..."}`
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// `{"success": false, "message": "..."}`
#[derive(Serialize)]
pub struct LoginFailure {
    pub success: bool,
    pub message: String,
}
