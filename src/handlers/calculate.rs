use axum::{Json, extract::State};

use crate::types::{CalculateRequest, CalculateResponse};
use crate::{PitfallError, router::PitfallState};

/// POST /calculate
pub async fn calculate(
    State(state): State<PitfallState>,
    Json(req): Json<CalculateRequest>,
) -> Result<Json<CalculateResponse>, PitfallError> {
    let result = state.evaluator.evaluate(&req.expression)?;
    Ok(Json(CalculateResponse { result }))
}
