use axum::{
    extract::{Query, State},
    response::Html,
};

use crate::router::PitfallState;
use crate::types::SearchQuery;

/// GET /search?q= -> the query echoed inside a heading, per the configured markup mode.
pub async fn search(
    State(state): State<PitfallState>,
    Query(query): Query<SearchQuery>,
) -> Html<String> {
    Html(state.markup.heading("Search results for: ", &query.q))
}
