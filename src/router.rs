use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::db::UserStore;
use crate::handlers::{calculate, health, search, users};
use crate::service::evaluator::ExpressionEvaluator;
use crate::service::markup::MarkupMode;

/// Shared handler state. Cloned per request; holds no connections.
#[derive(Clone)]
pub struct PitfallState {
    pub store: UserStore,
    pub evaluator: Arc<dyn ExpressionEvaluator>,
    pub markup: MarkupMode,
}

impl PitfallState {
    pub fn new(
        store: UserStore,
        evaluator: Arc<dyn ExpressionEvaluator>,
        markup: MarkupMode,
    ) -> Self {
        Self {
            store,
            evaluator,
            markup,
        }
    }
}

pub fn pitfall_router(state: PitfallState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/user/{user_id}", get(users::get_user))
        .route("/users", get(users::list_users))
        .route("/login", post(users::login))
        .route("/search", get(search::search))
        .route("/calculate", post(calculate::calculate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
