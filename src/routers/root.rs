use axum::extract::State;

use crate::{controllers::RootController, state::AppState};

pub async fn root_route(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    RootController::root(&state.config.static_dir).await
}

pub async fn health_check_route() -> impl axum::response::IntoResponse {
    RootController::health_check().await
}
