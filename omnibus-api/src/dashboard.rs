use axum::{extract::State, routing::get, Json, Router};

use omnibus_domain::DashboardView;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/dashboard", get(dashboard))
}

/// GET /v1/dashboard — balances for the active trip. All amounts are
/// derived on read, never stored.
async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardView>, AppError> {
    Ok(Json(state.balances.dashboard().await?))
}
