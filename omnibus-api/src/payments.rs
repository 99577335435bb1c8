use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use omnibus_domain::{Payment, PaymentDraft, PaymentUpdate};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/payments", post(create_payment))
        .route(
            "/v1/payments/{id}",
            axum::routing::patch(edit_payment).delete(delete_payment),
        )
        .route("/v1/trips/{id}/payments", get(list_payments))
}

/// POST /v1/payments — record a payment against the active trip. The
/// receipt is dispatched after the write commits; its failure never turns
/// a recorded payment into an error.
async fn create_payment(
    State(state): State<AppState>,
    Json(draft): Json<PaymentDraft>,
) -> Result<Json<Payment>, AppError> {
    Ok(Json(state.roster.add_payment(draft).await?))
}

/// PATCH /v1/payments/{id}
async fn edit_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
    Json(update): Json<PaymentUpdate>,
) -> Result<Json<Payment>, AppError> {
    Ok(Json(state.roster.edit_payment(payment_id, update).await?))
}

/// DELETE /v1/payments/{id} — the confirm step lives in the UI.
async fn delete_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.roster.delete_payment(payment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/trips/{id}/payments
async fn list_payments(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> Result<Json<Vec<Payment>>, AppError> {
    Ok(Json(state.roster.list_payments(trip_id).await?))
}
