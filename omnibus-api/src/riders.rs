use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use omnibus_domain::{Rider, RiderDraft, RiderProfile, RiderUpdate, TripRider};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct CreateRiderRequest {
    rider: RiderDraft,
    seats: i64,
}

#[derive(Debug, Serialize)]
struct CreateRiderResponse {
    rider: Rider,
    reservation: TripRider,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/riders", post(create_rider))
        .route(
            "/v1/riders/{id}",
            get(get_rider).patch(edit_rider).delete(delete_rider),
        )
        .route("/v1/riders/{id}/cascade", delete(delete_rider_completely))
}

/// POST /v1/riders — create a rider on the active trip's roster.
async fn create_rider(
    State(state): State<AppState>,
    Json(req): Json<CreateRiderRequest>,
) -> Result<Json<CreateRiderResponse>, AppError> {
    let (rider, reservation) = state.roster.add_rider(req.rider, req.seats).await?;
    Ok(Json(CreateRiderResponse { rider, reservation }))
}

/// GET /v1/riders/{id}
async fn get_rider(
    State(state): State<AppState>,
    Path(rider_id): Path<i64>,
) -> Result<Json<RiderProfile>, AppError> {
    Ok(Json(state.roster.get_rider(rider_id).await?))
}

/// PATCH /v1/riders/{id}
async fn edit_rider(
    State(state): State<AppState>,
    Path(rider_id): Path<i64>,
    Json(update): Json<RiderUpdate>,
) -> Result<Json<Rider>, AppError> {
    Ok(Json(state.roster.edit_rider(rider_id, update).await?))
}

/// DELETE /v1/riders/{id} — guarded simple delete; riders with payments
/// must go through the cascade route.
async fn delete_rider(
    State(state): State<AppState>,
    Path(rider_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.roster.delete_rider(rider_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /v1/riders/{id}/cascade — full removal: contacts, payments,
/// reservations, rider.
async fn delete_rider_completely(
    State(state): State<AppState>,
    Path(rider_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.roster.delete_rider_completely(rider_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
