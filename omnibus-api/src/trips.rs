use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};

use omnibus_domain::views::AddRidersReport;
use omnibus_domain::{RosterView, SeatRequest, Trip, TripDraft};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/trips", post(create_trip).get(list_trips))
        .route("/v1/trips/active", get(active_trip))
        .route("/v1/trips/{id}/activate", post(activate_trip))
        .route("/v1/trips/{id}/riders", post(add_riders))
        .route("/v1/trips/{id}/riders/{rider_id}", delete(remove_rider))
        .route("/v1/trips/{id}/roster", get(roster))
}

/// POST /v1/trips
async fn create_trip(
    State(state): State<AppState>,
    Json(draft): Json<TripDraft>,
) -> Result<Json<Trip>, AppError> {
    let trip = state.trips.create_trip(draft).await?;
    Ok(Json(trip))
}

/// GET /v1/trips
async fn list_trips(State(state): State<AppState>) -> Result<Json<Vec<Trip>>, AppError> {
    Ok(Json(state.trips.list_trips().await?))
}

/// GET /v1/trips/active
async fn active_trip(State(state): State<AppState>) -> Result<Json<Option<Trip>>, AppError> {
    Ok(Json(state.trips.active_trip().await?))
}

/// POST /v1/trips/{id}/activate
async fn activate_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> Result<Json<Trip>, AppError> {
    Ok(Json(state.trips.activate_trip(trip_id).await?))
}

/// POST /v1/trips/{id}/riders — batch add; failed entries are reported,
/// not fatal.
async fn add_riders(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
    Json(requests): Json<Vec<SeatRequest>>,
) -> Result<Json<AddRidersReport>, AppError> {
    Ok(Json(state.trips.add_riders_to_trip(trip_id, &requests).await?))
}

/// DELETE /v1/trips/{id}/riders/{rider_id}
async fn remove_rider(
    State(state): State<AppState>,
    Path((trip_id, rider_id)): Path<(i64, i64)>,
) -> Result<axum::http::StatusCode, AppError> {
    state.roster.remove_rider_from_trip(rider_id, trip_id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// GET /v1/trips/{id}/roster
async fn roster(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> Result<Json<RosterView>, AppError> {
    Ok(Json(state.trips.get_roster(trip_id).await?))
}
