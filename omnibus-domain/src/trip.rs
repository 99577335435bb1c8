use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One bus-rental event with its own cost and seat parameters.
///
/// At most one trip is active at any time; activity is a global pointer,
/// not a per-trip status enum.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Trip {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Total charter cost, in cents.
    pub cost_of_rental: i64,
    /// Price of a single seat, in cents.
    pub cost_per_seat: i64,
    pub total_seats: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A rider's reservation on one specific trip.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TripRider {
    pub trip_id: i64,
    pub rider_id: i64,
    pub seats: i64,
    /// Amount owed for the reserved seats, in cents. Seeded as
    /// seats x cost_per_seat at reservation time, editable thereafter.
    pub balance: i64,
    pub instructions_sent: bool,
}

/// Unvalidated trip input as it arrives from the admin UI. Dates are kept
/// as strings so the lifecycle manager owns the parse-or-reject decision.
#[derive(Debug, Clone, Deserialize)]
pub struct TripDraft {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub cost_of_rental: i64,
    pub cost_per_seat: i64,
    pub total_seats: i64,
}

/// One entry of a batch "add riders to trip" request.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SeatRequest {
    pub rider_id: i64,
    pub seats: i64,
}
