use serde::Serialize;

use crate::rider::{EmergencyContact, MedicalNote};
use crate::trip::Trip;

/// One roster membership row joined with the rider's name, as fetched for
/// dashboard and roster reads.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RosterMember {
    pub rider_id: i64,
    pub name: String,
    pub seats: i64,
    pub balance: i64,
    pub instructions_sent: bool,
}

/// Per-rider derived amounts. Never stored; recomputed on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiderBalance {
    pub rider_id: i64,
    pub name: String,
    pub seats: i64,
    pub balance: i64,
    pub collected: i64,
    pub remaining_balance: i64,
}

/// Trip-level derived aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripTotals {
    pub total_collected: i64,
    pub remaining_funds: i64,
    pub reserved_seats: i64,
    pub remaining_seats: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub trip: Trip,
    pub riders: Vec<RiderBalance>,
    pub totals: TripTotals,
}

/// Full roster detail for one rider, as exported/printed.
#[derive(Debug, Clone, Serialize)]
pub struct RosterEntry {
    pub rider_id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub seats: i64,
    pub instructions_sent: bool,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub medical_note: Option<MedicalNote>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RosterView {
    pub trip: Trip,
    pub entries: Vec<RosterEntry>,
}

/// Outcome of a continue-on-error batch add: successes and skipped entries
/// with the reason each was skipped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AddRidersReport {
    pub added: Vec<crate::trip::TripRider>,
    pub skipped: Vec<SkippedSeatRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedSeatRequest {
    pub rider_id: i64,
    pub reason: String,
}
