use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person who may ride on one or more trips. Trip-independent: the same
/// rider can appear on any number of rosters over time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rider {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub phone_alt: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmergencyContact {
    pub id: i64,
    pub rider_id: i64,
    pub name: String,
    pub phone: String,
    pub relationship: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MedicalNote {
    pub id: i64,
    pub rider_id: i64,
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    pub relationship: Option<String>,
}

/// New-rider input. Emergency contacts and the medical note ride along so
/// the whole profile lands in one transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct RiderDraft {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub phone_alt: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    #[serde(default)]
    pub emergency_contacts: Vec<ContactDraft>,
    pub medical_note: Option<String>,
}

/// Partial rider edit. Contact-list and note fields replace wholesale when
/// supplied; seats/balance/instructions_sent target the reservation on the
/// currently active trip.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RiderUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub phone_alt: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub emergency_contacts: Option<Vec<ContactDraft>>,
    /// Some(text) replaces the note; Some("") clears it.
    pub medical_note: Option<String>,
    pub seats: Option<i64>,
    pub balance: Option<i64>,
    pub instructions_sent: Option<bool>,
}

/// A rider together with their satellite rows, as served to the admin
/// detail screen.
#[derive(Debug, Clone, Serialize)]
pub struct RiderProfile {
    pub rider: Rider,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub medical_note: Option<MedicalNote>,
}

impl RiderUpdate {
    /// True when the edit touches the active-trip reservation row.
    pub fn touches_reservation(&self) -> bool {
        self.seats.is_some() || self.balance.is_some() || self.instructions_sent.is_some()
    }
}
