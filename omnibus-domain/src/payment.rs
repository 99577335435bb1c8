use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A collected payment, always tagged with the trip that was active when it
/// was recorded.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    pub id: i64,
    pub rider_id: i64,
    pub trip_id: i64,
    pub paid_on: NaiveDate,
    /// Amount collected, in cents. Always positive.
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentDraft {
    pub rider_id: i64,
    /// YYYY-MM-DD
    pub paid_on: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentUpdate {
    pub paid_on: Option<String>,
    pub amount: Option<i64>,
}

/// What the notifier gets after a payment lands. `running_total` is the
/// rider's collected sum on the trip including this payment.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub rider_id: i64,
    pub rider_name: String,
    pub paid_on: NaiveDate,
    pub amount: i64,
    pub running_total: i64,
}
