pub mod balance;
pub mod notify;
pub mod riders;
pub mod trips;

pub use balance::BalanceCalculator;
pub use notify::{LogNotifier, Notifier, NotifierError};
pub use riders::RosterManager;
pub use trips::TripManager;

use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Bad input; nothing was mutated.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The operation needs an active trip and none is set. Callers should
    /// send the operator to pick or create a trip.
    #[error("no trip is currently active")]
    NoActiveTrip,

    #[error("{0}")]
    Conflict(String),

    /// Storage failure; the surrounding transaction was rolled back.
    #[error("storage failure: {0}")]
    Database(#[from] sqlx::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

pub(crate) fn parse_date(field: &str, value: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| LedgerError::Validation(format!("{field} is not a valid date: {value:?}")))
}

#[cfg(test)]
pub(crate) mod testutil {
    use omnibus_store::DbClient;

    pub(crate) async fn test_db() -> DbClient {
        let db = DbClient::new("sqlite::memory:")
            .await
            .expect("open in-memory database");
        db.migrate().await.expect("apply migrations");
        db
    }
}
