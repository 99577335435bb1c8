use std::sync::Arc;

use omnibus_roster::{BalanceCalculator, Notifier, RosterManager, TripManager};
use omnibus_store::DbClient;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub db: DbClient,
    pub trips: Arc<TripManager>,
    pub roster: Arc<RosterManager>,
    pub balances: Arc<BalanceCalculator>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(db: DbClient, notifier: Arc<dyn Notifier>, auth: AuthConfig) -> Self {
        Self {
            trips: Arc::new(TripManager::new(db.clone())),
            roster: Arc::new(RosterManager::new(db.clone(), notifier)),
            balances: Arc::new(BalanceCalculator::new(db.clone())),
            db,
            auth,
        }
    }
}
