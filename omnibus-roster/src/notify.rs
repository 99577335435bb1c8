use async_trait::async_trait;
use tracing::info;

use omnibus_domain::Receipt;

#[derive(Debug, thiserror::Error)]
#[error("receipt dispatch failed: {0}")]
pub struct NotifierError(pub String);

/// Receipt delivery seam. Dispatch is fire-and-forget relative to the
/// payment write: a failing notifier never rolls a payment back.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_receipt(&self, receipt: &Receipt) -> Result<(), NotifierError>;
}

/// Default notifier: writes the receipt to the log. Real delivery (email)
/// plugs in behind the same trait.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_receipt(&self, receipt: &Receipt) -> Result<(), NotifierError> {
        info!(
            rider_id = receipt.rider_id,
            amount = receipt.amount,
            running_total = receipt.running_total,
            "receipt issued to {}",
            receipt.rider_name
        );
        Ok(())
    }
}
