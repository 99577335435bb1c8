use std::sync::Arc;

use tracing::warn;

use omnibus_domain::{
    Payment, PaymentDraft, PaymentUpdate, Receipt, Rider, RiderDraft, RiderProfile, RiderUpdate,
    TripRider,
};
use omnibus_store::{DbClient, PaymentRepository, RiderRepository, TripRepository};

use crate::notify::Notifier;
use crate::{parse_date, LedgerError, LedgerResult};

/// Rider and payment lifecycle: rider CRUD against the active trip,
/// deletion-guard rules, cascading deletion, and payment recording with
/// receipt dispatch.
pub struct RosterManager {
    db: DbClient,
    notifier: Arc<dyn Notifier>,
}

impl RosterManager {
    pub fn new(db: DbClient, notifier: Arc<dyn Notifier>) -> Self {
        Self { db, notifier }
    }

    /// Create a rider and reserve their seats on the active trip, as one
    /// transaction: never a rider without their reservation.
    pub async fn add_rider(
        &self,
        draft: RiderDraft,
        seats: i64,
    ) -> LedgerResult<(Rider, TripRider)> {
        if draft.name.trim().is_empty() {
            return Err(LedgerError::Validation("rider name must not be empty".into()));
        }
        if seats < 1 {
            return Err(LedgerError::Validation("seats must be at least 1".into()));
        }
        if draft.emergency_contacts.len() > 2 {
            return Err(LedgerError::Validation(
                "a rider may have at most two emergency contacts".into(),
            ));
        }

        let mut tx = self.db.pool.begin().await?;

        let active = TripRepository::find_active(&mut tx)
            .await?
            .ok_or(LedgerError::NoActiveTrip)?;

        let rider = RiderRepository::insert(&mut tx, &draft).await?;
        RiderRepository::replace_contacts(&mut tx, rider.id, &draft.emergency_contacts).await?;
        RiderRepository::set_medical_note(&mut tx, rider.id, draft.medical_note.as_deref())
            .await?;

        let member = TripRepository::add_member(
            &mut tx,
            active.id,
            rider.id,
            seats,
            seats * active.cost_per_seat,
        )
        .await?;

        tx.commit().await?;
        Ok((rider, member))
    }

    /// Update rider fields, and when reservation fields are supplied,
    /// upsert the rider's row on the currently active trip.
    pub async fn edit_rider(&self, rider_id: i64, update: RiderUpdate) -> LedgerResult<Rider> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(LedgerError::Validation("rider name must not be empty".into()));
            }
        }
        if let Some(contacts) = &update.emergency_contacts {
            if contacts.len() > 2 {
                return Err(LedgerError::Validation(
                    "a rider may have at most two emergency contacts".into(),
                ));
            }
        }
        if let Some(seats) = update.seats {
            if seats < 1 {
                return Err(LedgerError::Validation("seats must be at least 1".into()));
            }
        }

        let touches_reservation = update.touches_reservation();

        let mut tx = self.db.pool.begin().await?;

        let mut rider = RiderRepository::fetch(&mut tx, rider_id)
            .await?
            .ok_or(LedgerError::NotFound {
                entity: "rider",
                id: rider_id,
            })?;

        if let Some(name) = update.name {
            rider.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            rider.email = none_if_blank(email);
        }
        if let Some(phone) = update.phone {
            rider.phone = none_if_blank(phone);
        }
        if let Some(phone_alt) = update.phone_alt {
            rider.phone_alt = none_if_blank(phone_alt);
        }
        if let Some(address) = update.address {
            rider.address = none_if_blank(address);
        }
        if let Some(city) = update.city {
            rider.city = none_if_blank(city);
        }
        if let Some(postal_code) = update.postal_code {
            rider.postal_code = none_if_blank(postal_code);
        }
        RiderRepository::update(&mut tx, &rider).await?;

        if let Some(contacts) = &update.emergency_contacts {
            RiderRepository::replace_contacts(&mut tx, rider_id, contacts).await?;
        }
        if let Some(note) = &update.medical_note {
            RiderRepository::set_medical_note(&mut tx, rider_id, Some(note.as_str())).await?;
        }

        if touches_reservation {
            let active = TripRepository::find_active(&mut tx)
                .await?
                .ok_or(LedgerError::NoActiveTrip)?;

            match TripRepository::find_member(&mut tx, active.id, rider_id).await? {
                Some(mut member) => {
                    if let Some(seats) = update.seats {
                        member.seats = seats;
                        member.balance = seats * active.cost_per_seat;
                    }
                    if let Some(balance) = update.balance {
                        member.balance = balance;
                    }
                    if let Some(flag) = update.instructions_sent {
                        member.instructions_sent = flag;
                    }
                    TripRepository::update_member(&mut tx, &member).await?;
                }
                None => {
                    let seats = update.seats.unwrap_or(1);
                    let balance = update.balance.unwrap_or(seats * active.cost_per_seat);
                    let mut member =
                        TripRepository::add_member(&mut tx, active.id, rider_id, seats, balance)
                            .await?;
                    if let Some(flag) = update.instructions_sent {
                        member.instructions_sent = flag;
                        TripRepository::update_member(&mut tx, &member).await?;
                    }
                }
            }
        }

        tx.commit().await?;
        Ok(rider)
    }

    pub async fn get_rider(&self, rider_id: i64) -> LedgerResult<RiderProfile> {
        let mut conn = self.db.pool.acquire().await?;

        let rider = RiderRepository::fetch(&mut conn, rider_id)
            .await?
            .ok_or(LedgerError::NotFound {
                entity: "rider",
                id: rider_id,
            })?;
        let emergency_contacts = RiderRepository::list_contacts(&mut conn, rider_id).await?;
        let medical_note = RiderRepository::fetch_medical_note(&mut conn, rider_id).await?;

        Ok(RiderProfile {
            rider,
            emergency_contacts,
            medical_note,
        })
    }

    /// Drop only the (trip, rider) association; the rider and their other
    /// trips survive.
    pub async fn remove_rider_from_trip(&self, rider_id: i64, trip_id: i64) -> LedgerResult<()> {
        let mut conn = self.db.pool.acquire().await?;

        let removed = TripRepository::remove_member(&mut conn, trip_id, rider_id).await?;
        if removed == 0 {
            return Err(LedgerError::NotFound {
                entity: "reservation",
                id: rider_id,
            });
        }
        Ok(())
    }

    /// Simple delete path. Guarded: a rider with recorded payments must go
    /// through `delete_rider_completely`.
    pub async fn delete_rider(&self, rider_id: i64) -> LedgerResult<()> {
        let mut tx = self.db.pool.begin().await?;

        if RiderRepository::fetch(&mut tx, rider_id).await?.is_none() {
            return Err(LedgerError::NotFound {
                entity: "rider",
                id: rider_id,
            });
        }

        if PaymentRepository::exists_for_rider(&mut tx, rider_id).await? {
            return Err(LedgerError::Conflict(format!(
                "rider {rider_id} has recorded payments; use the cascading delete"
            )));
        }

        RiderRepository::delete_contacts(&mut tx, rider_id).await?;
        RiderRepository::delete_medical_note(&mut tx, rider_id).await?;
        TripRepository::remove_all_memberships(&mut tx, rider_id).await?;
        RiderRepository::delete(&mut tx, rider_id).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Destructive cascade, in strict reverse-dependency order: emergency
    /// contacts and medical note, then payments, then trip memberships,
    /// then the rider row. Any failing step aborts the whole transaction.
    pub async fn delete_rider_completely(&self, rider_id: i64) -> LedgerResult<()> {
        let mut tx = self.db.pool.begin().await?;

        if RiderRepository::fetch(&mut tx, rider_id).await?.is_none() {
            return Err(LedgerError::NotFound {
                entity: "rider",
                id: rider_id,
            });
        }

        RiderRepository::delete_contacts(&mut tx, rider_id).await?;
        RiderRepository::delete_medical_note(&mut tx, rider_id).await?;
        PaymentRepository::delete_for_rider(&mut tx, rider_id).await?;
        TripRepository::remove_all_memberships(&mut tx, rider_id).await?;
        RiderRepository::delete(&mut tx, rider_id).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Record a payment against the active trip and dispatch a receipt.
    /// The receipt is fire-and-forget: its failure is logged, never
    /// propagated, and never rolls the payment back.
    pub async fn add_payment(&self, draft: PaymentDraft) -> LedgerResult<Payment> {
        if draft.amount <= 0 {
            return Err(LedgerError::Validation(
                "payment amount must be positive".into(),
            ));
        }
        let paid_on = parse_date("paid_on", &draft.paid_on)?;

        let mut tx = self.db.pool.begin().await?;

        let active = TripRepository::find_active(&mut tx)
            .await?
            .ok_or(LedgerError::NoActiveTrip)?;

        let rider = RiderRepository::fetch(&mut tx, draft.rider_id)
            .await?
            .ok_or(LedgerError::NotFound {
                entity: "rider",
                id: draft.rider_id,
            })?;

        if TripRepository::find_member(&mut tx, active.id, rider.id)
            .await?
            .is_none()
        {
            return Err(LedgerError::Conflict(format!(
                "rider {} is not on the active trip roster",
                rider.id
            )));
        }

        let payment =
            PaymentRepository::insert(&mut tx, rider.id, active.id, paid_on, draft.amount).await?;

        let running_total: i64 =
            PaymentRepository::list_for_rider_on_trip(&mut tx, active.id, rider.id)
                .await?
                .iter()
                .map(|p| p.amount)
                .sum();

        tx.commit().await?;

        let receipt = Receipt {
            rider_id: rider.id,
            rider_name: rider.name,
            paid_on,
            amount: payment.amount,
            running_total,
        };
        let notifier = Arc::clone(&self.notifier);
        let payment_id = payment.id;
        tokio::spawn(async move {
            if let Err(err) = notifier.send_receipt(&receipt).await {
                warn!("receipt for payment {payment_id} not delivered: {err}");
            }
        });

        Ok(payment)
    }

    pub async fn edit_payment(
        &self,
        payment_id: i64,
        update: PaymentUpdate,
    ) -> LedgerResult<Payment> {
        let mut conn = self.db.pool.acquire().await?;

        let mut payment = PaymentRepository::fetch(&mut conn, payment_id)
            .await?
            .ok_or(LedgerError::NotFound {
                entity: "payment",
                id: payment_id,
            })?;

        if let Some(paid_on) = &update.paid_on {
            payment.paid_on = parse_date("paid_on", paid_on)?;
        }
        if let Some(amount) = update.amount {
            if amount <= 0 {
                return Err(LedgerError::Validation(
                    "payment amount must be positive".into(),
                ));
            }
            payment.amount = amount;
        }

        PaymentRepository::update(&mut conn, &payment).await?;
        Ok(payment)
    }

    /// Direct delete by id. Confirmation is a caller (UI) concern.
    pub async fn delete_payment(&self, payment_id: i64) -> LedgerResult<()> {
        let mut conn = self.db.pool.acquire().await?;

        let deleted = PaymentRepository::delete(&mut conn, payment_id).await?;
        if deleted == 0 {
            return Err(LedgerError::NotFound {
                entity: "payment",
                id: payment_id,
            });
        }
        Ok(())
    }

    pub async fn list_payments(&self, trip_id: i64) -> LedgerResult<Vec<Payment>> {
        let mut conn = self.db.pool.acquire().await?;

        if TripRepository::fetch(&mut conn, trip_id).await?.is_none() {
            return Err(LedgerError::NotFound {
                entity: "trip",
                id: trip_id,
            });
        }

        Ok(PaymentRepository::list_for_trip(&mut conn, trip_id).await?)
    }
}

fn none_if_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
