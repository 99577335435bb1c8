use omnibus_domain::views::RosterMember;
use omnibus_domain::{DashboardView, Payment, RiderBalance, Trip, TripTotals};
use omnibus_store::{DbClient, PaymentRepository, TripRepository};

use crate::{LedgerError, LedgerResult};

/// Derives owed/collected/remaining amounts from the ledger. All outputs
/// are recomputed on every read; nothing here writes.
pub struct BalanceCalculator {
    db: DbClient,
}

impl BalanceCalculator {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }

    /// Dashboard for the active trip.
    pub async fn dashboard(&self) -> LedgerResult<DashboardView> {
        let trip_id = {
            let mut conn = self.db.pool.acquire().await?;
            TripRepository::find_active(&mut conn)
                .await?
                .ok_or(LedgerError::NoActiveTrip)?
                .id
        };
        self.dashboard_for(trip_id).await
    }

    pub async fn dashboard_for(&self, trip_id: i64) -> LedgerResult<DashboardView> {
        let mut conn = self.db.pool.acquire().await?;

        let trip = TripRepository::fetch(&mut conn, trip_id)
            .await?
            .ok_or(LedgerError::NotFound {
                entity: "trip",
                id: trip_id,
            })?;
        let members = TripRepository::list_members(&mut conn, trip_id).await?;
        let payments = PaymentRepository::list_for_trip(&mut conn, trip_id).await?;

        let riders = rider_balances(&members, &payments);
        let totals = trip_totals(&trip, &riders);

        Ok(DashboardView {
            trip,
            riders,
            totals,
        })
    }
}

/// Sum of a rider's payments on the trip. Summing a materialized list keeps
/// the empty case at zero; an absent value never reaches the arithmetic.
pub fn collected_for(payments: &[Payment], rider_id: i64) -> i64 {
    payments
        .iter()
        .filter(|p| p.rider_id == rider_id)
        .map(|p| p.amount)
        .sum()
}

pub fn rider_balances(members: &[RosterMember], payments: &[Payment]) -> Vec<RiderBalance> {
    members
        .iter()
        .map(|member| {
            let collected = collected_for(payments, member.rider_id);
            RiderBalance {
                rider_id: member.rider_id,
                name: member.name.clone(),
                seats: member.seats,
                balance: member.balance,
                collected,
                remaining_balance: member.balance - collected,
            }
        })
        .collect()
}

pub fn trip_totals(trip: &Trip, riders: &[RiderBalance]) -> TripTotals {
    let total_collected: i64 = riders.iter().map(|r| r.collected).sum();
    let reserved_seats: i64 = riders.iter().map(|r| r.seats).sum();

    TripTotals {
        total_collected,
        remaining_funds: trip.cost_of_rental - total_collected,
        reserved_seats,
        remaining_seats: trip.total_seats - reserved_seats,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::testutil::test_db;
    use crate::{LogNotifier, RosterManager, TripManager};
    use omnibus_domain::{PaymentDraft, RiderDraft, TripDraft};

    fn member(rider_id: i64, name: &str, seats: i64, balance: i64) -> RosterMember {
        RosterMember {
            rider_id,
            name: name.to_string(),
            seats,
            balance,
            instructions_sent: false,
        }
    }

    fn payment(rider_id: i64, amount: i64) -> Payment {
        Payment {
            id: 0,
            rider_id,
            trip_id: 1,
            paid_on: NaiveDate::from_ymd_opt(2026, 5, 15).unwrap(),
            amount,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_zero_payments_collects_zero_not_null() {
        let members = vec![member(1, "Ada", 2, 20_000)];
        let balances = rider_balances(&members, &[]);

        assert_eq!(balances[0].collected, 0);
        assert_eq!(balances[0].remaining_balance, 20_000);
    }

    #[test]
    fn test_per_rider_sums_ignore_other_riders() {
        let members = vec![member(1, "Ada", 2, 20_000), member(2, "Lin", 1, 10_000)];
        let payments = vec![payment(1, 5_000), payment(2, 2_500), payment(1, 1_000)];

        let balances = rider_balances(&members, &payments);
        assert_eq!(balances[0].collected, 6_000);
        assert_eq!(balances[0].remaining_balance, 14_000);
        assert_eq!(balances[1].collected, 2_500);
    }

    #[tokio::test]
    async fn test_dashboard_matches_worked_scenario() {
        // Trip: rental 1000.00, 100.00/seat, 10 seats. Rider A takes 2
        // seats and pays 150.00.
        let db = test_db().await;
        let trips = TripManager::new(db.clone());
        let roster = RosterManager::new(db.clone(), Arc::new(LogNotifier));
        let calc = BalanceCalculator::new(db.clone());

        let trip = trips
            .create_trip(TripDraft {
                name: "lake charter".into(),
                start_date: "2026-06-01".into(),
                end_date: "2026-06-03".into(),
                cost_of_rental: 100_000,
                cost_per_seat: 10_000,
                total_seats: 10,
            })
            .await
            .unwrap();
        trips.activate_trip(trip.id).await.unwrap();

        let (rider, member) = roster
            .add_rider(
                RiderDraft {
                    name: "Rider A".into(),
                    email: None,
                    phone: None,
                    phone_alt: None,
                    address: None,
                    city: None,
                    postal_code: None,
                    emergency_contacts: vec![],
                    medical_note: None,
                },
                2,
            )
            .await
            .unwrap();
        assert_eq!(member.balance, 20_000);

        roster
            .add_payment(PaymentDraft {
                rider_id: rider.id,
                paid_on: "2026-05-20".into(),
                amount: 15_000,
            })
            .await
            .unwrap();

        // The new payment is visible on the immediately following read.
        let view = calc.dashboard().await.unwrap();
        assert_eq!(view.riders.len(), 1);
        assert_eq!(view.riders[0].collected, 15_000);
        assert_eq!(view.riders[0].remaining_balance, 5_000);
        assert_eq!(
            view.totals,
            omnibus_domain::TripTotals {
                total_collected: 15_000,
                remaining_funds: 85_000,
                reserved_seats: 2,
                remaining_seats: 8,
            }
        );
    }

    #[tokio::test]
    async fn test_dashboard_requires_active_trip() {
        let db = test_db().await;
        let calc = BalanceCalculator::new(db.clone());

        let err = calc.dashboard().await.unwrap_err();
        assert!(matches!(err, LedgerError::NoActiveTrip));
    }
}
