use omnibus_domain::views::{AddRidersReport, SkippedSeatRequest};
use omnibus_domain::{RosterEntry, RosterView, SeatRequest, Trip, TripDraft};
use omnibus_store::{DbClient, RiderRepository, TripRepository};

use crate::{parse_date, LedgerError, LedgerResult};

/// Trip lifecycle: creation, the single-active-trip pointer, and roster
/// composition.
pub struct TripManager {
    db: DbClient,
}

impl TripManager {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }

    /// Validate and persist a new trip. Rejects without touching the store.
    pub async fn create_trip(&self, draft: TripDraft) -> LedgerResult<Trip> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("trip name must not be empty".into()));
        }

        let start_date = parse_date("start_date", &draft.start_date)?;
        let end_date = parse_date("end_date", &draft.end_date)?;
        if end_date < start_date {
            return Err(LedgerError::Validation(
                "end_date precedes start_date".into(),
            ));
        }

        if draft.cost_of_rental < 0 || draft.cost_per_seat < 0 {
            return Err(LedgerError::Validation(
                "costs must be non-negative".into(),
            ));
        }
        if draft.total_seats < 1 {
            return Err(LedgerError::Validation(
                "total_seats must be a positive integer".into(),
            ));
        }

        let mut conn = self.db.pool.acquire().await?;
        let trip = TripRepository::insert(
            &mut conn,
            name,
            start_date,
            end_date,
            draft.cost_of_rental,
            draft.cost_per_seat,
            draft.total_seats,
        )
        .await?;

        Ok(trip)
    }

    /// Make `trip_id` the single active trip. The deactivate-all and
    /// activate-one steps commit together, so no state with two active
    /// trips (or none, when one existed) is ever visible.
    pub async fn activate_trip(&self, trip_id: i64) -> LedgerResult<Trip> {
        let mut tx = self.db.pool.begin().await?;

        let matched = TripRepository::set_active(&mut tx, trip_id).await?;
        if matched == 0 {
            return Err(LedgerError::NotFound {
                entity: "trip",
                id: trip_id,
            });
        }

        tx.commit().await?;

        let mut conn = self.db.pool.acquire().await?;
        TripRepository::fetch(&mut conn, trip_id)
            .await?
            .ok_or(LedgerError::NotFound {
                entity: "trip",
                id: trip_id,
            })
    }

    /// Batch roster add with continue-on-error semantics: entries that fail
    /// validation are reported in the result, not fatal to the batch.
    pub async fn add_riders_to_trip(
        &self,
        trip_id: i64,
        requests: &[SeatRequest],
    ) -> LedgerResult<AddRidersReport> {
        let mut tx = self.db.pool.begin().await?;

        let trip = TripRepository::fetch(&mut tx, trip_id)
            .await?
            .ok_or(LedgerError::NotFound {
                entity: "trip",
                id: trip_id,
            })?;

        let mut report = AddRidersReport::default();

        for request in requests {
            if request.seats < 1 {
                report.skipped.push(SkippedSeatRequest {
                    rider_id: request.rider_id,
                    reason: "seats must be at least 1".into(),
                });
                continue;
            }

            if RiderRepository::fetch(&mut tx, request.rider_id)
                .await?
                .is_none()
            {
                report.skipped.push(SkippedSeatRequest {
                    rider_id: request.rider_id,
                    reason: "rider does not exist".into(),
                });
                continue;
            }

            if TripRepository::find_member(&mut tx, trip_id, request.rider_id)
                .await?
                .is_some()
            {
                report.skipped.push(SkippedSeatRequest {
                    rider_id: request.rider_id,
                    reason: "rider is already on this trip".into(),
                });
                continue;
            }

            let balance = request.seats * trip.cost_per_seat;
            let member = TripRepository::add_member(
                &mut tx,
                trip_id,
                request.rider_id,
                request.seats,
                balance,
            )
            .await?;
            report.added.push(member);
        }

        tx.commit().await?;
        Ok(report)
    }

    /// Full roster detail for export/print: every rider on the trip with
    /// contact info, emergency contacts, and medical notes.
    pub async fn get_roster(&self, trip_id: i64) -> LedgerResult<RosterView> {
        let mut conn = self.db.pool.acquire().await?;

        let trip = TripRepository::fetch(&mut conn, trip_id)
            .await?
            .ok_or(LedgerError::NotFound {
                entity: "trip",
                id: trip_id,
            })?;

        let members = TripRepository::list_members(&mut conn, trip_id).await?;

        let mut entries = Vec::with_capacity(members.len());
        for member in members {
            let rider = RiderRepository::fetch(&mut conn, member.rider_id)
                .await?
                .ok_or(LedgerError::NotFound {
                    entity: "rider",
                    id: member.rider_id,
                })?;
            let emergency_contacts =
                RiderRepository::list_contacts(&mut conn, member.rider_id).await?;
            let medical_note =
                RiderRepository::fetch_medical_note(&mut conn, member.rider_id).await?;

            entries.push(RosterEntry {
                rider_id: rider.id,
                name: rider.name,
                phone: rider.phone,
                email: rider.email,
                seats: member.seats,
                instructions_sent: member.instructions_sent,
                emergency_contacts,
                medical_note,
            });
        }

        Ok(RosterView { trip, entries })
    }

    pub async fn get_trip(&self, trip_id: i64) -> LedgerResult<Trip> {
        let mut conn = self.db.pool.acquire().await?;
        TripRepository::fetch(&mut conn, trip_id)
            .await?
            .ok_or(LedgerError::NotFound {
                entity: "trip",
                id: trip_id,
            })
    }

    pub async fn list_trips(&self) -> LedgerResult<Vec<Trip>> {
        let mut conn = self.db.pool.acquire().await?;
        Ok(TripRepository::list(&mut conn).await?)
    }

    pub async fn active_trip(&self) -> LedgerResult<Option<Trip>> {
        let mut conn = self.db.pool.acquire().await?;
        Ok(TripRepository::find_active(&mut conn).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_db;
    use omnibus_domain::RiderDraft;

    fn trip_draft(name: &str) -> TripDraft {
        TripDraft {
            name: name.to_string(),
            start_date: "2026-06-01".into(),
            end_date: "2026-06-03".into(),
            cost_of_rental: 100_000,
            cost_per_seat: 10_000,
            total_seats: 10,
        }
    }

    fn rider_draft(name: &str) -> RiderDraft {
        RiderDraft {
            name: name.to_string(),
            email: None,
            phone: None,
            phone_alt: None,
            address: None,
            city: None,
            postal_code: None,
            emergency_contacts: vec![],
            medical_note: None,
        }
    }

    #[tokio::test]
    async fn test_create_trip_rejects_bad_input_without_mutation() {
        let db = test_db().await;
        let trips = TripManager::new(db.clone());

        let cases = vec![
            TripDraft {
                name: "  ".into(),
                ..trip_draft("x")
            },
            TripDraft {
                start_date: "june 1st".into(),
                ..trip_draft("bad date")
            },
            TripDraft {
                end_date: "2026-05-01".into(),
                ..trip_draft("backwards")
            },
            TripDraft {
                cost_per_seat: -1,
                ..trip_draft("negative cost")
            },
            TripDraft {
                total_seats: 0,
                ..trip_draft("no seats")
            },
        ];

        for draft in cases {
            let err = trips.create_trip(draft).await.unwrap_err();
            assert!(matches!(err, LedgerError::Validation(_)), "got {err:?}");
        }

        assert!(trips.list_trips().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_activation_is_exclusive() {
        let db = test_db().await;
        let trips = TripManager::new(db.clone());

        let a = trips.create_trip(trip_draft("spring run")).await.unwrap();
        let b = trips.create_trip(trip_draft("summer run")).await.unwrap();
        let c = trips.create_trip(trip_draft("fall run")).await.unwrap();

        assert!(trips.active_trip().await.unwrap().is_none());

        for id in [a.id, b.id, c.id, a.id] {
            trips.activate_trip(id).await.unwrap();
            let active: Vec<_> = trips
                .list_trips()
                .await
                .unwrap()
                .into_iter()
                .filter(|t| t.is_active)
                .collect();
            assert_eq!(active.len(), 1);
            assert_eq!(active[0].id, id);
        }
    }

    #[tokio::test]
    async fn test_activate_missing_trip_leaves_pointer_alone() {
        let db = test_db().await;
        let trips = TripManager::new(db.clone());

        let trip = trips.create_trip(trip_draft("only trip")).await.unwrap();
        trips.activate_trip(trip.id).await.unwrap();

        let err = trips.activate_trip(9999).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { entity: "trip", .. }));

        let active = trips.active_trip().await.unwrap().expect("still active");
        assert_eq!(active.id, trip.id);
    }

    #[tokio::test]
    async fn test_add_riders_batch_skips_bad_entries() {
        let db = test_db().await;
        let trips = TripManager::new(db.clone());
        let trip = trips.create_trip(trip_draft("charter")).await.unwrap();

        let rider = {
            let mut conn = db.pool.acquire().await.unwrap();
            RiderRepository::insert(&mut conn, &rider_draft("Ada"))
                .await
                .unwrap()
        };

        let report = trips
            .add_riders_to_trip(
                trip.id,
                &[
                    SeatRequest {
                        rider_id: rider.id,
                        seats: 2,
                    },
                    SeatRequest {
                        rider_id: 9999,
                        seats: 1,
                    },
                    SeatRequest {
                        rider_id: rider.id,
                        seats: 0,
                    },
                ],
            )
            .await
            .unwrap();

        assert_eq!(report.added.len(), 1);
        assert_eq!(report.added[0].balance, 2 * trip.cost_per_seat);
        assert_eq!(report.skipped.len(), 2);

        // A second add for the same pair is rejected without mutating state.
        let report = trips
            .add_riders_to_trip(
                trip.id,
                &[SeatRequest {
                    rider_id: rider.id,
                    seats: 3,
                }],
            )
            .await
            .unwrap();
        assert!(report.added.is_empty());
        assert_eq!(report.skipped.len(), 1);

        let mut conn = db.pool.acquire().await.unwrap();
        let member = TripRepository::find_member(&mut conn, trip.id, rider.id)
            .await
            .unwrap()
            .expect("membership kept");
        assert_eq!(member.seats, 2);
    }

    #[tokio::test]
    async fn test_roster_includes_contacts_and_notes() {
        let db = test_db().await;
        let trips = TripManager::new(db.clone());
        let trip = trips.create_trip(trip_draft("field trip")).await.unwrap();

        let rider = {
            let mut conn = db.pool.acquire().await.unwrap();
            let rider = RiderRepository::insert(&mut conn, &rider_draft("Grace"))
                .await
                .unwrap();
            RiderRepository::replace_contacts(
                &mut conn,
                rider.id,
                &[omnibus_domain::ContactDraft {
                    name: "Howard".into(),
                    phone: "555-0100".into(),
                    relationship: Some("spouse".into()),
                }],
            )
            .await
            .unwrap();
            RiderRepository::set_medical_note(&mut conn, rider.id, Some("peanut allergy"))
                .await
                .unwrap();
            rider
        };

        trips
            .add_riders_to_trip(
                trip.id,
                &[SeatRequest {
                    rider_id: rider.id,
                    seats: 1,
                }],
            )
            .await
            .unwrap();

        let roster = trips.get_roster(trip.id).await.unwrap();
        assert_eq!(roster.entries.len(), 1);
        let entry = &roster.entries[0];
        assert_eq!(entry.name, "Grace");
        assert_eq!(entry.emergency_contacts.len(), 1);
        assert_eq!(
            entry.medical_note.as_ref().map(|n| n.notes.as_str()),
            Some("peanut allergy")
        );
    }
}
