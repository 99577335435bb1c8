use chrono::{NaiveDate, Utc};
use sqlx::SqliteConnection;

use omnibus_domain::views::RosterMember;
use omnibus_domain::{Trip, TripRider};

/// Persistence for trips and the trip_riders association.
///
/// Every function runs against a caller-supplied connection, so multi-step
/// operations share one transaction.
pub struct TripRepository;

impl TripRepository {
    pub async fn insert(
        conn: &mut SqliteConnection,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        cost_of_rental: i64,
        cost_per_seat: i64,
        total_seats: i64,
    ) -> Result<Trip, sqlx::Error> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO trips (name, start_date, end_date, cost_of_rental, cost_per_seat, total_seats, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(name)
        .bind(start_date)
        .bind(end_date)
        .bind(cost_of_rental)
        .bind(cost_per_seat)
        .bind(total_seats)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(Trip {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            start_date,
            end_date,
            cost_of_rental,
            cost_per_seat,
            total_seats,
            is_active: false,
            created_at: now,
        })
    }

    pub async fn fetch(
        conn: &mut SqliteConnection,
        id: i64,
    ) -> Result<Option<Trip>, sqlx::Error> {
        sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Trip>, sqlx::Error> {
        sqlx::query_as::<_, Trip>("SELECT * FROM trips ORDER BY created_at DESC, id DESC")
            .fetch_all(&mut *conn)
            .await
    }

    /// Flip the global active pointer to `trip_id`. Returns the number of
    /// rows the activate step matched; 0 means the trip does not exist.
    ///
    /// Callers must run this inside a transaction so the cleared state is
    /// never visible on its own.
    pub async fn set_active(
        conn: &mut SqliteConnection,
        trip_id: i64,
    ) -> Result<u64, sqlx::Error> {
        sqlx::query("UPDATE trips SET is_active = 0 WHERE is_active = 1")
            .execute(&mut *conn)
            .await?;

        let result = sqlx::query("UPDATE trips SET is_active = 1 WHERE id = ?")
            .bind(trip_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn find_active(conn: &mut SqliteConnection) -> Result<Option<Trip>, sqlx::Error> {
        sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE is_active = 1")
            .fetch_optional(&mut *conn)
            .await
    }

    pub async fn add_member(
        conn: &mut SqliteConnection,
        trip_id: i64,
        rider_id: i64,
        seats: i64,
        balance: i64,
    ) -> Result<TripRider, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO trip_riders (trip_id, rider_id, seats, balance, instructions_sent)
            VALUES (?, ?, ?, ?, 0)
            "#,
        )
        .bind(trip_id)
        .bind(rider_id)
        .bind(seats)
        .bind(balance)
        .execute(&mut *conn)
        .await?;

        Ok(TripRider {
            trip_id,
            rider_id,
            seats,
            balance,
            instructions_sent: false,
        })
    }

    pub async fn find_member(
        conn: &mut SqliteConnection,
        trip_id: i64,
        rider_id: i64,
    ) -> Result<Option<TripRider>, sqlx::Error> {
        sqlx::query_as::<_, TripRider>(
            "SELECT * FROM trip_riders WHERE trip_id = ? AND rider_id = ?",
        )
        .bind(trip_id)
        .bind(rider_id)
        .fetch_optional(&mut *conn)
        .await
    }

    pub async fn update_member(
        conn: &mut SqliteConnection,
        member: &TripRider,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE trip_riders SET seats = ?, balance = ?, instructions_sent = ?
            WHERE trip_id = ? AND rider_id = ?
            "#,
        )
        .bind(member.seats)
        .bind(member.balance)
        .bind(member.instructions_sent)
        .bind(member.trip_id)
        .bind(member.rider_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn remove_member(
        conn: &mut SqliteConnection,
        trip_id: i64,
        rider_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM trip_riders WHERE trip_id = ? AND rider_id = ?")
            .bind(trip_id)
            .bind(rider_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Drop every roster membership a rider holds, across all trips.
    pub async fn remove_all_memberships(
        conn: &mut SqliteConnection,
        rider_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM trip_riders WHERE rider_id = ?")
            .bind(rider_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_members(
        conn: &mut SqliteConnection,
        trip_id: i64,
    ) -> Result<Vec<RosterMember>, sqlx::Error> {
        sqlx::query_as::<_, RosterMember>(
            r#"
            SELECT tr.rider_id, r.name, tr.seats, tr.balance, tr.instructions_sent
            FROM trip_riders tr
            JOIN riders r ON r.id = tr.rider_id
            WHERE tr.trip_id = ?
            ORDER BY r.name, tr.rider_id
            "#,
        )
        .bind(trip_id)
        .fetch_all(&mut *conn)
        .await
    }
}
