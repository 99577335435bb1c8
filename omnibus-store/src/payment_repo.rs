use chrono::{NaiveDate, Utc};
use sqlx::SqliteConnection;

use omnibus_domain::Payment;

pub struct PaymentRepository;

impl PaymentRepository {
    pub async fn insert(
        conn: &mut SqliteConnection,
        rider_id: i64,
        trip_id: i64,
        paid_on: NaiveDate,
        amount: i64,
    ) -> Result<Payment, sqlx::Error> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO payments (rider_id, trip_id, paid_on, amount, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(rider_id)
        .bind(trip_id)
        .bind(paid_on)
        .bind(amount)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(Payment {
            id: result.last_insert_rowid(),
            rider_id,
            trip_id,
            paid_on,
            amount,
            created_at: now,
        })
    }

    pub async fn fetch(
        conn: &mut SqliteConnection,
        id: i64,
    ) -> Result<Option<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    pub async fn update(conn: &mut SqliteConnection, payment: &Payment) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE payments SET paid_on = ?, amount = ? WHERE id = ?")
            .bind(payment.paid_on)
            .bind(payment.amount)
            .bind(payment.id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payments WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_for_trip(
        conn: &mut SqliteConnection,
        trip_id: i64,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE trip_id = ? ORDER BY paid_on, id",
        )
        .bind(trip_id)
        .fetch_all(&mut *conn)
        .await
    }

    pub async fn list_for_rider_on_trip(
        conn: &mut SqliteConnection,
        trip_id: i64,
        rider_id: i64,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE trip_id = ? AND rider_id = ? ORDER BY paid_on, id",
        )
        .bind(trip_id)
        .bind(rider_id)
        .fetch_all(&mut *conn)
        .await
    }

    /// Guard check for the simple rider-delete path.
    pub async fn exists_for_rider(
        conn: &mut SqliteConnection,
        rider_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM payments WHERE rider_id = ? LIMIT 1")
                .bind(rider_id)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(row.is_some())
    }

    pub async fn delete_for_rider(
        conn: &mut SqliteConnection,
        rider_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payments WHERE rider_id = ?")
            .bind(rider_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
