use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

/// An admin account. Lives in the store crate only; the password hash never
/// crosses the API boundary.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

pub struct AdminRepository;

impl AdminRepository {
    pub async fn count(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admins")
            .fetch_one(&mut *conn)
            .await?;

        Ok(row.0)
    }

    pub async fn insert(
        conn: &mut SqliteConnection,
        username: &str,
        password_hash: &str,
    ) -> Result<Admin, sqlx::Error> {
        let now = Utc::now();

        let result =
            sqlx::query("INSERT INTO admins (username, password_hash, created_at) VALUES (?, ?, ?)")
                .bind(username)
                .bind(password_hash)
                .bind(now)
                .execute(&mut *conn)
                .await?;

        Ok(Admin {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
        })
    }

    pub async fn find_by_username(
        conn: &mut SqliteConnection,
        username: &str,
    ) -> Result<Option<Admin>, sqlx::Error> {
        sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE username = ?")
            .bind(username)
            .fetch_optional(&mut *conn)
            .await
    }
}
