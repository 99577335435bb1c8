use chrono::Utc;
use sqlx::SqliteConnection;

use omnibus_domain::{ContactDraft, EmergencyContact, MedicalNote, Rider, RiderDraft};

/// Persistence for riders and their satellite rows (emergency contacts and
/// the medical note).
pub struct RiderRepository;

impl RiderRepository {
    pub async fn insert(
        conn: &mut SqliteConnection,
        draft: &RiderDraft,
    ) -> Result<Rider, sqlx::Error> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO riders (name, email, phone, phone_alt, address, city, postal_code, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(&draft.phone_alt)
        .bind(&draft.address)
        .bind(&draft.city)
        .bind(&draft.postal_code)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(Rider {
            id: result.last_insert_rowid(),
            name: draft.name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            phone_alt: draft.phone_alt.clone(),
            address: draft.address.clone(),
            city: draft.city.clone(),
            postal_code: draft.postal_code.clone(),
            created_at: now,
        })
    }

    pub async fn fetch(
        conn: &mut SqliteConnection,
        id: i64,
    ) -> Result<Option<Rider>, sqlx::Error> {
        sqlx::query_as::<_, Rider>("SELECT * FROM riders WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    pub async fn update(conn: &mut SqliteConnection, rider: &Rider) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE riders
            SET name = ?, email = ?, phone = ?, phone_alt = ?, address = ?, city = ?, postal_code = ?
            WHERE id = ?
            "#,
        )
        .bind(&rider.name)
        .bind(&rider.email)
        .bind(&rider.phone)
        .bind(&rider.phone_alt)
        .bind(&rider.address)
        .bind(&rider.city)
        .bind(&rider.postal_code)
        .bind(rider.id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM riders WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Replace the rider's emergency contacts wholesale.
    pub async fn replace_contacts(
        conn: &mut SqliteConnection,
        rider_id: i64,
        contacts: &[ContactDraft],
    ) -> Result<Vec<EmergencyContact>, sqlx::Error> {
        Self::delete_contacts(&mut *conn, rider_id).await?;

        let mut saved = Vec::with_capacity(contacts.len());
        for contact in contacts {
            let result = sqlx::query(
                "INSERT INTO emergency_contacts (rider_id, name, phone, relationship) VALUES (?, ?, ?, ?)",
            )
            .bind(rider_id)
            .bind(&contact.name)
            .bind(&contact.phone)
            .bind(&contact.relationship)
            .execute(&mut *conn)
            .await?;

            saved.push(EmergencyContact {
                id: result.last_insert_rowid(),
                rider_id,
                name: contact.name.clone(),
                phone: contact.phone.clone(),
                relationship: contact.relationship.clone(),
            });
        }

        Ok(saved)
    }

    pub async fn list_contacts(
        conn: &mut SqliteConnection,
        rider_id: i64,
    ) -> Result<Vec<EmergencyContact>, sqlx::Error> {
        sqlx::query_as::<_, EmergencyContact>(
            "SELECT * FROM emergency_contacts WHERE rider_id = ? ORDER BY id",
        )
        .bind(rider_id)
        .fetch_all(&mut *conn)
        .await
    }

    pub async fn delete_contacts(
        conn: &mut SqliteConnection,
        rider_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM emergency_contacts WHERE rider_id = ?")
            .bind(rider_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Replace the rider's medical note. An empty or absent text clears it.
    pub async fn set_medical_note(
        conn: &mut SqliteConnection,
        rider_id: i64,
        notes: Option<&str>,
    ) -> Result<Option<MedicalNote>, sqlx::Error> {
        Self::delete_medical_note(&mut *conn, rider_id).await?;

        match notes {
            Some(text) if !text.trim().is_empty() => {
                let result =
                    sqlx::query("INSERT INTO medical_notes (rider_id, notes) VALUES (?, ?)")
                        .bind(rider_id)
                        .bind(text)
                        .execute(&mut *conn)
                        .await?;

                Ok(Some(MedicalNote {
                    id: result.last_insert_rowid(),
                    rider_id,
                    notes: text.to_string(),
                }))
            }
            _ => Ok(None),
        }
    }

    pub async fn fetch_medical_note(
        conn: &mut SqliteConnection,
        rider_id: i64,
    ) -> Result<Option<MedicalNote>, sqlx::Error> {
        sqlx::query_as::<_, MedicalNote>("SELECT * FROM medical_notes WHERE rider_id = ?")
            .bind(rider_id)
            .fetch_optional(&mut *conn)
            .await
    }

    pub async fn delete_medical_note(
        conn: &mut SqliteConnection,
        rider_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM medical_notes WHERE rider_id = ?")
            .bind(rider_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
