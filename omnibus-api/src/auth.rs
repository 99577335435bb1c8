use axum::{extract::State, routing::post, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::info;

use omnibus_store::{AdminRepository, DbClient};

use crate::error::AppError;
use crate::middleware::auth::AdminClaims;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/auth/login", post(login))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let admin = AdminRepository::find_by_username(&mut conn, &req.username)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::AuthenticationError("invalid credentials".into()))?;

    let verified = bcrypt::verify(&req.password, &admin.password_hash)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    if !verified {
        return Err(AppError::AuthenticationError("invalid credentials".into()));
    }

    let claims = AdminClaims {
        sub: admin.username,
        role: "ADMIN".to_owned(),
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))?;

    Ok(Json(AuthResponse { token }))
}

/// Seed the admin table from config when it is empty, so a fresh install
/// has a way in.
pub async fn ensure_bootstrap_admin(
    db: &DbClient,
    username: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = db.pool.acquire().await?;

    if AdminRepository::count(&mut conn).await? > 0 {
        return Ok(());
    }

    let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    AdminRepository::insert(&mut conn, username, &hash).await?;
    info!("Seeded bootstrap admin account '{}'", username);
    Ok(())
}
