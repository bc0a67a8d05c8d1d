use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// POST /login
/// Google-style login: email + display name only. Finds or creates the
/// user, then issues an access/refresh token pair.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (email, name) = validate_login(&req)?;

    let user = find_or_create_user(&state.db, email, name).await?;

    let access_token = state.tokens.issue_access_token(&user)?;
    let refresh_token = state.tokens.issue_refresh_token(&user)?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user,
        access_token,
        refresh_token,
    }))
}

/// Both fields are required and must be non-blank. Rejecting here means the
/// handler performs no write on bad input.
fn validate_login(req: &LoginRequest) -> Result<(&str, &str), AppError> {
    match (req.email.as_deref(), req.name.as_deref()) {
        (Some(email), Some(name)) if !email.trim().is_empty() && !name.trim().is_empty() => {
            Ok((email, name))
        }
        _ => Err(AppError::Validation(
            "Email and name are required".to_string(),
        )),
    }
}

/// Lookup by email, inserting on first login. The upsert makes two
/// concurrent first logins for the same email first-write-wins: the UNIQUE
/// constraint guarantees a single surviving row, and the no-op
/// `DO UPDATE` lets the loser read that row back instead of erroring.
async fn find_or_create_user(pool: &PgPool, email: &str, name: &str) -> Result<User, AppError> {
    if let Some(user) = User::find_by_email(pool, email).await? {
        return Ok(user);
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, name)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
        RETURNING id, email, name, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(name)
    .fetch_one(pool)
    .await?;

    info!("New user created: {} ({})", user.id, user.email);
    Ok(user)
}
