use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::profile::{ProfilePayload, ProfileRow, ResumeFile};
use crate::models::user::User;
use crate::profile::store;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SaveProfileResponse {
    pub message: String,
    pub profile: ProfileRow,
}

/// POST /profile/:email
///
/// Accepts either a JSON body of profile fields or a multipart body with a
/// `profile` JSON part plus an optional `resume` file part. An attached file
/// always replaces the stored resume; the JSON payload alone never touches
/// it.
pub async fn handle_save_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
    req: Request,
) -> Result<Json<SaveProfileResponse>, AppError> {
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let (payload, resume) = extract_profile_request(req).await?;
    let profile = store::save_profile(&state.db, user.id, &payload, resume.as_ref()).await?;

    let message = if resume.is_some() {
        "Profile and document saved successfully"
    } else {
        "Profile saved successfully"
    };
    Ok(Json(SaveProfileResponse {
        message: message.to_string(),
        profile,
    }))
}

/// Content-type dispatch: multipart bodies carry the payload in a `profile`
/// part, everything else is parsed as a plain JSON body.
async fn extract_profile_request(
    req: Request,
) -> Result<(ProfilePayload, Option<ResumeFile>), AppError> {
    let is_multipart = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|ct| ct.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        let multipart = Multipart::from_request(req, &())
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;
        parse_profile_multipart(multipart).await
    } else {
        let Json(payload) = Json::<ProfilePayload>::from_request(req, &())
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;
        Ok((payload, None))
    }
}

async fn parse_profile_multipart(
    mut multipart: Multipart,
) -> Result<(ProfilePayload, Option<ResumeFile>), AppError> {
    let mut payload = ProfilePayload::default();
    let mut resume = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        match field.name() {
            Some("profile") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                payload = serde_json::from_str(&text)
                    .map_err(|e| AppError::Validation(format!("Invalid profile JSON: {e}")))?;
            }
            Some("resume") => {
                let filename = field.file_name().unwrap_or("resume").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?
                    .to_vec();
                resume = Some(ResumeFile {
                    data,
                    content_type,
                    filename,
                });
            }
            // Unknown parts are ignored.
            _ => {}
        }
    }

    Ok((payload, resume))
}
