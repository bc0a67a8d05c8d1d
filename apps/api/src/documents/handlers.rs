use axum::{
    extract::{Multipart, Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::profile::ResumeFile;
use crate::models::user::User;
use crate::profile::store;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
}

/// POST /upload/:email
/// Stores an uploaded resume into the user's profile. Only PDF and DOCX
/// files are accepted; anything else is rejected before touching storage.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(email): Path<String>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let file = read_file_part(multipart)
        .await?
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    if !is_allowed_resume(&file.filename) {
        return Err(AppError::Validation(
            "Only PDF and DOCX files are allowed".to_string(),
        ));
    }

    store::attach_resume(&state.db, user.id, &file).await?;

    Ok(Json(UploadResponse {
        message: "Document uploaded successfully".to_string(),
        filename: file.filename,
    }))
}

/// GET /download/:email
/// Streams the stored resume back verbatim with its original content
/// metadata. 404 when the user, profile, or resume is absent.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Response, AppError> {
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let resume = store::fetch_resume(&state.db, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No document found".to_string()))?;

    Ok((
        [
            (CONTENT_TYPE, resume.content_type.clone()),
            (CONTENT_DISPOSITION, content_disposition(&resume.filename)),
        ],
        resume.data,
    )
        .into_response())
}

/// Takes the first multipart part that carries a filename; other parts are
/// ignored.
async fn read_file_part(mut multipart: Multipart) -> Result<Option<ResumeFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.file_name().is_none() {
            continue;
        }
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
        return Ok(Some(ResumeFile {
            data,
            content_type,
            filename,
        }));
    }
    Ok(None)
}

/// Case-insensitive extension filter: resumes must be `.pdf` or `.docx`.
fn is_allowed_resume(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    lower.ends_with(".pdf") || lower.ends_with(".docx")
}

/// `attachment; filename="..."` with quotes and control characters stripped
/// so a stored filename cannot break the header.
fn content_disposition(filename: &str) -> String {
    let clean: String = filename
        .chars()
        .filter(|c| *c != '"' && !c.is_control())
        .collect();
    format!("attachment; filename=\"{clean}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_and_docx_accepted_any_case() {
        assert!(is_allowed_resume("resume.pdf"));
        assert!(is_allowed_resume("Resume.PDF"));
        assert!(is_allowed_resume("cv.docx"));
        assert!(is_allowed_resume("CV.DocX"));
    }

    #[test]
    fn other_extensions_rejected() {
        assert!(!is_allowed_resume("resume.doc"));
        assert!(!is_allowed_resume("resume.txt"));
        assert!(!is_allowed_resume("resume.pdf.exe"));
        assert!(!is_allowed_resume("resume"));
    }

    #[test]
    fn disposition_quotes_filename() {
        assert_eq!(
            content_disposition("my resume.pdf"),
            "attachment; filename=\"my resume.pdf\""
        );
    }

    #[test]
    fn disposition_strips_quotes_and_control_chars() {
        assert_eq!(
            content_disposition("a\"b\r\n.pdf"),
            "attachment; filename=\"ab.pdf\""
        );
    }
}
