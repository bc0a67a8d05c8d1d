use anyhow::anyhow;
use serde_json::{Map, Value};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{ProfilePayload, ProfileRow, ResumeFile};

/// Shallow merge: every top-level key present in `incoming` replaces the
/// stored value wholesale. Nested objects (address, workAuthorization) and
/// arrays are NOT deep-merged — sending `address` replaces the whole address
/// block. Keys absent from `incoming` keep their stored value.
pub fn merge_profile_fields(stored: &Value, incoming: &Value) -> Value {
    let mut merged = match stored {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    if let Value::Object(incoming) = incoming {
        for (key, value) in incoming {
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}

/// Persists a profile save: merges `payload` into the stored document
/// (creating it lazily on first save) and, when `resume` is present,
/// replaces the stored resume artifact unconditionally. Fields and resume
/// go out in a single statement, so the write is atomic per document.
pub async fn save_profile(
    pool: &PgPool,
    user_id: Uuid,
    payload: &ProfilePayload,
    resume: Option<&ResumeFile>,
) -> Result<ProfileRow, AppError> {
    let incoming = serde_json::to_value(payload).map_err(|e| anyhow!(e))?;

    let stored: Option<Value> =
        sqlx::query_scalar("SELECT data FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    let is_new = stored.is_none();
    let data = merge_profile_fields(&stored.unwrap_or(Value::Null), &incoming);

    let row = match resume {
        Some(file) => {
            sqlx::query_as::<_, ProfileRow>(
                r#"
                INSERT INTO user_profiles (id, user_id, data, resume, resume_content_type, resume_filename)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (user_id) DO UPDATE SET
                    data = EXCLUDED.data,
                    resume = EXCLUDED.resume,
                    resume_content_type = EXCLUDED.resume_content_type,
                    resume_filename = EXCLUDED.resume_filename,
                    updated_at = now()
                RETURNING id, user_id, data, resume_content_type, resume_filename,
                          created_at, updated_at
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&data)
            .bind(&file.data)
            .bind(&file.content_type)
            .bind(&file.filename)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, ProfileRow>(
                r#"
                INSERT INTO user_profiles (id, user_id, data)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id) DO UPDATE SET
                    data = EXCLUDED.data,
                    updated_at = now()
                RETURNING id, user_id, data, resume_content_type, resume_filename,
                          created_at, updated_at
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&data)
            .fetch_one(pool)
            .await?
        }
    };

    if is_new {
        info!("Created profile {} for user {user_id}", row.id);
    }
    Ok(row)
}

/// Attaches an uploaded resume to the user's profile, creating an otherwise
/// empty profile row when none exists yet. Always replaces any previously
/// stored document.
pub async fn attach_resume(
    pool: &PgPool,
    user_id: Uuid,
    file: &ResumeFile,
) -> Result<ProfileRow, AppError> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO user_profiles (id, user_id, data, resume, resume_content_type, resume_filename)
        VALUES ($1, $2, '{}'::jsonb, $3, $4, $5)
        ON CONFLICT (user_id) DO UPDATE SET
            resume = EXCLUDED.resume,
            resume_content_type = EXCLUDED.resume_content_type,
            resume_filename = EXCLUDED.resume_filename,
            updated_at = now()
        RETURNING id, user_id, data, resume_content_type, resume_filename,
                  created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&file.data)
    .bind(&file.content_type)
    .bind(&file.filename)
    .fetch_one(pool)
    .await?;

    info!(
        "Stored resume '{}' ({} bytes) for user {user_id}",
        file.filename,
        file.data.len()
    );
    Ok(row)
}

/// Loads the stored resume for a user, or `None` when the user has no
/// profile or the profile has no resume attached.
pub async fn fetch_resume(pool: &PgPool, user_id: Uuid) -> Result<Option<ResumeFile>, AppError> {
    let row: Option<(Vec<u8>, Option<String>, Option<String>)> = sqlx::query_as(
        r#"
        SELECT resume, resume_content_type, resume_filename
        FROM user_profiles
        WHERE user_id = $1 AND resume IS NOT NULL
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(data, content_type, filename)| ResumeFile {
        data,
        content_type: content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
        filename: filename.unwrap_or_else(|| "resume".to_string()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_overwrites_provided_keys_and_keeps_the_rest() {
        let stored = json!({"firstName": "Ada", "lastName": "Lovelace", "skills": ["Math"]});
        let incoming = json!({"firstName": "Augusta", "cellPhone": "555-0100"});
        let merged = merge_profile_fields(&stored, &incoming);
        assert_eq!(merged["firstName"], "Augusta");
        assert_eq!(merged["lastName"], "Lovelace");
        assert_eq!(merged["skills"], json!(["Math"]));
        assert_eq!(merged["cellPhone"], "555-0100");
    }

    #[test]
    fn merge_replaces_nested_objects_wholesale() {
        let stored = json!({"address": {"city": "London", "country": "UK"}});
        let incoming = json!({"address": {"city": "Cambridge"}});
        let merged = merge_profile_fields(&stored, &incoming);
        // Shallow merge: the old country is gone with the rest of the block.
        assert_eq!(merged["address"], json!({"city": "Cambridge"}));
    }

    #[test]
    fn merge_replaces_arrays_wholesale() {
        let stored = json!({"skills": ["Math", "Latin"]});
        let incoming = json!({"skills": ["Rust"]});
        let merged = merge_profile_fields(&stored, &incoming);
        assert_eq!(merged["skills"], json!(["Rust"]));
    }

    #[test]
    fn merge_into_empty_document_seeds_from_payload() {
        let incoming = json!({"firstName": "Ada"});
        let merged = merge_profile_fields(&Value::Null, &incoming);
        assert_eq!(merged, json!({"firstName": "Ada"}));
    }

    #[test]
    fn empty_payload_changes_nothing() {
        let stored = json!({"firstName": "Ada"});
        let merged = merge_profile_fields(&stored, &json!({}));
        assert_eq!(merged, stored);
    }
}
