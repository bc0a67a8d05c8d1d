use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkAuthorization {
    #[serde(rename = "authorizedToWorkInUS", skip_serializing_if = "Option::is_none")]
    pub authorized_to_work_in_us: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_visa_sponsorship: Option<bool>,
}

/// The fields a client may set on a profile. Every field is optional so a
/// save request can carry any subset; serialization skips absent fields so
/// the shallow merge only sees keys the client actually provided.
///
/// Note there is deliberately no `resume` field here: the resume artifact is
/// only ever set from an uploaded file, never from the JSON payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_phone: Option<String>,
    #[serde(rename = "linkedIn", skip_serializing_if = "Option::is_none")]
    pub linked_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hear_about_us: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiences: Option<Vec<Experience>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub educations: Option<Vec<Education>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_authorization: Option<WorkAuthorization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ethnicity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veteran_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabilities: Option<String>,
}

/// Persisted profile document. The resume bytes live in a separate column
/// and are never selected into this row (or serialized back to clients);
/// only the metadata travels with the profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub data: Value,
    pub resume_content_type: Option<String>,
    pub resume_filename: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An uploaded resume held fully in memory for the duration of the request.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub data: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_only_provided_fields() {
        let payload = ProfilePayload {
            first_name: Some("Ada".to_string()),
            skills: Some(vec!["Rust".to_string()]),
            ..Default::default()
        };
        let value = serde_json::to_value(&payload).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["firstName"], "Ada");
        assert_eq!(obj["skills"], serde_json::json!(["Rust"]));
    }

    #[test]
    fn payload_ignores_unknown_fields() {
        // A stray `resume` key in the JSON body must never reach storage.
        let payload: ProfilePayload = serde_json::from_str(
            r#"{"firstName": "Ada", "resume": "hax", "whatever": 1}"#,
        )
        .unwrap();
        assert_eq!(payload.first_name.as_deref(), Some("Ada"));
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("resume").is_none());
    }

    #[test]
    fn wire_names_match_frontend() {
        let payload: ProfilePayload = serde_json::from_str(
            r#"{
                "linkedIn": "in/ada",
                "address": {"addressLine1": "1 Main St", "zipCode": "02139"},
                "workAuthorization": {"authorizedToWorkInUS": true}
            }"#,
        )
        .unwrap();
        assert_eq!(payload.linked_in.as_deref(), Some("in/ada"));
        let address = payload.address.unwrap();
        assert_eq!(address.address_line1.as_deref(), Some("1 Main St"));
        assert_eq!(address.zip_code.as_deref(), Some("02139"));
        assert_eq!(
            payload.work_authorization.unwrap().authorized_to_work_in_us,
            Some(true)
        );
    }
}
