use chrono::{DateTime, Utc};
use onboard::{AnswerSet, Session};
use serde::{Deserialize, Serialize};

/// A row of the visitor table, as the API returns it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkRecord {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub magic_token: Option<String>,
    #[serde(default)]
    pub activated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub first_access_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<LinkRecord> for Session {
    fn from(record: LinkRecord) -> Self {
        Session {
            id: record.id,
            email: record.email,
            active: record.is_active,
            activated_at: record.activated_at,
            first_access_at: record.first_access_at,
        }
    }
}

/// Body of the first-access update.
#[derive(Debug, Serialize)]
pub(crate) struct FirstAccessPatch {
    pub first_access_at: DateTime<Utc>,
}

/// A row inserted into the submissions table.
#[derive(Debug, Serialize)]
pub struct SubmissionRow<'a> {
    pub user_id: &'a str,
    pub answers: &'a AnswerSet,
    pub submitted_at: DateTime<Utc>,
}
