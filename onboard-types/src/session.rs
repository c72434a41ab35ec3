use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated visitor, resolved from an access token.
///
/// Sessions are created by the record store before the visitor ever shows
/// up; the access gate only looks them up and stamps the first access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque record identifier.
    pub id: String,

    /// Contact address the token was sent to.
    #[serde(default)]
    pub email: Option<String>,

    /// Whether the record may be used.
    #[serde(rename = "is_active")]
    pub active: bool,

    /// When the record was activated.
    #[serde(default)]
    pub activated_at: Option<DateTime<Utc>>,

    /// When the visitor first opened the link, if ever.
    #[serde(default)]
    pub first_access_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create an active session that has never been accessed.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            active: true,
            activated_at: None,
            first_access_at: None,
        }
    }

    /// Set the contact address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the activation timestamp.
    pub fn with_activated_at(mut self, at: DateTime<Utc>) -> Self {
        self.activated_at = Some(at);
        self
    }

    /// Set the first-access timestamp.
    pub fn with_first_access_at(mut self, at: DateTime<Utc>) -> Self {
        self.first_access_at = Some(at);
        self
    }

    /// Mark the session inactive.
    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    /// Check if the visitor has opened the link before.
    pub fn has_been_accessed(&self) -> bool {
        self.first_access_at.is_some()
    }

    /// The first eight characters of the id, for greetings and log lines.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(8) {
            Some((end, _)) => &self.id[..end],
            None => &self.id,
        }
    }
}
