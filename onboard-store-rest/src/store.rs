//! HTTP implementation of the record store and submission sink.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use onboard::{AnswerSet, RecordStore, Session, StoreError, SubmissionSink, SubmitError};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::{debug, info};

use crate::record::FirstAccessPatch;
use crate::{ConfigError, LinkRecord, RestConfig, RestError, SubmissionRow};

const MAX_ERROR_BODY_BYTES: usize = 4 * 1024;

/// Record store talking to a PostgREST-style API.
///
/// Implements both [`RecordStore`] (token lookup, first-access stamp) and
/// [`SubmissionSink`] (answer insert), so one instance serves a whole flow.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: reqwest::Client,
    config: Arc<RestConfig>,
}

impl RestStore {
    /// Build a store with an HTTP client authenticated by the configured key.
    pub fn new(config: RestConfig) -> Result<Self, RestError> {
        let key = config.api_key().expose();
        let invalid = |_| ConfigError::MalformedKey("key is not a valid header value".to_string());

        let mut apikey = HeaderValue::from_str(key).map_err(invalid)?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid)?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        if let Ok(claims) = config.api_key().claims() {
            info!(
                project = claims.project_ref.as_deref().unwrap_or("?"),
                role = claims.role.as_deref().unwrap_or("?"),
                url = %config.base_url(),
                "record store configured"
            );
        }

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    /// Check that the API is reachable and the key is accepted.
    pub async fn ping(&self) -> Result<(), RestError> {
        let url = self.config.table_url(self.config.users_table())?;
        let response = self
            .client
            .get(url)
            .query(&[("select", "count"), ("limit", "1")])
            .send()
            .await?;
        check(response).await?;
        info!("record store reachable");
        Ok(())
    }

    /// Fetch active records carrying `token`; at most two are requested so
    /// ambiguity can be detected.
    pub async fn fetch_active(&self, token: &str) -> Result<Vec<LinkRecord>, RestError> {
        let url = self.config.table_url(self.config.users_table())?;
        debug!(table = self.config.users_table(), "looking up magic token");
        let response = self
            .client
            .get(url)
            .query(&[
                ("select", "*".to_string()),
                ("magic_token", format!("eq.{token}")),
                ("is_active", "eq.true".to_string()),
                ("limit", "2".to_string()),
            ])
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Set `first_access_at` on record `id`.
    pub async fn update_first_access(&self, id: &str, at: DateTime<Utc>) -> Result<(), RestError> {
        let url = self.config.table_url(self.config.users_table())?;
        debug!(id, "recording first access");
        let response = self
            .client
            .patch(url)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(&FirstAccessPatch { first_access_at: at })
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Insert one submission row.
    pub async fn insert_submission(&self, row: &SubmissionRow<'_>) -> Result<(), RestError> {
        let url = self.config.table_url(self.config.responses_table())?;
        debug!(table = self.config.responses_table(), "inserting submission");
        let response = self
            .client
            .post(url)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

/// Turn a non-success response into [`RestError::Status`], keeping a bounded
/// piece of the body for the message.
async fn check(response: reqwest::Response) -> Result<reqwest::Response, RestError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY_BYTES {
        let mut end = MAX_ERROR_BODY_BYTES;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push_str("...(truncated)");
    }
    Err(RestError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl RecordStore for RestStore {
    async fn find_active_by_token(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let mut records = self
            .fetch_active(token)
            .await
            .map_err(StoreError::backend)?;
        match records.len() {
            0 => Ok(None),
            1 => Ok(records.pop().map(Session::from)),
            n => Err(StoreError::Ambiguous(n)),
        }
    }

    async fn mark_first_access(&self, id: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.update_first_access(id, at)
            .await
            .map_err(StoreError::backend)
    }
}

#[async_trait]
impl SubmissionSink for RestStore {
    async fn submit(&self, session: &Session, answers: &AnswerSet) -> Result<(), SubmitError> {
        let row = SubmissionRow {
            user_id: &session.id,
            answers,
            submitted_at: Utc::now(),
        };
        self.insert_submission(&row)
            .await
            .map_err(SubmitError::backend)
    }
}
