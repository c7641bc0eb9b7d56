//! HTTP client for the wellness CMS event endpoints.
//!
//! The CMS owns persistence; this client is pass-through CRUD glue plus
//! the coarse over-selecting read that feeds expansion. No wire format is
//! owned here beyond the serde shapes in `event` and `recurrence`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::error::{EngineError, EngineResult};
use crate::event::EventDefinition;
use crate::recurrence::RecurrenceRule;
use crate::service::EventStore;

/// Per-request timeout. A slow CMS surfaces as a timeout error, never as
/// an empty occurrence list.
const STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Error body shape returned by the CMS.
#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Fields accepted by the CMS update endpoint. Only present fields change.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Client for the CMS event endpoints.
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl StoreClient {
    pub fn new(base_url: &str) -> EngineResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(STORE_TIMEOUT)
            .build()
            .map_err(|e| EngineError::Config(e.to_string()))?;

        Ok(StoreClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn events_url(&self, user_id: &str) -> String {
        format!("{}/users/{}/events", self.base_url, user_id)
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/events/{}", self.base_url, event_id)
    }

    /// Pull the CMS error body if there is one, else report the status.
    async fn read_error(resp: reqwest::Response) -> String {
        let status = resp.status();
        match resp.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => format!("server returned {status}"),
        }
    }

    fn fetch_failure(e: reqwest::Error) -> EngineError {
        if e.is_timeout() {
            EngineError::StoreTimeout(STORE_TIMEOUT.as_secs())
        } else {
            EngineError::Fetch(e.to_string())
        }
    }

    /// POST a new definition; the CMS echoes the stored record.
    pub async fn create_event(
        &self,
        user_id: &str,
        definition: &EventDefinition,
    ) -> EngineResult<EventDefinition> {
        let resp = self
            .http
            .post(self.events_url(user_id))
            .json(definition)
            .send()
            .await
            .map_err(|e| EngineError::Store(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(EngineError::Store(Self::read_error(resp).await));
        }

        resp.json()
            .await
            .map_err(|e| EngineError::Serialization(e.to_string()))
    }

    /// PATCH title/time/recurrence/completion on an existing definition.
    pub async fn update_event(
        &self,
        event_id: &str,
        patch: &EventPatch,
    ) -> EngineResult<EventDefinition> {
        let resp = self
            .http
            .patch(self.event_url(event_id))
            .json(patch)
            .send()
            .await
            .map_err(|e| EngineError::Store(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(EngineError::Store(Self::read_error(resp).await));
        }

        resp.json()
            .await
            .map_err(|e| EngineError::Serialization(e.to_string()))
    }

    /// Mark the whole series completed (the flag lives on the definition).
    pub async fn complete_event(&self, event_id: &str) -> EngineResult<EventDefinition> {
        self.update_event(
            event_id,
            &EventPatch {
                completed: Some(true),
                ..EventPatch::default()
            },
        )
        .await
    }

    pub async fn delete_event(&self, event_id: &str) -> EngineResult<()> {
        let resp = self
            .http
            .delete(self.event_url(event_id))
            .send()
            .await
            .map_err(|e| EngineError::Store(e.to_string()))?;

        // Already gone counts as deleted.
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !resp.status().is_success() {
            return Err(EngineError::Store(Self::read_error(resp).await));
        }
        Ok(())
    }
}

impl EventStore for StoreClient {
    /// GET the over-selected candidate set for one user and coarse window.
    async fn fetch_definitions(
        &self,
        user_id: &str,
        range: &DateRange,
    ) -> EngineResult<Vec<EventDefinition>> {
        let resp = self
            .http
            .get(self.events_url(user_id))
            .query(&[
                ("from", range.from.to_rfc3339()),
                ("to", range.to.to_rfc3339()),
            ])
            .send()
            .await
            .map_err(Self::fetch_failure)?;

        if !resp.status().is_success() {
            return Err(EngineError::Fetch(Self::read_error(resp).await));
        }

        resp.json()
            .await
            .map_err(|e| EngineError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_rooted_at_the_base() {
        let client = StoreClient::new("https://cms.example.com/api/").unwrap();
        assert_eq!(
            client.events_url("user-7"),
            "https://cms.example.com/api/users/user-7/events"
        );
        assert_eq!(
            client.event_url("evt-1"),
            "https://cms.example.com/api/events/evt-1"
        );
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = EventPatch {
            completed: Some(true),
            ..EventPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"completed": true}));
    }
}
