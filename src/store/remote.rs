//! Hosted record-service client.
//!
//! Speaks the record service's existing envelope: listings come back as
//! `{"data": [...]}`, mutations as
//! `{"success": bool, "results": [{"success", "data", "message"}]}`.
//! A well-formed response with `success: false` is a `Rejected` error,
//! not an HTTP failure.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::{AppointmentFilter, RawRecord, RecordFields};

use super::{RecordId, Store, StoreError};

pub struct RemoteStore {
    base_url: String,
    table: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl RemoteStore {
    /// Creates a client for one record table at `base_url`.
    pub fn new(base_url: &str, table: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            table: table.to_string(),
            client,
            timeout_secs,
        }
    }

    fn records_url(&self) -> String {
        format!("{}/tables/{}/records", self.base_url, self.table)
    }

    fn record_url(&self, id: &RecordId) -> String {
        format!("{}/{}", self.records_url(), id)
    }

    fn query_params(filter: &AppointmentFilter) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = filter
            .status
            .iter()
            .map(|s| ("status", s.as_str().to_string()))
            .collect();
        if let Some(limit) = filter.limit {
            params.push(("limit", limit.to_string()));
            params.push(("offset", filter.offset.unwrap_or(0).to_string()));
        }
        params
    }

    fn send_error(&self, err: reqwest::Error) -> StoreError {
        if err.is_connect() {
            StoreError::Connection(self.base_url.clone())
        } else if err.is_timeout() {
            StoreError::Http(format!("Request timed out after {}s", self.timeout_secs))
        } else {
            StoreError::Http(err.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

// ─── Envelope types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct MutationPayload {
    records: Vec<RecordFields>,
}

#[derive(Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    data: Vec<RawRecord>,
}

#[derive(Deserialize)]
struct RecordEnvelope {
    #[serde(default)]
    data: Option<RawRecord>,
}

#[derive(Deserialize)]
struct CountEnvelope {
    total: u64,
}

#[derive(Deserialize)]
struct MutationEnvelope {
    success: bool,
    #[serde(default)]
    results: Vec<MutationResult>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct MutationResult {
    success: bool,
    data: Option<RawRecord>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct DeleteEnvelope {
    success: bool,
}

fn unwrap_mutation(envelope: MutationEnvelope) -> Result<RawRecord, StoreError> {
    if !envelope.success {
        return Err(StoreError::Rejected(
            envelope
                .message
                .unwrap_or_else(|| "record service reported failure".into()),
        ));
    }
    let result = envelope
        .results
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::Rejected("empty results in response".into()))?;
    if !result.success {
        return Err(StoreError::Rejected(
            result
                .message
                .unwrap_or_else(|| "record service reported failure".into()),
        ));
    }
    result
        .data
        .ok_or_else(|| StoreError::Rejected("missing record in response".into()))
}

// ─── Store impl ───────────────────────────────────────────────────────────────

impl Store for RemoteStore {
    async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<RawRecord>, StoreError> {
        let response = self
            .client
            .get(self.records_url())
            .query(&Self::query_params(filter))
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        let response = Self::check_status(response).await?;
        let parsed: ListEnvelope = response
            .json()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        Ok(parsed.data)
    }

    async fn get(&self, id: &RecordId) -> Result<Option<RawRecord>, StoreError> {
        let response = self
            .client
            .get(self.record_url(id))
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check_status(response).await?;
        let parsed: RecordEnvelope = response
            .json()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        Ok(parsed.data)
    }

    async fn create(&self, fields: RecordFields) -> Result<RawRecord, StoreError> {
        let payload = MutationPayload {
            records: vec![fields],
        };
        let response = self
            .client
            .post(self.records_url())
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        let response = Self::check_status(response).await?;
        let parsed: MutationEnvelope = response
            .json()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        unwrap_mutation(parsed)
    }

    async fn update(&self, id: &RecordId, fields: RecordFields) -> Result<RawRecord, StoreError> {
        let payload = MutationPayload {
            records: vec![fields],
        };
        let response = self
            .client
            .patch(self.record_url(id))
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        let response = Self::check_status(response).await?;
        let parsed: MutationEnvelope = response
            .json()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        unwrap_mutation(parsed)
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, StoreError> {
        let response = self
            .client
            .delete(self.record_url(id))
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        let response = Self::check_status(response).await?;
        let parsed: DeleteEnvelope = response
            .json()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        Ok(parsed.success)
    }

    async fn count(&self, filter: &AppointmentFilter) -> Result<u64, StoreError> {
        let response = self
            .client
            .get(format!("{}/count", self.records_url()))
            .query(&Self::query_params(filter))
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        let response = Self::check_status(response).await?;
        let parsed: CountEnvelope = response
            .json()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        Ok(parsed.total)
    }
}
