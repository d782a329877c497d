//! Hosted platform backend over HTTP
//!
//! Talks to an identity service under `/auth/v1` and a PostgREST-style table
//! API under `/rest/v1`.

use super::types::{Filter, Identity, PlatformError, PlatformResult, Record, Table};
use super::{DataStore, IdentityService};
use crate::config::PlatformConfig;
use crate::utils::error::{AccessError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const UPSERT_PREFERENCE: &str = "resolution=merge-duplicates,return=representation";
const INSERT_MISSING_PREFERENCE: &str = "resolution=ignore-duplicates,return=representation";

/// HTTP client for the hosted identity + data platform
#[derive(Debug, Clone)]
pub struct HttpPlatform {
    client: Client,
    base_url: Url,
    anon_key: String,
    data_key: String,
    service_key: Option<String>,
    timeout: Duration,
}

impl HttpPlatform {
    /// Create a client from platform configuration
    pub fn new(config: &PlatformConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.url)
            .map_err(|e| AccessError::config(format!("Invalid platform URL: {}", e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            client,
            base_url,
            anon_key: config.anon_key.clone(),
            data_key: config.data_key().to_string(),
            service_key: config.service_key.clone(),
            timeout: config.request_timeout(),
        })
    }

    fn endpoint(&self, path: &str) -> PlatformResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| PlatformError::Transport(format!("invalid endpoint {}: {}", path, e)))
    }

    fn with_key(builder: RequestBuilder, key: &str) -> RequestBuilder {
        builder
            .header("apikey", key)
            .header("Authorization", format!("Bearer {}", key))
    }

    async fn send(&self, request: RequestBuilder) -> PlatformResult<Response> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                PlatformError::Timeout(self.timeout)
            } else {
                PlatformError::Transport(e.to_string())
            }
        })
    }

    /// Read a JSON body, turning non-success statuses into errors
    async fn read_json(&self, response: Response) -> PlatformResult<(u16, Value)> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                PlatformError::Timeout(self.timeout)
            } else {
                PlatformError::Transport(e.to_string())
            }
        })?;

        if !status.is_success() {
            return Err(PlatformError::rejected(status.as_u16(), error_message(&body)));
        }
        if body.trim().is_empty() {
            return Ok((status.as_u16(), Value::Null));
        }
        let value = serde_json::from_str(&body)
            .map_err(|e| PlatformError::decode(format!("invalid JSON body: {}", e)))?;
        Ok((status.as_u16(), value))
    }
}

/// Best-effort human message from an error body
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|value| {
            ["msg", "message", "error_description", "error"]
                .iter()
                .find_map(|field| value.get(*field).and_then(Value::as_str))
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

fn is_already_registered(status: u16, message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    matches!(status, 400 | 422)
        && (message.contains("already registered") || message.contains("user_already_exists"))
}

/// Pull `{id, email}` out of either a bare user object or a session payload
fn identity_from(value: &Value) -> PlatformResult<Identity> {
    let user = value
        .get("user")
        .filter(|user| user.is_object())
        .unwrap_or(value);
    let field = |name: &str| {
        user.get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| PlatformError::decode(format!("identity response lacks '{}'", name)))
    };
    Ok(Identity {
        id: field("id")?,
        email: field("email")?,
    })
}

#[async_trait]
impl IdentityService for HttpPlatform {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
        metadata: Record,
    ) -> PlatformResult<Identity> {
        let url = self.endpoint("auth/v1/signup")?;
        let request = Self::with_key(self.client.post(url), &self.anon_key).json(&json!({
            "email": email,
            "password": password,
            "data": metadata,
        }));

        let response = self.send(request).await?;
        let value = match self.read_json(response).await {
            Ok((_, value)) => value,
            Err(PlatformError::Rejected { status, message })
                if is_already_registered(status, &message) =>
            {
                return Err(PlatformError::AlreadyRegistered(email.to_string()));
            }
            Err(e) => return Err(e),
        };

        // With email confirmation enabled the service answers an existing
        // email with an obfuscated user that has no identities.
        let user = value.get("user").filter(|u| u.is_object()).unwrap_or(&value);
        if user
            .get("identities")
            .and_then(Value::as_array)
            .is_some_and(|identities| identities.is_empty())
        {
            return Err(PlatformError::AlreadyRegistered(email.to_string()));
        }

        let identity = identity_from(&value)?;
        debug!(identity_id = %identity.id, "identity created");
        Ok(identity)
    }

    async fn authenticate(&self, email: &str, password: &str) -> PlatformResult<Identity> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let request = Self::with_key(self.client.post(url), &self.anon_key).json(&json!({
            "email": email,
            "password": password,
        }));

        let response = self.send(request).await?;
        match self.read_json(response).await {
            Ok((_, value)) => identity_from(&value),
            Err(PlatformError::Rejected { status: 400, .. }) => {
                Err(PlatformError::InvalidCredentials(email.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn delete_identity(&self, id: &str) -> PlatformResult<()> {
        let Some(service_key) = self.service_key.as_deref() else {
            warn!(identity_id = %id, "identity deletion requested without a service key");
            return Err(PlatformError::rejected(
                401,
                "deleting identities requires a service key",
            ));
        };

        let url = self.endpoint(&format!("auth/v1/admin/users/{}", id))?;
        let response = self
            .send(Self::with_key(self.client.delete(url), service_key))
            .await?;
        match self.read_json(response).await {
            Ok(_) => Ok(()),
            Err(PlatformError::Rejected { status: 404, .. }) => {
                Err(PlatformError::NotFound(id.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

impl HttpPlatform {
    /// POST one row with a conflict target and resolution preference
    async fn write_row(
        &self,
        table: Table,
        record: Record,
        on_conflict: &str,
        preference: &str,
    ) -> PlatformResult<Vec<Record>> {
        let mut url = self.endpoint(&format!("rest/v1/{}", table))?;
        url.query_pairs_mut().append_pair("on_conflict", on_conflict);
        let request = Self::with_key(self.client.post(url), &self.data_key)
            .header("Prefer", preference)
            .json(&vec![record]);

        let response = self.send(request).await?;
        let (_, value) = self.read_json(response).await?;
        serde_json::from_value(value)
            .map_err(|e| PlatformError::decode(format!("invalid {} rows: {}", table, e)))
    }
}

#[async_trait]
impl DataStore for HttpPlatform {
    async fn upsert(
        &self,
        table: Table,
        record: Record,
        on_conflict: &str,
    ) -> PlatformResult<Record> {
        self.write_row(table, record, on_conflict, UPSERT_PREFERENCE)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| PlatformError::decode(format!("upsert into {} returned no row", table)))
    }

    async fn insert_or_get(
        &self,
        table: Table,
        record: Record,
        on_conflict: &str,
    ) -> PlatformResult<Record> {
        let key = record.get(on_conflict).cloned().ok_or_else(|| {
            PlatformError::rejected(
                400,
                format!("{} row is missing conflict column '{}'", table, on_conflict),
            )
        })?;

        // An ignored duplicate comes back as an empty array
        let inserted = self
            .write_row(table, record, on_conflict, INSERT_MISSING_PREFERENCE)
            .await?;
        if let Some(row) = inserted.into_iter().next() {
            return Ok(row);
        }

        self.select(table, &Filter::new().eq(on_conflict, key))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                PlatformError::decode(format!(
                    "{} row for '{}' vanished after insert",
                    table, on_conflict
                ))
            })
    }

    async fn select(&self, table: Table, filter: &Filter) -> PlatformResult<Vec<Record>> {
        let mut url = self.endpoint(&format!("rest/v1/{}", table))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            for (column, condition) in filter.query_pairs() {
                query.append_pair(&column, &condition);
            }
        }

        let response = self
            .send(Self::with_key(self.client.get(url), &self.data_key))
            .await?;
        let (_, value) = self.read_json(response).await?;
        serde_json::from_value(value)
            .map_err(|e| PlatformError::decode(format!("invalid {} rows: {}", table, e)))
    }
}
