//! REST client for the law-firm API.

use crate::auth::AuthContext;
use crate::config::{ConfigError, TuiConfig};
use async_trait::async_trait;
use lawdesk_core::{
    decode_collection, CollectionQuery, DecodeError, Draft, ErrorBody, RecordId, Report,
    ReportKind, Resource, ResourceKind, ValidationError,
};
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Conflict: {message}")]
    Conflict { message: String },
    #[error("Invalid response: {0}")]
    Decode(String),
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<ValidationError>),
    #[error("Config error: {0}")]
    Config(String),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<DecodeError> for ApiClientError {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for ApiClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<ConfigError> for ApiClientError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl ApiClientError {
    /// Text shown to the user. Server-provided messages are shown verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { message, .. } | Self::Conflict { message } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// The collection operations a list view needs, plus the read-only
/// reports.
///
/// Bodies are returned as JSON values; records are decoded against their
/// schema by the caller that knows the record type.
#[async_trait]
pub trait CollectionApi: Send + Sync {
    async fn list(
        &self,
        kind: ResourceKind,
        query: &CollectionQuery,
    ) -> Result<serde_json::Value, ApiClientError>;

    async fn delete(&self, kind: ResourceKind, id: RecordId) -> Result<(), ApiClientError>;

    async fn create(
        &self,
        kind: ResourceKind,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ApiClientError>;

    async fn update(
        &self,
        kind: ResourceKind,
        id: RecordId,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ApiClientError>;

    async fn report(&self, kind: ReportKind) -> Result<serde_json::Value, ApiClientError>;
}

/// Fetch and decode one page of `R`.
pub async fn fetch_records<R, A>(
    api: &A,
    query: &CollectionQuery,
) -> Result<Vec<R>, ApiClientError>
where
    R: Resource,
    A: CollectionApi + ?Sized,
{
    let body = api.list(R::KIND, query).await?;
    Ok(decode_collection::<R>(body)?)
}

pub async fn fetch_report<A>(api: &A, kind: ReportKind) -> Result<Report, ApiClientError>
where
    A: CollectionApi + ?Sized,
{
    let body = api.report(kind).await?;
    Ok(Report::decode(kind, body)?)
}

/// Validate `draft` and create (`id == None`) or update the record.
pub async fn save_draft<D, A>(
    api: &A,
    id: Option<RecordId>,
    draft: &D,
) -> Result<serde_json::Value, ApiClientError>
where
    D: Draft,
    A: CollectionApi + ?Sized,
{
    draft.validate().map_err(ApiClientError::Validation)?;
    let body = serde_json::to_value(draft)?;
    match id {
        Some(id) => api.update(D::KIND, id, body).await,
        None => api.create(D::KIND, body).await,
    }
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderMap,
}

impl RestClient {
    pub fn new(config: &TuiConfig, auth: &AuthContext) -> Result<Self, ApiClientError> {
        Self::with_base_url(
            &config.api_base_url,
            Duration::from_millis(config.request_timeout_ms),
            auth,
        )
    }

    pub fn with_base_url(
        base_url: &str,
        timeout: Duration,
        auth: &AuthContext,
    ) -> Result<Self, ApiClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let auth_header = auth.header_map()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    fn url(&self, kind: ResourceKind, id: Option<RecordId>) -> String {
        match id {
            Some(id) => format!("{}/{}/{}", self.base_url, kind.path(), id),
            None => format!("{}/{}", self.base_url, kind.path()),
        }
    }

    async fn send(
        &self,
        method: Method,
        url: String,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, ApiClientError> {
        let started = Instant::now();
        let mut request = self
            .client
            .request(method.clone(), &url)
            .headers(self.auth_header.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%method, %url, error = %err, "Request failed");
                return Err(err.into());
            }
        };
        let status = response.status();
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if status.is_success() {
            tracing::debug!(
                %method,
                %url,
                status = status.as_u16(),
                elapsed_ms,
                "Request completed"
            );
            Ok(response)
        } else {
            let err = error_from_response(status, response).await;
            tracing::warn!(
                %method,
                %url,
                status = status.as_u16(),
                elapsed_ms,
                error = %err,
                "Request rejected"
            );
            Err(err)
        }
    }

    async fn json_body(response: reqwest::Response) -> Result<serde_json::Value, ApiClientError> {
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn list_records<R: Resource>(
        &self,
        query: &CollectionQuery,
    ) -> Result<Vec<R>, ApiClientError> {
        fetch_records::<R, Self>(self, query).await
    }
}

async fn error_from_response(status: StatusCode, response: reqwest::Response) -> ApiClientError {
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(ErrorBody::into_message);
    if status == StatusCode::CONFLICT {
        ApiClientError::Conflict {
            message: message.unwrap_or_else(|| {
                "The record has associated records and cannot be changed".to_string()
            }),
        }
    } else {
        ApiClientError::Http {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| format!("HTTP error {}", status.as_u16())),
        }
    }
}

#[async_trait]
impl CollectionApi for RestClient {
    async fn list(
        &self,
        kind: ResourceKind,
        query: &CollectionQuery,
    ) -> Result<serde_json::Value, ApiClientError> {
        let url = format!("{}{}", self.url(kind, None), query.to_query_string());
        let response = self.send(Method::GET, url, None).await?;
        Self::json_body(response).await
    }

    async fn delete(&self, kind: ResourceKind, id: RecordId) -> Result<(), ApiClientError> {
        self.send(Method::DELETE, self.url(kind, Some(id)), None)
            .await?;
        Ok(())
    }

    async fn create(
        &self,
        kind: ResourceKind,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ApiClientError> {
        let response = self
            .send(Method::POST, self.url(kind, None), Some(&body))
            .await?;
        Self::json_body(response).await
    }

    async fn update(
        &self,
        kind: ResourceKind,
        id: RecordId,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ApiClientError> {
        let response = self
            .send(Method::PUT, self.url(kind, Some(id)), Some(&body))
            .await?;
        Self::json_body(response).await
    }

    async fn report(&self, kind: ReportKind) -> Result<serde_json::Value, ApiClientError> {
        let url = format!("{}/{}", self.base_url, kind.path());
        let response = self.send(Method::GET, url, None).await?;
        Self::json_body(response).await
    }
}
