//! Request plumbing: base URL, bearer auth, request ids, envelope decoding.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;
use washdesk_core::config::ApiConfig;
use washdesk_core::AccessPolicy;

use crate::envelope::ApiEnvelope;
use crate::error::ClientError;
use crate::session::SessionContext;

/// Longest response body echoed into an error message.
const MAX_ERROR_BODY: usize = 200;

/// Client for the car-wash backend REST API.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    policy: AccessPolicy,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "API url must start with http:// or https://, got '{base_url}'"
            )));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            http,
            policy: AccessPolicy::new(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ClientError> {
        Self::new(&config.url, Duration::from_secs(config.timeout_secs))
    }

    /// Replace the role table used to gate calls before they are sent.
    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Authenticated call. Fails with [`ClientError::NotAuthenticated`]
    /// before any I/O when `ctx` is empty; clears `ctx` on a 401.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        ctx: &mut SessionContext,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T, ClientError> {
        let token = ctx.require()?.token.clone();
        let result = self
            .execute::<T>(method, path, query, body, Some(&token))
            .await;
        let (status, envelope) = clear_on_unauthorized(ctx, result)?;
        envelope.into_result(status.as_u16())
    }

    /// Like [`send`](Self::send) for endpoints whose success carries no useful data.
    pub(crate) async fn send_unit(
        &self,
        ctx: &mut SessionContext,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<(), ClientError> {
        let token = ctx.require()?.token.clone();
        let result = self
            .execute::<serde_json::Value>(method, path, &[], body, Some(&token))
            .await;
        let (status, envelope) = clear_on_unauthorized(ctx, result)?;
        envelope.into_unit_result(status.as_u16())
    }

    /// Call without a session (login).
    pub(crate) async fn send_anonymous<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ClientError> {
        let (status, envelope) = self.execute::<T>(method, path, &[], body, None).await?;
        envelope.into_result(status.as_u16())
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
        token: Option<&str>,
    ) -> Result<(StatusCode, ApiEnvelope<T>), ClientError> {
        let request_id = Uuid::new_v4();
        let url = self.url(path);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header("X-Request-Id", request_id.to_string());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(ref body) = body {
            request = request.json(body);
        }

        debug!(%request_id, %method, path, "API request");
        let resp = request.send().await?;
        let status = resp.status();
        debug!(%request_id, status = status.as_u16(), "API response");

        if status == StatusCode::UNAUTHORIZED && token.is_some() {
            warn!(%request_id, path, "Backend rejected session token");
            return Err(ClientError::Unauthorized);
        }

        let text = resp.text().await?;
        match serde_json::from_str::<ApiEnvelope<T>>(&text) {
            Ok(envelope)
                if token.is_some()
                    && !envelope.success
                    && envelope.status == Some(StatusCode::UNAUTHORIZED.as_u16()) =>
            {
                warn!(%request_id, path, "Backend reported session as unauthorized");
                Err(ClientError::Unauthorized)
            }
            Ok(envelope) => Ok((status, envelope)),
            Err(e) if status.is_success() => Err(ClientError::Decode(format!(
                "{} {}: {}",
                method, path, e
            ))),
            Err(_) => Err(ClientError::Api {
                status: status.as_u16(),
                message: truncate(&text, MAX_ERROR_BODY),
            }),
        }
    }
}

/// A rejected token ends the session before the error reaches the caller.
fn clear_on_unauthorized<T>(
    ctx: &mut SessionContext,
    result: Result<T, ClientError>,
) -> Result<T, ClientError> {
    if matches!(result, Err(ClientError::Unauthorized)) {
        ctx.end();
    }
    result
}

fn truncate(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}
