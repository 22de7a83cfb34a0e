//! Authenticated HTTP client for the portal backend.
//!
//! Every call goes through [`ApiClient::request`], which attaches the
//! current bearer token, picks up rotated tokens from response bodies and
//! recovers from an expired token by refreshing once and replaying the
//! request once. Concurrent requests that hit a 401 at the same time share
//! a single refresh call.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::auth::Session;
use crate::config::Config;

use super::ApiError;

/// Top-level JSON field carrying a new access token, both on the refresh
/// endpoint and on any response where the backend rotates the token.
const ACCESS_TOKEN_FIELD: &str = "accessToken";

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
}

/// Decoded body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Response declared a JSON content type
    Json(Value),
    /// Any other non-empty body
    Text(String),
    Empty,
}

impl ResponseBody {
    /// Deserialize the body into `T`. Text bodies decode as a JSON string
    /// and empty bodies as `null`, so `String` and `Option<T>` targets work
    /// for endpoints that answer with plain text or nothing.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        let value = self.into_json();
        serde_json::from_value(value).map_err(|e| {
            ApiError::InvalidResponse(format!("Unexpected response shape: {}", e)).into()
        })
    }

    pub fn into_json(self) -> Value {
        match self {
            ResponseBody::Json(v) => v,
            ResponseBody::Text(s) => Value::String(s),
            ResponseBody::Empty => Value::Null,
        }
    }

    /// A rotated token carried in the body, if any.
    fn rotated_token(&self) -> Option<&str> {
        match self {
            ResponseBody::Json(Value::Object(map)) => map
                .get(ACCESS_TOKEN_FIELD)
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty()),
            _ => None,
        }
    }
}

/// An outgoing request as the caller issued it, kept so it can be
/// replayed after a token refresh.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub headers: header::HeaderMap,
    /// Set once the request has been replayed; a replay is never refreshed again.
    pub retried: bool,
}

impl PendingRequest {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            body: None,
            headers: header::HeaderMap::new(),
            retried: false,
        }
    }
}

/// Where the caller should send the user after logging out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    pub url: String,
}

/// API client for the portal backend.
/// Clone is cheap - the connection pool, session store and refresh gate are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    refresh_path: String,
    logout_path: String,
    login_path: String,
    session: Session,
    refresh_gate: Arc<Mutex<()>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the backend resolved from `config`.
    pub fn new(config: &Config, session: Session) -> Result<Self> {
        let base_url = config.base_url()?;
        Self::with_base_url(&base_url, config, session)
    }

    /// Create a client for an explicit backend URL, taking endpoint paths
    /// and the timeout from `config`.
    pub fn with_base_url(base_url: &str, config: &Config, session: Session) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            refresh_path: config.refresh_path.clone(),
            logout_path: config.logout_path.clone(),
            login_path: config.login_path.clone(),
            session,
            refresh_gate: Arc::new(Mutex::new(())),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The OAuth entry point a signed-out user is sent to.
    pub fn login_url(&self) -> String {
        self.url(&self.login_path)
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // ===== Core request path =====

    /// Issue a request against the backend.
    ///
    /// A first 401 triggers one refresh and one replay with the new token.
    /// Every other failure, including a 401 on the replay, is returned as is.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: Option<header::HeaderMap>,
    ) -> Result<ResponseBody> {
        let mut pending = PendingRequest::new(method, path);
        pending.body = body.cloned();
        pending.headers = headers.unwrap_or_default();
        self.execute(pending).await
    }

    async fn execute(&self, mut pending: PendingRequest) -> Result<ResponseBody> {
        loop {
            let token = self.session.access_token();
            let response = self.send(&pending, token.as_deref()).await?;

            if response.status() == StatusCode::UNAUTHORIZED && !pending.retried {
                info!(method = %pending.method, path = %pending.path, "Unauthorized, refreshing token");
                self.refresh_after_unauthorized(token.as_deref()).await?;
                pending.retried = true;
                continue;
            }

            return self.read_response(&pending, response).await;
        }
    }

    async fn send(&self, pending: &PendingRequest, token: Option<&str>) -> Result<Response> {
        let mut headers = pending.headers.clone();
        if let Some(token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .context("Access token is not a valid header value")?,
            );
        }

        let mut builder = self
            .client
            .request(pending.method.clone(), self.url(&pending.path))
            .headers(headers);
        if let Some(ref body) = pending.body {
            builder = builder.json(body);
        }

        debug!(
            method = %pending.method,
            path = %pending.path,
            retried = pending.retried,
            authenticated = token.is_some(),
            "Sending request"
        );

        builder
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| {
                format!("Failed to send {} request to {}", pending.method, pending.path)
            })
    }

    async fn read_response(&self, pending: &PendingRequest, response: Response) -> Result<ResponseBody> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(method = %pending.method, path = %pending.path, status = status.as_u16(), "Request failed");
            return Err(ApiError::from_status(status, &body).into());
        }

        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("json"));

        let text = response
            .text()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to read response body from {}", pending.path))?;

        let body = if text.trim().is_empty() {
            ResponseBody::Empty
        } else if is_json {
            let value = serde_json::from_str(&text).map_err(|e| {
                ApiError::InvalidResponse(format!("Malformed JSON from {}: {}", pending.path, e))
            })?;
            ResponseBody::Json(value)
        } else {
            ResponseBody::Text(text)
        };

        if let Some(token) = body.rotated_token() {
            debug!(path = %pending.path, "Response carried a rotated access token");
            if let Err(e) = self.session.set_access_token(token) {
                warn!(error = %e, "Failed to store rotated access token");
            }
        }

        Ok(body)
    }

    // ===== Token refresh =====

    /// Exchange the current token for a new one and persist it.
    pub async fn refresh(&self) -> Result<String> {
        let _gate = self.refresh_gate.lock().await;
        self.refresh_locked().await
    }

    /// Refresh on behalf of a request that was sent with `stale` and got a 401.
    ///
    /// Runs under the refresh gate. If the stored token moved on while this
    /// request waited, another request already refreshed and the replay
    /// just uses the current token. A failed refresh only fails this request;
    /// the next 401 tries again.
    async fn refresh_after_unauthorized(&self, stale: Option<&str>) -> Result<()> {
        let _gate = self.refresh_gate.lock().await;

        if self.session.access_token().as_deref() != stale {
            debug!("Token already refreshed by a concurrent request");
            return Ok(());
        }

        self.refresh_locked().await?;
        Ok(())
    }

    async fn refresh_locked(&self) -> Result<String> {
        let sent_with = self.session.access_token();

        let mut builder = self.client.post(self.url(&self.refresh_path));
        if let Some(ref token) = sent_with {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(ApiError::from)
            .context("Failed to send token refresh request")?;

        match Self::read_refresh(response).await {
            Ok(token) => {
                self.session.set_access_token(&token)?;
                info!("Access token refreshed");
                Ok(token)
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                Err(e.into())
            }
        }
    }

    async fn read_refresh(response: Response) -> std::result::Result<String, ApiError> {
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::RefreshFailed(format!("refresh endpoint returned {}", status)));
        }

        let text = response.text().await?;
        let parsed: RefreshResponse = serde_json::from_str(&text).map_err(|_| {
            ApiError::RefreshFailed("refresh response was not a JSON object".to_string())
        })?;

        parsed
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ApiError::RefreshFailed(format!("refresh response had no {}", ACCESS_TOKEN_FIELD))
            })
    }

    // ===== Logout =====

    /// Sign out: tell the backend (best effort), then clear all local
    /// session state no matter how that went.
    pub async fn logout(&self) -> LoginRedirect {
        let mut builder = self.client.post(self.url(&self.logout_path));
        if let Some(token) = self.session.access_token() {
            builder = builder.bearer_auth(token);
        }

        match builder.send().await {
            Ok(response) if !response.status().is_success() => {
                warn!(status = response.status().as_u16(), "Logout endpoint returned an error");
            }
            Ok(_) => debug!("Backend session ended"),
            Err(e) => warn!(error = %e, "Logout request failed, clearing local session anyway"),
        }

        self.session.clear();
        info!("Logged out");

        LoginRedirect {
            url: self.login_url(),
        }
    }

    // ===== Typed helpers =====

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, None, None).await?.decode()
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, Some(&body), None).await?.decode()
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, path, Some(&body), None).await?.decode()
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.request(Method::PATCH, path, Some(&body), None).await?.decode()
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::DELETE, path, None, None).await?.decode()
    }
}
