// Sector Alarm HTTP client
//
// Wraps `reqwest::Client` with bearer-token session state, the per-panel
// endpoint table, and response classification. Endpoint groups (auth,
// data, actions) are implemented as inherent methods in sibling files to
// keep this module focused on transport mechanics.

pub mod actions;
pub mod auth;
pub mod data;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

use crate::auth::{Credentials, Session};
use crate::endpoints::EndpointTable;
use crate::error::Error;
use crate::options::FetchOptions;
use crate::retry::RetryPolicy;
use crate::transport::TransportConfig;

/// Client for one panel on the Sector Alarm cloud API.
///
/// Owns the session exclusively; request helpers read the bearer token
/// from it and clear it on `401`. All methods take `&self`, so the client
/// can sit behind an `Arc` shared by the refresh loop and action callers.
pub struct SectorClient {
    http: reqwest::Client,
    endpoints: EndpointTable,
    credentials: Credentials,
    panel_id: String,
    fetch: FetchOptions,
    session: RwLock<Session>,
    retry: RetryPolicy,
    request_timeout: Duration,
    image_timeout: Duration,
}

impl SectorClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the API root, normally [`API_URL`](crate::API_URL).
    pub fn new(
        base_url: &Url,
        credentials: Credentials,
        panel_id: impl Into<String>,
        fetch: FetchOptions,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let mut client = Self::with_client(http, base_url, credentials, panel_id, fetch)?;
        client.request_timeout = transport.request_timeout;
        client.image_timeout = transport.image_timeout;
        Ok(client)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &Url,
        credentials: Credentials,
        panel_id: impl Into<String>,
        fetch: FetchOptions,
    ) -> Result<Self, Error> {
        let panel_id = panel_id.into();
        let endpoints = EndpointTable::new(base_url, &panel_id)?;
        let defaults = TransportConfig::default();
        Ok(Self {
            http,
            endpoints,
            credentials,
            panel_id,
            fetch,
            session: RwLock::new(Session::default()),
            retry: RetryPolicy::default(),
            request_timeout: defaults.request_timeout,
            image_timeout: defaults.image_timeout,
        })
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the initial session (e.g. custom token lifetime).
    pub fn with_session(self, session: Session) -> Self {
        *self.session_mut() = session;
        self
    }

    pub fn panel_id(&self) -> &str {
        &self.panel_id
    }

    pub fn endpoints(&self) -> &EndpointTable {
        &self.endpoints
    }

    pub fn fetch_options(&self) -> &FetchOptions {
        &self.fetch
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Whether the current token passes the validity check.
    pub fn is_authenticated(&self) -> bool {
        self.session().is_valid()
    }

    /// A copy of the current session state.
    pub fn session_state(&self) -> Session {
        self.session().clone()
    }

    /// Drop the token so the next call performs a full login.
    pub fn clear_session(&self) {
        self.session_mut().clear();
    }

    // ── Session access ───────────────────────────────────────────────

    fn session(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn session_mut(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply bearer auth and `Accept` to a request builder.
    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let token = self.session().bearer();
        let builder = builder.header(ACCEPT, "application/json");
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send one authorized GET and classify the response.
    pub(crate) async fn get(&self, url: &Url) -> Result<Option<Value>, Error> {
        debug!(%url, "GET");
        let resp = self
            .authorize(self.http.get(url.clone()))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| {
                error!(%url, error = %e, "GET request failed");
                Error::from_send(e, self.request_timeout)
            })?;
        self.parse_json(resp).await
    }

    /// Send one authorized POST with a JSON body and classify the response.
    pub(crate) async fn post(
        &self,
        url: &Url,
        payload: &(impl Serialize + Sync),
    ) -> Result<Option<Value>, Error> {
        debug!(%url, "POST");
        let resp = self
            .authorize(self.http.post(url.clone()))
            .json(payload)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| {
                error!(%url, error = %e, "POST request failed");
                Error::from_send(e, self.request_timeout)
            })?;
        self.parse_json(resp).await
    }

    /// `200` + JSON → body; `401` → auth error (session cleared);
    /// anything else → logged soft failure (`None`).
    async fn parse_json(&self, resp: reqwest::Response) -> Result<Option<Value>, Error> {
        let status = resp.status();
        let url = resp.url().clone();

        if status == StatusCode::UNAUTHORIZED {
            warn!(%url, "authorization token expired, will re-authenticate");
            self.clear_session();
            return Err(Error::auth("token expired"));
        }

        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            error!(%url, %status, body = preview(&body), "request failed");
            return Ok(None);
        }

        if !is_json(resp.headers()) {
            let body = resp.text().await.unwrap_or_default();
            error!(%url, body = preview(&body), "received non-JSON response");
            return Ok(None);
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map(Some).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"))
}

fn preview(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(idx, _)| idx);
    &body[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use secrecy::SecretString;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn json_content_type_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(is_json(&headers));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        assert!(!is_json(&headers));
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let long = "å".repeat(300);
        assert_eq!(preview(&long).chars().count(), 200);
        assert_eq!(preview("short"), "short");
    }

    #[tokio::test]
    async fn request_timeout_surfaces_as_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;
        let base = Url::parse(&server.uri()).unwrap();
        let transport = TransportConfig {
            request_timeout: Duration::from_secs(1),
            ..TransportConfig::default()
        };
        let credentials =
            Credentials::new("user@example.com", SecretString::from("hunter2".to_string()));
        let client =
            SectorClient::new(&base, credentials, "1", FetchOptions::default(), &transport).unwrap();

        let err = client.get(&base.join("slow").unwrap()).await.unwrap_err();

        assert!(matches!(err, Error::Timeout { timeout_secs: 1 }), "got: {err:?}");
        assert!(err.is_transient());
    }
}
