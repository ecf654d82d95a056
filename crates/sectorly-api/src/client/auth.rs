// Login, logout, and token lifecycle.
//
// Login is never retried: a failure here is reported as an authentication
// error even when the underlying cause was the network.

use chrono::Utc;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::client::SectorClient;
use crate::error::Error;

impl SectorClient {
    /// Log in unless the current token is still valid.
    pub async fn ensure_authenticated(&self) -> Result<(), Error> {
        let session = self.session_state();
        if session.is_valid() {
            debug!(expires_at = ?session.expires_at(), "using existing token");
            return Ok(());
        }
        debug!("token invalid or expired, authenticating");
        self.login().await
    }

    /// Authenticate with e-mail/password and store the bearer token.
    ///
    /// `POST /api/Login/Login` with `{"userId", "password"}`.
    pub async fn login(&self) -> Result<(), Error> {
        let url = self.endpoints.login_url().clone();
        debug!(%url, "logging in");

        let body = json!({
            "userId": self.credentials.email,
            "password": self.credentials.password.expose_secret(),
        });

        let resp = self
            .http
            .post(url)
            .json(&body)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("timeout occurred during login");
                    Error::auth_with("timeout during login", e)
                } else {
                    error!(error = %e, "client error during login");
                    Error::auth_with("client error during login", e)
                }
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            error!(%status, "login failed");
            return Err(Error::auth("invalid credentials"));
        }

        let data: Value = resp.json().await.map_err(|e| {
            error!(error = %e, "login response was not valid JSON");
            Error::auth_with("client error during login", e)
        })?;

        let token = data
            .get("AuthorizationToken")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                error!("login failed: no access token received");
                Error::auth("invalid credentials")
            })?;

        let expires_at = self
            .session_mut()
            .store(SecretString::from(token.to_owned()), Utc::now());
        debug!(%expires_at, "new token obtained");
        Ok(())
    }

    /// Forget the token locally. There is no remote logout call.
    pub fn logout(&self) {
        self.clear_session();
        debug!("logged out from Sector Alarm API");
    }
}
