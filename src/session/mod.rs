//! Session facade: login, logout, validity probe.
//!
//! Login and logout talk to the auth endpoints directly rather than
//! through [`ApiClient::fetch`] — login has no session to refresh yet, and
//! logout must tear local state down whatever the network does.

pub mod error;

pub use error::LoginError;

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::http::ApiClient;

/// Profile payload from `GET /api/users/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// The three user-facing session operations.
pub struct Session {
    client: Arc<ApiClient>,
}

impl Session {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Authenticate with username/password.
    ///
    /// Clears any residual coordinator state first so cooldown or
    /// in-flight leftovers from a previous session cannot mask a dead one.
    /// Once the backend accepts the credentials the login has succeeded;
    /// the follow-up profile fetch is best-effort and a failure there
    /// yields `Ok(None)` rather than undoing the login. Every failure maps
    /// to a [`LoginError`] whose `Display` is the message the UI shows.
    /// No navigation happens here.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserProfile>, LoginError> {
        self.client.coordinator().clear_state();

        let url = self.client.config().endpoint("/api/auth/login");
        let response = self
            .client
            .http()
            .post(&url)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(|error| {
                tracing::warn!(error = %error, "login request failed to reach backend");
                LoginError::Connection(error.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(self.fetch_profile().await);
        }

        Err(match status {
            StatusCode::UNAUTHORIZED => LoginError::InvalidCredentials,
            s if s.is_server_error() => LoginError::Server,
            s => {
                let message = response
                    .json::<serde_json::Value>()
                    .await
                    .ok()
                    .and_then(|body| {
                        body.get("message")
                            .or_else(|| body.get("error"))
                            .and_then(|v| v.as_str())
                            .map(String::from)
                    })
                    .unwrap_or_else(|| format!("Đăng nhập thất bại (mã {})", s.as_u16()));
                LoginError::Rejected {
                    status: s.as_u16(),
                    message,
                }
            }
        })
    }

    /// Terminate the session.
    ///
    /// Coordinator state is cleared before the network call and the cookie
    /// jar after it, unconditionally, so a failed logout request can never
    /// leave the client looking logged in. The session-lost hook fires
    /// last (the shell's navigation to the login route).
    pub async fn logout(&self) {
        self.client.coordinator().clear_state();

        let url = self.client.config().endpoint("/api/auth/logout");
        if let Err(error) = self.client.http().post(&url).send().await {
            tracing::warn!(error = %error, "logout request failed, clearing local session anyway");
        }

        self.client.jar().clear();
        self.client.notify_session_lost();
    }

    /// Probe whether the session is currently valid.
    ///
    /// A 401 gets exactly one refresh-and-retry cycle through the
    /// coordinator. Every error path is `false`; the session-lost hook is
    /// not involved.
    pub async fn is_authenticated(&self) -> bool {
        let url = self.client.config().endpoint("/api/users/me");

        let status = match self.client.http().get(&url).send().await {
            Ok(response) => response.status(),
            Err(_) => return false,
        };
        if status.is_success() {
            return true;
        }
        if status != StatusCode::UNAUTHORIZED {
            return false;
        }

        if !self.client.coordinator().refresh().await {
            return false;
        }
        match self.client.http().get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn fetch_profile(&self) -> Option<UserProfile> {
        let url = self.client.config().endpoint("/api/users/me");
        let response = match self.client.http().get(&url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::warn!(status = %response.status(), "profile fetch rejected");
                return None;
            }
            Err(error) => {
                tracing::warn!(error = %error, "profile fetch failed");
                return None;
            }
        };
        match response.json::<UserProfile>().await {
            Ok(profile) => Some(profile),
            Err(error) => {
                tracing::warn!(error = %error, "profile payload could not be decoded");
                None
            }
        }
    }
}
