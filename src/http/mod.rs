//! Authenticated request plumbing.
//!
//! [`ApiClient`] issues requests with session cookies attached and
//! transparently recovers from an expired session: one refresh, one retry,
//! and if the session is beyond recovery the caller-supplied session-lost
//! hook fires (in the dashboard shell that hook navigates to `/login`).

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode, Url};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::refresh::RefreshCoordinator;

/// Invoked once per irrecoverable auth failure: refresh failed, or the
/// retried request still came back 401.
pub type SessionLostHook = Arc<dyn Fn() + Send + Sync>;

/// Cookie jar that can be wiped on logout.
///
/// `reqwest`'s own [`Jar`] has no clear operation, so logout swaps the
/// whole jar for an empty one.
#[derive(Default)]
pub struct SessionJar {
    inner: RwLock<Jar>,
}

impl SessionJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every stored cookie.
    pub fn clear(&self) {
        *self.inner.write().expect("cookie jar poisoned") = Jar::default();
    }
}

impl CookieStore for SessionJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        self.inner
            .read()
            .expect("cookie jar poisoned")
            .set_cookies(cookie_headers, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.inner.read().expect("cookie jar poisoned").cookies(url)
    }
}

/// Per-request options for [`ApiClient::fetch`].
///
/// Everything is optional: the default is a GET with a JSON content type
/// and no body. Caller-supplied headers override the defaults.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    method: Option<Method>,
    headers: HeaderMap,
    body: Option<serde_json::Value>,
    timeout: Option<Duration>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach a JSON body (implies `Content-Type: application/json`).
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Client-side timeout for this request; expiry aborts the request
    /// and surfaces as [`ClientError::Timeout`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP client bound to the backend base URL, carrying session cookies
/// and the refresh coordinator.
pub struct ApiClient {
    http: reqwest::Client,
    jar: Arc<SessionJar>,
    config: ClientConfig,
    refresh: Arc<RefreshCoordinator>,
    on_session_lost: SessionLostHook,
}

impl ApiClient {
    /// Build a client with a no-op session-lost hook.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_session_lost_hook(config, Arc::new(|| {}))
    }

    /// Build a client whose `hook` is invoked when the session cannot be
    /// recovered. The dashboard shell passes its login-route navigation
    /// here.
    pub fn with_session_lost_hook(config: ClientConfig, hook: SessionLostHook) -> Result<Self> {
        let jar = Arc::new(SessionJar::new());
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|error| {
                ClientError::Configuration(format!("failed to build HTTP client: {error}"))
            })?;
        let refresh = Arc::new(RefreshCoordinator::new(http.clone(), &config));
        Ok(Self {
            http,
            jar,
            config,
            refresh,
            on_session_lost: hook,
        })
    }

    /// The coordinator shared by this client's requests.
    pub fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.refresh
    }

    /// The session cookie jar (cleared on logout).
    pub fn jar(&self) -> &Arc<SessionJar> {
        &self.jar
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn notify_session_lost(&self) {
        (self.on_session_lost)();
    }

    /// Issue an authenticated request, recovering from an expired session.
    ///
    /// Waits out any in-flight refresh first so the request never races
    /// one. A 401 response triggers a refresh; on success the request is
    /// retried exactly once with identical options. A failed refresh, or a
    /// retry that is still 401, fires the session-lost hook — the terminal
    /// 401 response is still returned to the caller.
    ///
    /// Non-2xx statuses other than 401 are not interpreted here; the
    /// caller inspects the returned [`Response`].
    pub async fn fetch(&self, path: &str, options: FetchOptions) -> Result<Response> {
        self.refresh.wait_for_refresh().await;

        let response = self.send(path, &options).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!(path, "request unauthorized, attempting session refresh");
        if self.refresh.refresh().await {
            let retried = self.send(path, &options).await?;
            if retried.status() == StatusCode::UNAUTHORIZED {
                tracing::warn!(path, "retry after refresh still unauthorized");
                self.notify_session_lost();
            }
            Ok(retried)
        } else {
            self.notify_session_lost();
            Ok(response)
        }
    }

    async fn send(&self, path: &str, options: &FetchOptions) -> Result<Response> {
        let url = self.config.endpoint(path);
        let method = options.method.clone().unwrap_or(Method::GET);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let mut request = self.http.request(method, &url).headers(headers);
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        // Dropping the send future on expiry aborts the request, which is
        // what data call sites rely on for their fixed client-side timeout.
        let limit = options.timeout.or(self.config.default_timeout);
        let sent = match limit {
            Some(limit) => tokio::time::timeout(limit, request.send())
                .await
                .map_err(|_| ClientError::Timeout(limit.as_millis() as u64))?,
            None => request.send().await,
        };
        sent.map_err(ClientError::Network)
    }
}

/// A session-lost hook backed by a shared flag, convenient for shells that
/// poll for the redirect, and for tests.
pub fn flag_hook() -> (SessionLostHook, Arc<Mutex<u32>>) {
    let fired = Arc::new(Mutex::new(0u32));
    let flag = Arc::clone(&fired);
    let hook: SessionLostHook = Arc::new(move || {
        *flag.lock().expect("session-lost flag poisoned") += 1;
    });
    (hook, fired)
}
