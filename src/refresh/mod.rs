//! Token refresh coordination.
//!
//! Collapses concurrent session-refresh attempts into a single network
//! operation and enforces a cooldown between successive refreshes. A burst
//! of 401s from parallel requests lands on one `POST /api/auth/refresh`,
//! and every caller observes the same outcome.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tokio::time::Instant;

use crate::config::ClientConfig;

type RefreshHandle = Shared<BoxFuture<'static, bool>>;

#[derive(Default)]
struct RefreshState {
    /// At most one refresh is in flight at any instant; newcomers clone
    /// this handle instead of starting their own.
    in_flight: Option<RefreshHandle>,
    /// Set only when a refresh resolves successfully; ordinary request
    /// traffic never touches it.
    last_success: Option<Instant>,
}

/// Deduplicates and rate-limits session refreshes against the backend.
///
/// One coordinator instance exists per [`ApiClient`](crate::http::ApiClient);
/// its state lives behind a mutex so the single-operation invariant holds
/// on a multi-threaded runtime.
///
/// The underlying refresh call carries no timeout: a hung request blocks
/// every waiter until the connection dies. Known gap.
pub struct RefreshCoordinator {
    http: reqwest::Client,
    refresh_url: String,
    cooldown: Duration,
    clear_delay: Duration,
    state: Arc<Mutex<RefreshState>>,
}

impl RefreshCoordinator {
    /// The `http` client must carry the session cookie jar, otherwise the
    /// refresh request goes out without credentials.
    pub fn new(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            refresh_url: config.endpoint("/api/auth/refresh"),
            cooldown: config.refresh_cooldown,
            clear_delay: config.clear_delay,
            http,
            state: Arc::new(Mutex::new(RefreshState::default())),
        }
    }

    /// Refresh the session, returning whether it is now valid.
    ///
    /// Within the cooldown window of the last successful refresh this
    /// resolves to `true` without touching the network. If an operation is
    /// already in flight the caller awaits it instead of starting another.
    /// Network failures are swallowed and reported as `false`; no error
    /// crosses this boundary.
    pub async fn refresh(&self) -> bool {
        let handle = {
            let mut state = self.state.lock().expect("refresh state poisoned");
            if let Some(last) = state.last_success {
                if last.elapsed() < self.cooldown {
                    tracing::debug!("session refresh within cooldown, assuming valid");
                    return true;
                }
            }
            match state.in_flight.clone() {
                Some(handle) => handle,
                None => self.start(&mut state),
            }
        };
        handle.await
    }

    /// Suspend until any in-flight refresh resolves; returns immediately
    /// when none is pending. The outcome is ignored — this is a pre-flight
    /// guard so ordinary requests never interleave with a refresh.
    pub async fn wait_for_refresh(&self) {
        let handle = self
            .state
            .lock()
            .expect("refresh state poisoned")
            .in_flight
            .clone();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// Drop both the in-flight handle and the cooldown timestamp.
    ///
    /// Invoked on logout and at the start of a fresh login so residual
    /// state from a previous session never leaks into a new one. The next
    /// `refresh()` after this performs a real network call.
    pub fn clear_state(&self) {
        let mut state = self.state.lock().expect("refresh state poisoned");
        state.in_flight = None;
        state.last_success = None;
    }

    fn start(&self, state: &mut RefreshState) -> RefreshHandle {
        let http = self.http.clone();
        let url = self.refresh_url.clone();
        let shared_state = Arc::clone(&self.state);

        let handle: RefreshHandle = async move {
            let ok = match http.post(&url).send().await {
                Ok(response) => response.status().is_success(),
                Err(error) => {
                    tracing::warn!(error = %error, "session refresh request failed");
                    false
                }
            };
            if ok {
                shared_state
                    .lock()
                    .expect("refresh state poisoned")
                    .last_success = Some(Instant::now());
            }
            tracing::debug!(ok, "session refresh resolved");
            ok
        }
        .boxed()
        .shared();

        state.in_flight = Some(handle.clone());

        // The handle is cleared a short delay after completion rather than
        // immediately: several requests that fail with 401 at nearly the
        // same moment all land on this operation instead of each starting
        // a new one. The identity check keeps a concurrent clear_state()
        // (and the fresh refresh that may follow it) safe from this task.
        let shared_state = Arc::clone(&self.state);
        let clear_delay = self.clear_delay;
        let finished = handle.clone();
        tokio::spawn(async move {
            let _ = finished.clone().await;
            tokio::time::sleep(clear_delay).await;
            let mut state = shared_state.lock().expect("refresh state poisoned");
            if state
                .in_flight
                .as_ref()
                .is_some_and(|current| current.ptr_eq(&finished))
            {
                state.in_flight = None;
            }
        });

        handle
    }
}
