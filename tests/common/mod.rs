//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use vantage_client::config::ClientConfig;
use vantage_client::http::{flag_hook, ApiClient};

/// Config pointed at a mock server, with a short clear delay so tests
/// that wait out the trailing clear stay fast.
pub fn test_config(uri: &str) -> ClientConfig {
    ClientConfig::default()
        .with_base_url(uri)
        .with_clear_delay(Duration::from_millis(20))
}

/// Client wired to a counting session-lost hook.
pub fn client_with_hook(config: ClientConfig) -> (Arc<ApiClient>, Arc<Mutex<u32>>) {
    let (hook, fired) = flag_hook();
    let client = ApiClient::with_session_lost_hook(config, hook).expect("build client");
    (Arc::new(client), fired)
}

pub fn fired_count(counter: &Arc<Mutex<u32>>) -> u32 {
    *counter.lock().expect("hook counter poisoned")
}
