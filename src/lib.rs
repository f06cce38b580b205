//! Vantage client — session layer for the Vantage analytics backend.
//!
//! Every data operation in the Vantage dashboard is a call to a backend
//! REST API authenticated by session cookies. This crate is the piece that
//! keeps those calls authenticated: a fetch wrapper that recovers from an
//! expired session (one refresh, one retry), a refresh coordinator that
//! collapses concurrent refresh attempts into a single network operation,
//! and a session facade for login/logout/validity checks.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use vantage_client::prelude::*;
//!
//! # async fn example() -> vantage_client::error::Result<()> {
//! let client = Arc::new(ApiClient::new(ClientConfig::from_env())?);
//! let response = client.fetch("/api/datasets", FetchOptions::new()).await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod prelude;
pub mod refresh;
pub mod session;
