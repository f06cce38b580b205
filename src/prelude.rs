//! Convenience re-exports for call sites.

pub use crate::config::ClientConfig;
pub use crate::error::{ClientError, Result};
pub use crate::http::{ApiClient, FetchOptions, SessionJar, SessionLostHook};
pub use crate::refresh::RefreshCoordinator;
pub use crate::session::{LoginError, Session, UserProfile};
