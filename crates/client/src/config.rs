//! Client configuration.

use std::time::Duration;

/// Default per-request timeout. The backend itself imposes none, so the
/// client supplies one and surfaces expiry as an ordinary error state.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for [`HttpBackend`](crate::HttpBackend).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend, e.g. `http://127.0.0.1:8080`
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Secret required by delete endpoints, sent as the
    /// `X-Delete-Password` header. Deletes fail client-side when unset.
    pub delete_password: Option<String>,
}

impl ClientConfig {
    /// Configuration with defaults for everything but the base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            delete_password: None,
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the delete confirmation secret.
    pub fn with_delete_password(mut self, password: impl Into<String>) -> Self {
        self.delete_password = Some(password.into());
        self
    }
}
