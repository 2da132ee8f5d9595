use std::time::Duration;

/// Public NHL web API root.
pub const DEFAULT_BASE_URL: &str = "https://api-web.nhle.com/v1";
/// Deadline for a single feed request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Runtime configuration describing how to reach the NHL feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NhlConfig {
    /// API root, without trailing slash requirements.
    pub base_url: String,
    /// Deadline for each request.
    pub request_timeout: Duration,
}

impl NhlConfig {
    /// Construct a configuration for the given API root with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Default for NhlConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
