use std::time::Duration;

/// Connection parameters for the hosted query API
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Project endpoint, e.g. `https://xyz.supabase.co`
    pub endpoint: String,
    /// Anonymous access key sent as `apikey` and bearer token
    pub api_key: String,
    /// Table holding the listings
    pub table: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl SourceConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            table: "properties".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}
