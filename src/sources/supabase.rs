use crate::error::FetchError;
use crate::models::Property;
use crate::sources::traits::ListingSource;
use crate::sources::types::SourceConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use tracing::{debug, info, warn};

/// Reads listings through the Supabase PostgREST endpoint
pub struct SupabaseSource {
    client: Client,
    url: String,
}

impl SupabaseSource {
    /// Create a source bound to one project and credential
    pub fn new(config: SourceConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key).context("API key is not a valid header value")?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .context("API key is not a valid header value")?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: select_all_url(&config.endpoint, &config.table),
        })
    }
}

/// `GET /rest/v1/<table>?select=*`, no server-side filtering or paging
fn select_all_url(endpoint: &str, table: &str) -> String {
    format!("{}/rest/v1/{}?select=*", endpoint.trim_end_matches('/'), table)
}

#[async_trait]
impl ListingSource for SupabaseSource {
    async fn fetch_all(&self) -> Result<Vec<Property>, FetchError> {
        debug!("Fetching URL: {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Supabase returned status: {}", status);
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::from_status(status, body));
        }

        let body = response.text().await?;
        debug!("Downloaded {} bytes of JSON", body.len());

        let properties: Vec<Property> = serde_json::from_str(&body)?;
        info!("Fetched {} properties from {}", properties.len(), self.source_name());
        Ok(properties)
    }

    fn source_name(&self) -> &'static str {
        "Supabase"
    }
}
