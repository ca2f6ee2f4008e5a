use crate::filters::{Filters, KindFilter, PriceRange, PropertyType, PRICE_CEILING};
use crate::map::MapboxStatic;
use crate::models::PropertyId;
use crate::page::{Capabilities, ViewMode};
use crate::sort::SortKey;
use crate::sources::{FileSource, ListingSource, SourceConfig, SupabaseSource};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Browse real-estate listings from a hosted `properties` table
#[derive(Debug, Parser)]
#[command(name = "property-search", version)]
pub struct Cli {
    /// Backend project URL
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// Backend access key
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    pub supabase_key: Option<String>,

    /// Map tile access token
    #[arg(long, env = "MAPBOX_ACCESS_TOKEN", hide_env_values = true, default_value = "")]
    pub mapbox_token: String,

    /// Request timeout in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Read listings from a JSON file instead of the backend
    #[arg(long, value_name = "PATH")]
    pub from_file: Option<PathBuf>,

    /// Initial view
    #[arg(long, value_enum, default_value_t = ViewMode::List)]
    pub view: ViewMode,

    /// price-asc, price-desc or rating-desc; anything else keeps backend order
    #[arg(long, default_value = "price-asc")]
    pub sort: String,

    /// Listing kind
    #[arg(long, value_enum, default_value_t = KindFilter::All)]
    pub kind: KindFilter,

    /// City, zip or address fragment
    #[arg(long)]
    pub location: Option<String>,

    #[arg(long, default_value_t = 0.0)]
    pub min_price: f64,

    /// Omit for no upper bound
    #[arg(long)]
    pub max_price: Option<f64>,

    #[arg(long, value_enum)]
    pub property_type: Option<PropertyType>,

    /// Mark a listing as favorite (repeatable)
    #[arg(long = "favorite", value_name = "ID")]
    pub favorites: Vec<PropertyId>,

    /// Open the detail view of a listing
    #[arg(long, value_name = "ID")]
    pub details: Option<PropertyId>,

    /// Hide the user header
    #[arg(long)]
    pub no_header: bool,

    /// Disable favorites
    #[arg(long)]
    pub no_favorites: bool,

    /// Keep the page open and read commands from stdin
    #[arg(short, long)]
    pub interactive: bool,

    /// Write the displayed listings to a JSON file
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            show_header: !self.no_header,
            enable_favorites: !self.no_favorites,
        }
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort.parse().unwrap_or(SortKey::Unsorted)
    }

    pub fn filters(&self) -> Filters {
        Filters {
            kind: self.kind,
            location: self.location.clone().unwrap_or_default(),
            price: PriceRange::new(self.min_price, self.max_price.unwrap_or(PRICE_CEILING)),
            property_type: self.property_type,
        }
    }

    /// Listing source selected by the flags
    pub fn source(&self) -> Result<Arc<dyn ListingSource>> {
        if let Some(path) = &self.from_file {
            return Ok(Arc::new(FileSource::new(path)));
        }

        let endpoint = self
            .supabase_url
            .clone()
            .context("SUPABASE_URL is not set (or pass --from-file)")?;
        let api_key = self
            .supabase_key
            .clone()
            .context("SUPABASE_ANON_KEY is not set")?;

        let config = SourceConfig::new(endpoint, api_key).with_timeout(Duration::from_secs(self.timeout_secs));
        Ok(Arc::new(SupabaseSource::new(config)?))
    }

    pub fn map_backend(&self) -> MapboxStatic {
        MapboxStatic::new(self.mapbox_token.clone())
    }
}
