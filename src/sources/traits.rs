use crate::error::FetchError;
use crate::models::Property;
use async_trait::async_trait;

/// Common trait for everything that can hand the page its listings.
/// The page only ever holds a `dyn ListingSource`, so tests swap in doubles.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Read the whole `properties` collection in one attempt
    async fn fetch_all(&self) -> Result<Vec<Property>, FetchError>;

    /// Get the name of the listing source
    fn source_name(&self) -> &'static str;
}
