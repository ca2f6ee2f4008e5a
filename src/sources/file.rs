use crate::error::FetchError;
use crate::models::Property;
use crate::sources::traits::ListingSource;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

/// Offline source reading a JSON array of `properties` rows, such as a
/// file previously written with `--export`
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ListingSource for FileSource {
    async fn fetch_all(&self) -> Result<Vec<Property>, FetchError> {
        debug!("Reading listings from {}", self.path.display());
        let json = tokio::fs::read_to_string(&self.path).await?;
        let properties: Vec<Property> = serde_json::from_str(&json)?;
        info!("Loaded {} properties from {}", properties.len(), self.path.display());
        Ok(properties)
    }

    fn source_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("property-search-{}-{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn reads_rows_from_disk() {
        let path = temp_path("rows.json");
        tokio::fs::write(&path, r#"[{"id": 1, "price": 500}, {"id": 2, "price": 300}]"#)
            .await
            .unwrap();

        let properties = FileSource::new(&path).fetch_all().await.unwrap();
        let ids: Vec<_> = properties.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = FileSource::new(temp_path("absent.json")).fetch_all().await.unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
    }

    #[tokio::test]
    async fn malformed_json_is_decode_error() {
        let path = temp_path("broken.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let err = FileSource::new(&path).fetch_all().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
