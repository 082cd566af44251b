//! Dataset sources.
//!
//! The dataset is a static GeoJSON FeatureCollection fetched once per
//! session. Sources return boxed futures so they stay dyn-compatible.

use std::path::{Path, PathBuf};

use formats::Dataset;
use layers::icons::BoxFuture;
use tracing::info;

#[derive(Debug)]
pub struct DataSourceError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DataSourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl DataSourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

pub trait DataSource: Send + Sync {
    /// Human-readable location for logs.
    fn describe(&self) -> String;

    fn fetch(&self) -> BoxFuture<'_, Result<String, DataSourceError>>;
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DataSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> BoxFuture<'_, Result<String, DataSourceError>> {
        Box::pin(async move {
            tokio::fs::read_to_string(&self.path).await.map_err(|e| {
                DataSourceError::with_source(
                    format!("failed to read {}", self.path.display()),
                    e,
                )
            })
        })
    }
}

pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl DataSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> BoxFuture<'_, Result<String, DataSourceError>> {
        Box::pin(async move {
            let resp = self
                .client
                .get(&self.url)
                .send()
                .await
                .map_err(|e| DataSourceError::with_source("HTTP request failed", e))?;

            if !resp.status().is_success() {
                return Err(DataSourceError::new(format!(
                    "HTTP error: {}",
                    resp.status()
                )));
            }

            resp.text()
                .await
                .map_err(|e| DataSourceError::with_source("Failed to read response", e))
        })
    }
}

/// In-memory payload, for replays and tests.
pub struct StaticSource {
    body: String,
}

impl StaticSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl DataSource for StaticSource {
    fn describe(&self) -> String {
        "<inline>".to_string()
    }

    fn fetch(&self) -> BoxFuture<'_, Result<String, DataSourceError>> {
        Box::pin(async move { Ok(self.body.clone()) })
    }
}

pub fn is_http(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// HTTP source for http(s) urls, file source otherwise.
pub fn source_for(location: &str) -> Box<dyn DataSource> {
    if is_http(location) {
        Box::new(HttpSource::new(location))
    } else {
        Box::new(FileSource::new(location))
    }
}

/// Fetches and parses the dataset. A payload that is not a FeatureCollection
/// is a fetch failure.
pub async fn load_dataset(source: &dyn DataSource) -> Result<Dataset, DataSourceError> {
    let body = source.fetch().await?;
    let dataset = Dataset::from_geojson_str(&body).map_err(|e| {
        DataSourceError::with_source(format!("failed to parse {}", source.describe()), e)
    })?;
    info!(
        source = %source.describe(),
        records = dataset.len(),
        skipped = dataset.skipped,
        hash = dataset.content_hash().unwrap_or(""),
        "dataset loaded"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::{FileSource, StaticSource, is_http, load_dataset, source_for};
    use std::io::Write;

    const ONE_POINT: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","geometry":{"type":"Point","coordinates":[160.0,-9.4]},
         "properties":{"Diplomacy_category":"Training"}}]}"#;

    #[test]
    fn static_source_round_trips_through_the_parser() {
        let ds = pollster::block_on(load_dataset(&StaticSource::new(ONE_POINT))).expect("dataset");
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let err = pollster::block_on(load_dataset(&StaticSource::new("[]"))).unwrap_err();
        assert!(err.message.contains("failed to parse"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn file_source_reads_from_disk() {
        let mut f = tempfile::NamedTempFile::new().expect("tempfile");
        f.write_all(ONE_POINT.as_bytes()).expect("write");
        let ds = load_dataset(&FileSource::new(f.path())).await.expect("dataset");
        assert_eq!(ds.records[0].primary_category(), Some("Training"));

        let missing = load_dataset(&FileSource::new("/no/such/file.geojson")).await;
        assert!(missing.is_err());
    }

    #[test]
    fn location_picks_source_kind() {
        assert!(is_http("https://example.org/data.geojson"));
        assert!(!is_http("data/events.geojson"));
        assert_eq!(source_for("data/events.geojson").describe(), "data/events.geojson");
    }
}
