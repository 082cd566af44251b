//! Icon and flag loaders for the [`AssetLoader`] seam.

use std::path::{Path, PathBuf};

use layers::icons::BoxFuture;
use layers::{AssetError, AssetLoader};

use crate::source::is_http;

/// Strips `./` and leading `/` so catalog urls can be joined to a root.
fn relative(url: &str) -> &str {
    url.trim_start_matches("./").trim_start_matches('/')
}

pub struct FileAssetLoader {
    root: PathBuf,
}

impl FileAssetLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn resolve(&self, url: &str) -> PathBuf {
        self.root.join(relative(url))
    }
}

impl AssetLoader for FileAssetLoader {
    fn load(&self, url: String) -> BoxFuture<'_, Result<Vec<u8>, AssetError>> {
        Box::pin(async move {
            let path = self.resolve(&url);
            tokio::fs::read(&path)
                .await
                .map_err(|e| AssetError::with_source(format!("failed to read {}", path.display()), e))
        })
    }
}

pub struct HttpAssetLoader {
    base: String,
    client: reqwest::Client,
}

impl HttpAssetLoader {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn resolve(&self, url: &str) -> String {
        if is_http(url) {
            return url.to_string();
        }
        format!("{}/{}", self.base.trim_end_matches('/'), relative(url))
    }
}

impl AssetLoader for HttpAssetLoader {
    fn load(&self, url: String) -> BoxFuture<'_, Result<Vec<u8>, AssetError>> {
        Box::pin(async move {
            let full = self.resolve(&url);
            let resp = self
                .client
                .get(&full)
                .send()
                .await
                .map_err(|e| AssetError::with_source("HTTP request failed", e))?;
            if !resp.status().is_success() {
                return Err(AssetError::new(format!("HTTP error: {}", resp.status())));
            }
            let bytes = resp
                .bytes()
                .await
                .map_err(|e| AssetError::with_source("Failed to read response", e))?;
            Ok(bytes.to_vec())
        })
    }
}

/// Loader that never finds anything; every image ends up as its fallback.
pub struct NoAssets;

impl AssetLoader for NoAssets {
    fn load(&self, url: String) -> BoxFuture<'_, Result<Vec<u8>, AssetError>> {
        Box::pin(async move { Err(AssetError::new(format!("no asset store for {url}"))) })
    }
}

pub fn loader_for(asset_root: &str) -> Box<dyn AssetLoader> {
    if is_http(asset_root) {
        Box::new(HttpAssetLoader::new(asset_root))
    } else {
        Box::new(FileAssetLoader::new(asset_root))
    }
}

#[cfg(test)]
mod tests {
    use super::{FileAssetLoader, HttpAssetLoader, NoAssets};
    use layers::{AssetLoader, IconCatalog, load_images};

    #[test]
    fn catalog_urls_resolve_under_the_root() {
        let files = FileAssetLoader::new("/srv/public");
        assert_eq!(
            files.resolve("./icons/icon-training.png"),
            std::path::PathBuf::from("/srv/public/icons/icon-training.png")
        );
        let http = HttpAssetLoader::new("https://maps.example.org/");
        assert_eq!(http.resolve("/icons/UK.png"), "https://maps.example.org/icons/UK.png");
        assert_eq!(http.resolve("https://cdn.example.org/x.png"), "https://cdn.example.org/x.png");
    }

    #[test]
    fn missing_assets_all_fall_back() {
        let reqs = IconCatalog::default().image_requests();
        let n = reqs.len();
        let loaded = pollster::block_on(load_images(&NoAssets, reqs));
        assert_eq!(loaded.len(), n);
        assert!(loaded.iter().all(|l| l.bitmap.is_fallback()));
        assert!(pollster::block_on(NoAssets.load("x".to_string())).is_err());
    }
}
