//! Icon catalog and image loading.
//!
//! Every image load resolves: a failed fetch is replaced with a generated
//! disc so the symbol layers never reference a missing image.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::symbology::{IconKey, IconVariant};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug)]
pub struct AssetError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl AssetError {
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

/// Fetches raw image bytes.
pub trait AssetLoader: Send + Sync {
    fn load(&self, url: String) -> BoxFuture<'_, Result<Vec<u8>, AssetError>>;
}

/// Image data handed to the map surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bitmap {
    /// Undecoded file contents (PNG and friends).
    Encoded(Vec<u8>),
    Raster {
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    },
}

impl Bitmap {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Bitmap::Raster { .. })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImageKind {
    Marker,
    Hover,
    Cluster,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub image_id: String,
    pub url: String,
    pub kind: ImageKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub image_id: String,
    pub bitmap: Bitmap,
}

/// Asset locations for every icon the classifier can produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconCatalog {
    pub icons: BTreeMap<IconKey, String>,
    pub default_url: String,
    /// Spider pin artwork, looked up separately from the markers.
    pub pins: BTreeMap<IconKey, String>,
    pub default_pin_url: String,
    pub cluster_image_id: String,
    pub cluster_url: String,
}

impl Default for IconCatalog {
    fn default() -> Self {
        let icons = [
            ("icon-arms-control", "./icons/icon-arms-control.png"),
            ("icon-cultural-diplomacy", "./icons/icon-cultural.png"),
            ("icon-defence-cooperation", "./icons/icon-defencecoop.png"),
            ("icon-defence-infrastructure", "./icons/icon-infrastructure.png"),
            ("icon-hadr", "./icons/icon-disaster.png"),
            ("icon-maritime-security", "./icons/icon-maritime.png"),
            ("icon-military-exercises", "./icons/icon-exercises.png"),
            ("icon-military-medical", "./icons/icon-medical.png"),
            ("icon-milpol", "./icons/icon-milpol.png"),
            ("icon-public-diplomacy", "./icons/icon-public.png"),
            ("icon-sports-diplomacy", "./icons/icon-sports.png"),
            ("icon-training", "./icons/icon-training.png"),
            ("icon-visit-diplomacy", "./icons/icon-visit.png"),
            ("icon-griffith", "./icons/Griffith.png"),
        ]
        .into_iter()
        .map(|(k, url)| (IconKey::new(k), url.to_string()))
        .collect::<BTreeMap<_, _>>();
        let pins = icons.clone();

        Self {
            icons,
            default_url: "/icons/default.png".to_string(),
            pins,
            default_pin_url: "/icons/default.png".to_string(),
            cluster_image_id: "cluster-icon".to_string(),
            cluster_url: "./icons/circle-yellow.png".to_string(),
        }
    }
}

impl IconCatalog {
    /// Asset url for `key`; unknown keys use the default icon.
    pub fn url_for(&self, key: &IconKey) -> &str {
        self.icons
            .get(key)
            .map(String::as_str)
            .unwrap_or(&self.default_url)
    }

    /// Pin asset url for `key`; unknown keys use the default pin.
    pub fn pin_url_for(&self, key: &IconKey) -> &str {
        self.pins
            .get(key)
            .map(String::as_str)
            .unwrap_or(&self.default_pin_url)
    }

    /// Marker and hover image for every icon plus the default and the
    /// cluster icon. Ordered by icon key, default last but one, cluster last.
    pub fn image_requests(&self) -> Vec<ImageRequest> {
        let default = IconKey::default_icon();
        let mut out = Vec::with_capacity(self.icons.len() * 2 + 3);
        let entries = self
            .icons
            .iter()
            .filter(|(k, _)| !k.is_default())
            .chain(std::iter::once((&default, &self.default_url)));
        for (key, url) in entries {
            out.push(ImageRequest {
                image_id: key.image_id(IconVariant::Marker),
                url: url.clone(),
                kind: ImageKind::Marker,
            });
            out.push(ImageRequest {
                image_id: key.image_id(IconVariant::Hover),
                url: url.clone(),
                kind: ImageKind::Hover,
            });
        }
        out.push(ImageRequest {
            image_id: self.cluster_image_id.clone(),
            url: self.cluster_url.clone(),
            kind: ImageKind::Cluster,
        });
        out
    }
}

const FALLBACK_FILL: [u8; 4] = [0xe5, 0x1f, 0x30, 0xff];
const FALLBACK_STROKE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

/// Red disc with a white ring, as used when an icon fails to load.
pub fn fallback_disc(size: u32, radius: f32, stroke_width: f32) -> Bitmap {
    let mut rgba = vec![0u8; (size * size * 4) as usize];
    let c = size as f32 / 2.0;
    let half = stroke_width / 2.0;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - c;
            let dy = y as f32 + 0.5 - c;
            let d = (dx * dx + dy * dy).sqrt();
            let px = if d <= radius - half {
                FALLBACK_FILL
            } else if d <= radius + half {
                FALLBACK_STROKE
            } else {
                continue;
            };
            let i = ((y * size + x) * 4) as usize;
            rgba[i..i + 4].copy_from_slice(&px);
        }
    }
    Bitmap::Raster {
        width: size,
        height: size,
        rgba,
    }
}

pub fn fallback_for(kind: ImageKind) -> Bitmap {
    match kind {
        ImageKind::Marker | ImageKind::Cluster => fallback_disc(40, 40.0 / 3.0, 3.0),
        ImageKind::Hover => fallback_disc(24, 10.0, 2.0),
    }
}

/// Loads every request concurrently. Never fails: each failed load yields
/// its fallback bitmap. Output order matches `requests`.
pub async fn load_images(loader: &dyn AssetLoader, requests: Vec<ImageRequest>) -> Vec<LoadedImage> {
    let loads = requests.into_iter().map(|req| async move {
        let bitmap = match loader.load(req.url.clone()).await {
            Ok(bytes) if !bytes.is_empty() => {
                debug!(image = %req.image_id, "icon loaded");
                Bitmap::Encoded(bytes)
            }
            Ok(_) => {
                warn!(image = %req.image_id, url = %req.url, "empty icon, using fallback");
                fallback_for(req.kind)
            }
            Err(e) => {
                warn!(image = %req.image_id, url = %req.url, error = %e, "icon failed to load, using fallback");
                fallback_for(req.kind)
            }
        };
        LoadedImage {
            image_id: req.image_id,
            bitmap,
        }
    });
    join_all(loads).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct OnlyTraining;

    impl AssetLoader for OnlyTraining {
        fn load(&self, url: String) -> BoxFuture<'_, Result<Vec<u8>, AssetError>> {
            Box::pin(async move {
                if url.contains("training") {
                    Ok(vec![0x89, b'P', b'N', b'G'])
                } else {
                    Err(AssetError::new(format!("not found: {url}")))
                }
            })
        }
    }

    #[test]
    fn requests_cover_marker_hover_default_and_cluster() {
        let cat = IconCatalog::default();
        let reqs = cat.image_requests();
        assert_eq!(reqs.len(), 14 * 2 + 2 + 1);
        let last = reqs.last().expect("cluster");
        assert_eq!(last.kind, ImageKind::Cluster);
        assert!(reqs.iter().any(|r| r.image_id == "default-hover"));
        assert!(reqs.iter().any(|r| r.image_id == "icon-training-hover"
            && r.url == "./icons/icon-training.png"));
    }

    #[test]
    fn failed_loads_resolve_to_fallbacks() {
        let cat = IconCatalog::default();
        let reqs = cat.image_requests();
        let n = reqs.len();
        let loaded = pollster::block_on(load_images(&OnlyTraining, reqs));
        assert_eq!(loaded.len(), n);

        let training = loaded
            .iter()
            .find(|l| l.image_id == "icon-training")
            .expect("training");
        assert!(!training.bitmap.is_fallback());

        let hover = loaded
            .iter()
            .find(|l| l.image_id == "default-hover")
            .expect("default hover");
        assert!(matches!(hover.bitmap, Bitmap::Raster { width: 24, height: 24, .. }));
    }

    #[test]
    fn fallback_disc_has_fill_center_and_clear_corner() {
        let Bitmap::Raster { width, rgba, .. } = fallback_disc(40, 40.0 / 3.0, 3.0) else {
            panic!("expected raster");
        };
        let at = |x: u32, y: u32| {
            let i = ((y * width + x) * 4) as usize;
            [rgba[i], rgba[i + 1], rgba[i + 2], rgba[i + 3]]
        };
        assert_eq!(at(20, 20), FALLBACK_FILL);
        assert_eq!(at(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn unknown_key_uses_default_url() {
        let cat = IconCatalog::default();
        assert_eq!(cat.url_for(&IconKey::new("nope")), "/icons/default.png");
        assert_eq!(
            cat.url_for(&IconKey::new("icon-hadr")),
            "./icons/icon-disaster.png"
        );
    }

    #[test]
    fn pins_resolve_from_their_own_table() {
        let mut cat = IconCatalog::default();
        let training = IconKey::new("icon-training");
        cat.pins
            .insert(training.clone(), "./pins/training-60.png".to_string());
        cat.default_pin_url = "./pins/default-60.png".to_string();

        assert_eq!(cat.pin_url_for(&training), "./pins/training-60.png");
        assert_eq!(cat.url_for(&training), "./icons/icon-training.png");
        assert_eq!(cat.pin_url_for(&IconKey::new("nope")), "./pins/default-60.png");
        assert_eq!(cat.url_for(&IconKey::new("nope")), "/icons/default.png");
    }
}
