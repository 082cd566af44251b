use serde::{Deserialize, Serialize};

/// Image id registered with the map surface for one marker category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconKey(String);

impl IconKey {
    pub const DEFAULT: &'static str = "default";
    pub const HOVER_SUFFIX: &'static str = "-hover";
    pub const PIN_SUFFIX: &'static str = "-pin";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn default_icon() -> Self {
        Self::new(Self::DEFAULT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }

    /// Image id of the given variant of this icon.
    pub fn image_id(&self, variant: IconVariant) -> String {
        match variant {
            IconVariant::Marker => self.0.clone(),
            IconVariant::Hover => format!("{}{}", self.0, Self::HOVER_SUFFIX),
            IconVariant::Pin => format!("{}{}", self.0, Self::PIN_SUFFIX),
        }
    }
}

impl std::fmt::Display for IconKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an icon is drawn. All variants of a record share one [`IconKey`];
/// each variant has its own asset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IconVariant {
    /// Unclustered marker symbol.
    Marker,
    /// Enlarged symbol on the hover layer.
    Hover,
    /// Spiderified leaf pin.
    Pin,
}

/// Symbol styling shared by the marker layers.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolStyle {
    pub marker_size: f32,
    pub hover_size: f32,
    pub cluster_size: f32,
    /// Spider pin edge in pixels.
    pub pin_size_px: f32,
}

impl Default for SymbolStyle {
    fn default() -> Self {
        Self {
            marker_size: 0.088,
            hover_size: 0.12,
            cluster_size: 1.0,
            pin_size_px: 60.0,
        }
    }
}
