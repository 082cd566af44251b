use formats::{Record, feature_collection};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::classifier::Classifier;
use crate::symbology::{IconVariant, SymbolStyle};

pub const MARKERS_SOURCE: &str = "markers";
pub const HOVER_SOURCE: &str = "hover-point";

pub const CLUSTERS_LAYER: &str = "clusters";
pub const CLUSTER_COUNT_LAYER: &str = "cluster-count";
pub const UNCLUSTERED_LAYER: &str = "unclustered-point";
pub const UNCLUSTERED_HOVER_LAYER: &str = "unclustered-point-hover";

/// Per-feature properties carrying the classified image ids.
pub const ICON_PROPERTY: &str = "icon";
pub const ICON_HOVER_PROPERTY: &str = "icon_hover";

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterOptions {
    pub radius: u32,
    pub min_points: u32,
    pub max_zoom: f64,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            radius: 50,
            min_points: 2,
            max_zoom: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSpec {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<ClusterOptions>,
}

impl SourceSpec {
    pub fn markers(cluster: ClusterOptions) -> Self {
        Self {
            id: MARKERS_SOURCE.to_string(),
            cluster: Some(cluster),
        }
    }

    pub fn hover() -> Self {
        Self {
            id: HOVER_SOURCE.to_string(),
            cluster: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureFilter {
    ClustersOnly,
    PointsOnly,
    All,
}

/// Where a symbol layer takes its image from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Fixed(String),
    Property(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Symbol {
    Icon {
        image: ImageSource,
        size: f32,
        anchor_bottom: bool,
    },
    Text {
        field: String,
        size: f32,
        color: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSpec {
    pub id: String,
    pub source: String,
    pub filter: FeatureFilter,
    pub symbol: Symbol,
}

/// The four marker layers, bottom to top.
pub fn marker_layers(style: &SymbolStyle, cluster_image_id: &str) -> Vec<LayerSpec> {
    vec![
        LayerSpec {
            id: CLUSTERS_LAYER.to_string(),
            source: MARKERS_SOURCE.to_string(),
            filter: FeatureFilter::ClustersOnly,
            symbol: Symbol::Icon {
                image: ImageSource::Fixed(cluster_image_id.to_string()),
                size: style.cluster_size,
                anchor_bottom: false,
            },
        },
        LayerSpec {
            id: CLUSTER_COUNT_LAYER.to_string(),
            source: MARKERS_SOURCE.to_string(),
            filter: FeatureFilter::ClustersOnly,
            symbol: Symbol::Text {
                field: "point_count_abbreviated".to_string(),
                size: 12.0,
                color: "#000000".to_string(),
            },
        },
        LayerSpec {
            id: UNCLUSTERED_LAYER.to_string(),
            source: MARKERS_SOURCE.to_string(),
            filter: FeatureFilter::PointsOnly,
            symbol: Symbol::Icon {
                image: ImageSource::Property(ICON_PROPERTY.to_string()),
                size: style.marker_size,
                anchor_bottom: true,
            },
        },
        LayerSpec {
            id: UNCLUSTERED_HOVER_LAYER.to_string(),
            source: HOVER_SOURCE.to_string(),
            filter: FeatureFilter::All,
            symbol: Symbol::Icon {
                image: ImageSource::Property(ICON_HOVER_PROPERTY.to_string()),
                size: style.hover_size,
                anchor_bottom: true,
            },
        },
    ]
}

/// GeoJSON for the clustered source with classified icon ids attached.
pub fn marker_features<'a, I>(records: I, classifier: &Classifier) -> Value
where
    I: IntoIterator<Item = &'a Record>,
{
    feature_collection(records, |record, props| decorate(record, classifier, props))
}

fn decorate(record: &Record, classifier: &Classifier, props: &mut Map<String, Value>) {
    let key = classifier.classify(&record.categories());
    props.insert(
        ICON_PROPERTY.to_string(),
        Value::String(key.image_id(IconVariant::Marker)),
    );
    props.insert(
        ICON_HOVER_PROPERTY.to_string(),
        Value::String(key.image_id(IconVariant::Hover)),
    );
}
