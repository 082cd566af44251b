use foundation::{LonLat, RecordId};
use serde_json::{Map, Value};
use tracing::warn;

use crate::record::{Attributes, Record, keys};

/// The loaded working set: every usable feature of one static collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub records: Vec<Record>,
    /// Features dropped because they had no usable point geometry.
    pub skipped: usize,
    content_hash: Option<String>,
}

#[derive(Debug)]
pub enum DatasetError {
    Json(serde_json::Error),
    NotAFeatureCollection,
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Json(e) => write!(f, "JSON parse error: {e}"),
            DatasetError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Json(e) => Some(e),
            DatasetError::NotAFeatureCollection => None,
        }
    }
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            skipped: 0,
            content_hash: None,
        }
    }

    pub fn from_geojson_str(payload: &str) -> Result<Self, DatasetError> {
        let value: Value = serde_json::from_str(payload).map_err(DatasetError::Json)?;
        let mut dataset = Self::from_geojson_value(value)?;
        dataset.content_hash = Some(blake3::hash(payload.as_bytes()).to_hex().to_string());
        Ok(dataset)
    }

    /// Builds the dataset from a parsed FeatureCollection.
    ///
    /// Only the top-level shape is fatal. Individual features without a usable
    /// point geometry are skipped and counted; missing attributes are kept as
    /// `None`.
    pub fn from_geojson_value(value: Value) -> Result<Self, DatasetError> {
        let obj = value
            .as_object()
            .ok_or(DatasetError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(DatasetError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(DatasetError::NotAFeatureCollection);
        }
        let features = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(DatasetError::NotAFeatureCollection)?;

        let mut records = Vec::with_capacity(features.len());
        let mut skipped = 0usize;
        for (index, feat) in features.iter().enumerate() {
            let Some(feat_obj) = feat.as_object() else {
                warn!(index, "skipping feature: not an object");
                skipped += 1;
                continue;
            };
            let position = match feat_obj.get("geometry").map(parse_point_geometry) {
                Some(Ok(p)) => p,
                Some(Err(reason)) => {
                    warn!(index, %reason, "skipping feature");
                    skipped += 1;
                    continue;
                }
                None => {
                    warn!(index, "skipping feature: missing geometry");
                    skipped += 1;
                    continue;
                }
            };

            let empty = Map::new();
            let props = feat_obj
                .get("properties")
                .and_then(|v| v.as_object())
                .unwrap_or(&empty);

            let id = RecordId(records.len() as u32);
            records.push(Record::new(id, position, attributes_from_properties(props)));
        }

        Ok(Self {
            records,
            skipped,
            content_hash: None,
        })
    }

    /// blake3 of the source payload when loaded from text.
    pub fn content_hash(&self) -> Option<&str> {
        self.content_hash.as_deref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Emits a GeoJSON FeatureCollection for `records`.
///
/// `decorate` may add derived properties (icon ids and the like) to each
/// feature. The record's own attributes and `primaryCategory` are always
/// written; absent attributes are omitted.
pub fn feature_collection<'a, I, F>(records: I, mut decorate: F) -> Value
where
    I: IntoIterator<Item = &'a Record>,
    F: FnMut(&Record, &mut Map<String, Value>),
{
    let mut root = Map::new();
    root.insert(
        "type".to_string(),
        Value::String("FeatureCollection".to_string()),
    );

    let mut features = Vec::new();
    for record in records {
        let mut props = properties_for(record);
        decorate(record, &mut props);

        let mut geometry = Map::new();
        geometry.insert("type".to_string(), Value::String("Point".to_string()));
        geometry.insert(
            "coordinates".to_string(),
            Value::Array(record.position.to_array().into_iter().map(Value::from).collect()),
        );

        let mut fobj = Map::new();
        fobj.insert("type".to_string(), Value::String("Feature".to_string()));
        fobj.insert("id".to_string(), Value::from(record.id.0));
        fobj.insert("properties".to_string(), Value::Object(props));
        fobj.insert("geometry".to_string(), Value::Object(geometry));
        features.push(Value::Object(fobj));
    }

    root.insert("features".to_string(), Value::Array(features));
    Value::Object(root)
}

fn properties_for(record: &Record) -> Map<String, Value> {
    let mut props = Map::new();
    let mut put = |key: &str, value: Option<&str>| {
        if let Some(v) = value {
            props.insert(key.to_string(), Value::String(v.to_string()));
        }
    };
    put(keys::CATEGORY, record.category.as_deref());
    put(keys::DELIVERING_COUNTRY, record.delivering_country.as_deref());
    put(keys::RECEIVING_COUNTRIES, record.receiving_countries.as_deref());
    put(keys::YEAR, record.year_text());
    put(keys::COMMENTS, record.comments.as_deref());
    put(keys::SOURCE, record.source.as_deref());
    put(keys::PRIMARY_CATEGORY, record.primary_category());
    props
}

fn attributes_from_properties(props: &Map<String, Value>) -> Attributes {
    let text = |key: &str| props.get(key).and_then(property_text);
    Attributes {
        category: text(keys::CATEGORY),
        delivering_country: text(keys::DELIVERING_COUNTRY),
        receiving_countries: text(keys::RECEIVING_COUNTRIES),
        year: text(keys::YEAR),
        comments: text(keys::COMMENTS),
        source: text(keys::SOURCE),
    }
}

fn property_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_point_geometry(value: &Value) -> Result<LonLat, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;
    if ty != "Point" {
        return Err(format!("unsupported geometry type: {ty}"));
    }
    let arr = obj
        .get("coordinates")
        .and_then(|v| v.as_array())
        .ok_or("Point coordinates must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("Point coordinates must have [lon, lat]".to_string());
    }
    let lon = arr[0]
        .as_f64()
        .ok_or("Point lon must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or("Point lat must be a number".to_string())?;
    let p = LonLat::new(lon, lat);
    if !p.is_valid() {
        return Err(format!("Point out of range: [{lon}, {lat}]"));
    }
    Ok(p)
}
