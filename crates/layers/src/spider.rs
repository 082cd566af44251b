use foundation::{LonLat, PixelOffset, RecordId};
use scene::{Expansion, RecordStore};

use crate::classifier::Classifier;
use crate::flags::{Flag, FlagConfig, FlagGrid};
use crate::icons::IconCatalog;
use crate::symbology::{IconKey, IconVariant};

/// One leaf of an expanded cluster, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct SpiderPin {
    pub record: RecordId,
    pub anchor: LonLat,
    pub offset: PixelOffset,
    pub icon: IconKey,
    pub image_id: String,
    pub icon_url: String,
    /// Square pin edge in pixels.
    pub size_px: f32,
    pub flags: Vec<Flag>,
    pub flag_grid: Option<FlagGrid>,
}

/// Draw inputs shared by every pin of an expansion.
pub struct PinStyle<'a> {
    pub classifier: &'a Classifier,
    pub catalog: &'a IconCatalog,
    pub flags: &'a FlagConfig,
    pub size_px: f32,
}

pub fn spider_pins(expansion: &Expansion, store: &RecordStore, style: &PinStyle<'_>) -> Vec<SpiderPin> {
    expansion
        .leaves
        .iter()
        .filter_map(|leaf| {
            let record = store.get(leaf.record)?;
            let icon = style.classifier.classify(&record.categories()).clone();
            let countries = record.delivering_countries();
            Some(SpiderPin {
                record: leaf.record,
                anchor: expansion.center,
                offset: leaf.placement.offset(),
                image_id: icon.image_id(IconVariant::Pin),
                icon_url: style.catalog.pin_url_for(&icon).to_string(),
                size_px: style.size_px,
                icon,
                flag_grid: FlagGrid::for_count(countries.len()),
                flags: countries.iter().map(|c| style.flags.flag(c)).collect(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use formats::{Attributes, Dataset, Record};
    use foundation::ClusterId;
    use scene::{Leaf, LeafLayout, SpiralLayout};

    #[test]
    fn pins_follow_leaf_order_with_icons_and_flags() {
        let mk = |i: u32, cat: &str, country: Option<&str>| {
            Record::new(
                RecordId(i),
                LonLat::new(160.0, -9.0),
                Attributes {
                    category: Some(cat.to_string()),
                    delivering_country: country.map(str::to_string),
                    ..Default::default()
                },
            )
        };
        let store = RecordStore::from_dataset(Dataset::from_records(vec![
            mk(0, "Training", Some("Australia; New Zealand; Fiji")),
            mk(1, "Maritime Security", None),
        ]));
        let placements = SpiralLayout::default().layout(2);
        let expansion = Expansion {
            cluster: ClusterId(3),
            center: LonLat::new(160.0, -9.0),
            leaves: vec![
                Leaf { record: RecordId(1), placement: placements[0] },
                Leaf { record: RecordId(0), placement: placements[1] },
            ],
        };
        let classifier = Classifier::default();
        let mut catalog = IconCatalog::default();
        catalog.pins.insert(
            IconKey::new("icon-training"),
            "./pins/icon-training.png".to_string(),
        );
        let flags = FlagConfig::default();
        let style = PinStyle {
            classifier: &classifier,
            catalog: &catalog,
            flags: &flags,
            size_px: 60.0,
        };

        let pins = spider_pins(&expansion, &store, &style);
        assert_eq!(pins.len(), 2);
        assert_eq!(pins[0].icon.as_str(), "icon-maritime-security");
        assert!(pins[0].flags.is_empty());
        assert_eq!(pins[0].flag_grid, None);

        assert_eq!(pins[1].icon_url, "./pins/icon-training.png");
        assert_eq!(pins[1].image_id, "icon-training-pin");
        assert_eq!(pins[1].size_px, 60.0);
        assert_eq!(pins[0].icon_url, "./icons/icon-maritime.png");
        let keys: Vec<&str> = pins[1].flags.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["Australia", "NewZealand", "Fiji"]);
        assert_eq!(pins[1].flag_grid.map(|g| g.columns), Some(2));
    }
}
