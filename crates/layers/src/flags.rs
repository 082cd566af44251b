use std::collections::BTreeMap;

use foundation::hue_for;
use serde::{Deserialize, Serialize};

/// Country spelling to flag asset key.
///
/// Unknown names fall back to the name with all whitespace removed. That key
/// may not exist as an asset; callers render a [`FallbackGlyph`] when the
/// flag fails to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagConfig {
    pub aliases: BTreeMap<String, String>,
    /// Asset path template; `{key}` is replaced with the flag key.
    pub url_template: String,
}

impl Default for FlagConfig {
    fn default() -> Self {
        let aliases = [
            ("United States", "USA"),
            ("United States of America", "USA"),
            ("USA", "USA"),
            ("Canada", "Canada"),
            ("Mexico", "Mexico"),
            ("United Kingdom", "UK"),
            ("UK", "UK"),
            ("Great Britain", "UK"),
            ("Vatican City", "VaticanCity"),
            ("Holy See", "VaticanCity"),
            ("France", "France"),
            ("Germany", "Germany"),
            ("Netherlands", "Netherlands"),
            ("Italy", "Italy"),
            ("Spain", "Spain"),
            ("Portugal", "Portugal"),
            ("Greece", "Greece"),
            ("Switzerland", "Switzerland"),
            ("Sweden", "Sweden"),
            ("Norway", "Norway"),
            ("Finland", "Finland"),
            ("Denmark", "Denmark"),
            ("Belgium", "Belgium"),
            ("Austria", "Austria"),
            ("Ireland", "Ireland"),
            ("Republic of Korea", "SouthKorea"),
            ("South Korea", "SouthKorea"),
            ("Korea", "SouthKorea"),
            ("China", "China"),
            ("Japan", "Japan"),
            ("India", "India"),
            ("Indonesia", "Indonesia"),
            ("Philippines", "Philippines"),
            ("Vietnam", "Vietnam"),
            ("Thailand", "Thailand"),
            ("Singapore", "Singapore"),
            ("Malaysia", "Malaysia"),
            ("Nepal", "Nepal"),
            ("Australia", "Australia"),
            ("New Zealand", "NewZealand"),
            ("Papua New Guinea", "PapuaNewGuinea"),
            ("Fiji", "Fiji"),
            ("Brazil", "Brazil"),
            ("Argentina", "Argentina"),
            ("Chile", "Chile"),
            ("Colombia", "Colombia"),
            ("Peru", "Peru"),
            ("South Africa", "SouthAfrica"),
            ("Egypt", "Egypt"),
            ("Kenya", "Kenya"),
            ("Nigeria", "Nigeria"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            aliases,
            url_template: "/icons/{key}.png".to_string(),
        }
    }
}

impl FlagConfig {
    pub fn flag_key(&self, country: &str) -> String {
        match self.aliases.get(country) {
            Some(key) => key.clone(),
            None => country.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }

    pub fn flag_url(&self, country: &str) -> String {
        self.url_template.replace("{key}", &self.flag_key(country))
    }

    pub fn flag(&self, country: &str) -> Flag {
        Flag {
            country: country.to_string(),
            key: self.flag_key(country),
            url: self.flag_url(country),
            fallback: FallbackGlyph::for_country(country),
        }
    }
}

/// A country flag as shown on a spider pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub country: String,
    pub key: String,
    pub url: String,
    pub fallback: FallbackGlyph,
}

/// Coloured disc with the country's initial, used when the flag asset is
/// missing. Same name, same glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackGlyph {
    pub letter: String,
    pub hue: u16,
}

impl FallbackGlyph {
    pub fn for_country(country: &str) -> Self {
        Self {
            letter: country
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect())
                .unwrap_or_default(),
            hue: hue_for(country),
        }
    }

    pub fn css_color(&self) -> String {
        format!("hsl({}, 70%, 60%)", self.hue)
    }
}

/// Grid placement for the flags above a spider pin.
///
/// Rows grow upward from a fixed bottom row.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FlagGrid {
    pub columns: usize,
    pub rows: usize,
    /// 1-based column of the last flag when the final row is short.
    pub centered_last_column: Option<usize>,
}

impl FlagGrid {
    pub const ROW_HEIGHT_PX: i32 = 16;
    pub const BOTTOM_ROW_TOP_PX: i32 = 5;

    pub fn for_count(count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let columns = match count {
            1 => 1,
            c if c > 6 => 3,
            _ => 2,
        };
        let rows = count.div_ceil(columns);
        let centered_last_column =
            (count % columns != 0 && count > columns).then(|| columns.div_ceil(2));
        Some(Self {
            columns,
            rows,
            centered_last_column,
        })
    }

    /// Top offset of the grid relative to the pin.
    pub fn top_px(&self) -> i32 {
        Self::BOTTOM_ROW_TOP_PX - (self.rows as i32 - 1) * Self::ROW_HEIGHT_PX
    }
}

#[cfg(test)]
mod tests {
    use super::{FallbackGlyph, FlagConfig, FlagGrid};

    #[test]
    fn aliases_then_whitespace_stripped_fallback() {
        let cfg = FlagConfig::default();
        assert_eq!(cfg.flag_key("United States of America"), "USA");
        assert_eq!(cfg.flag_key("Korea"), "SouthKorea");
        assert_eq!(cfg.flag_key("Solomon Islands"), "SolomonIslands");
        assert_eq!(cfg.flag_url("New Zealand"), "/icons/NewZealand.png");
    }

    #[test]
    fn fallback_glyph_is_deterministic() {
        let a = FallbackGlyph::for_country("tonga");
        assert_eq!(a.letter, "T");
        assert_eq!(a, FallbackGlyph::for_country("tonga"));
        assert!(a.hue < 360);
        assert_eq!(a.css_color(), format!("hsl({}, 70%, 60%)", a.hue));
        assert_eq!(FallbackGlyph::for_country("").letter, "");
    }

    #[test]
    fn grid_shapes() {
        assert_eq!(FlagGrid::for_count(0), None);
        let one = FlagGrid::for_count(1).expect("grid");
        assert_eq!((one.columns, one.rows, one.top_px()), (1, 1, 5));

        let three = FlagGrid::for_count(3).expect("grid");
        assert_eq!((three.columns, three.rows), (2, 2));
        assert_eq!(three.centered_last_column, Some(1));
        assert_eq!(three.top_px(), -11);

        let seven = FlagGrid::for_count(7).expect("grid");
        assert_eq!((seven.columns, seven.rows), (3, 3));
        assert_eq!(seven.centered_last_column, Some(2));

        assert_eq!(FlagGrid::for_count(4).expect("grid").centered_last_column, None);
    }
}
