use foundation::{LonLat, RecordId, parse_list, parse_year_prefix};

/// Feature property keys of the diplomacy dataset.
pub mod keys {
    pub const CATEGORY: &str = "Diplomacy_category";
    pub const DELIVERING_COUNTRY: &str = "Delivering_Country";
    pub const RECEIVING_COUNTRIES: &str = "Receiving_Countries";
    pub const YEAR: &str = "Year";
    pub const COMMENTS: &str = "Comments";
    pub const SOURCE: &str = "Source";
    /// Derived on load; first parsed category token.
    pub const PRIMARY_CATEGORY: &str = "primaryCategory";
}

/// Year attribute: the text as it appeared in the data plus its parsed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Year {
    raw: String,
    value: Option<i32>,
}

impl Year {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let value = parse_year_prefix(&raw);
        Self { raw, value }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> Option<i32> {
        self.value
    }
}

/// Free-text attributes of a record, as read from the feature properties.
///
/// Empty strings are normalized to `None` by the loader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub category: Option<String>,
    pub delivering_country: Option<String>,
    pub receiving_countries: Option<String>,
    pub year: Option<String>,
    pub comments: Option<String>,
    pub source: Option<String>,
}

/// One geo-tagged diplomacy event. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub position: LonLat,
    pub category: Option<String>,
    pub delivering_country: Option<String>,
    pub receiving_countries: Option<String>,
    pub year: Option<Year>,
    pub comments: Option<String>,
    pub source: Option<String>,
    primary_category: Option<String>,
}

impl Record {
    pub fn new(id: RecordId, position: LonLat, attrs: Attributes) -> Self {
        let primary_category = parse_list(attrs.category.as_deref())
            .first()
            .map(|s| s.to_string());
        Self {
            id,
            position,
            category: attrs.category,
            delivering_country: attrs.delivering_country,
            receiving_countries: attrs.receiving_countries,
            year: attrs.year.map(Year::parse),
            comments: attrs.comments,
            source: attrs.source,
            primary_category,
        }
    }

    /// Cached first category token.
    ///
    /// Only for single-icon fast paths; filtering and classification always
    /// re-parse [`Record::categories`].
    pub fn primary_category(&self) -> Option<&str> {
        self.primary_category.as_deref()
    }

    pub fn categories(&self) -> Vec<&str> {
        parse_list(self.category.as_deref())
    }

    pub fn delivering_countries(&self) -> Vec<&str> {
        parse_list(self.delivering_country.as_deref())
    }

    pub fn receiving_countries_list(&self) -> Vec<&str> {
        parse_list(self.receiving_countries.as_deref())
    }

    pub fn year_value(&self) -> Option<i32> {
        self.year.as_ref().and_then(Year::value)
    }

    pub fn year_text(&self) -> Option<&str> {
        self.year.as_ref().map(Year::raw)
    }

    /// Parsed categories joined with `" / "`, or `None` without categories.
    pub fn category_label(&self) -> Option<String> {
        let cats = self.categories();
        if cats.is_empty() {
            None
        } else {
            Some(cats.join(" / "))
        }
    }
}
