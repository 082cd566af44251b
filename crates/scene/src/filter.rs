use std::collections::BTreeMap;

use formats::Record;
use serde::{Deserialize, Serialize};

/// Year constraint driven by the bottom slider.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "year")]
pub enum YearSelection {
    #[default]
    All,
    Exact(i32),
}

/// User-controlled filter over the record store.
///
/// Every label observed at load has an entry. Setters report whether the
/// state effectively changed; touching a label that was never observed is a
/// no-op.
///
/// Ordering contract:
/// - `categories()` / `countries()` iterate in label order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    categories: BTreeMap<String, bool>,
    countries: BTreeMap<String, bool>,
    search: String,
    search_lower: String,
    year: YearSelection,
}

impl FilterState {
    /// Filter with every given label included, empty search and all years.
    pub fn with_labels<C, K>(categories: C, countries: K) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(|c| (c.into(), true)).collect(),
            countries: countries.into_iter().map(|c| (c.into(), true)).collect(),
            ..Default::default()
        }
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.categories.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn countries(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.countries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn category_included(&self, label: &str) -> Option<bool> {
        self.categories.get(label).copied()
    }

    pub fn country_included(&self, label: &str) -> Option<bool> {
        self.countries.get(label).copied()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn year(&self) -> YearSelection {
        self.year
    }

    pub fn set_category(&mut self, label: &str, included: bool) -> bool {
        set_label(&mut self.categories, label, included)
    }

    pub fn set_country(&mut self, label: &str, included: bool) -> bool {
        set_label(&mut self.countries, label, included)
    }

    pub fn set_all_categories(&mut self, included: bool) -> bool {
        set_all(&mut self.categories, included)
    }

    pub fn set_all_countries(&mut self, included: bool) -> bool {
        set_all(&mut self.countries, included)
    }

    pub fn set_search(&mut self, query: &str) -> bool {
        if self.search == query {
            return false;
        }
        self.search = query.to_string();
        self.search_lower = query.to_lowercase();
        true
    }

    pub fn set_year(&mut self, year: YearSelection) -> bool {
        if self.year == year {
            return false;
        }
        self.year = year;
        true
    }

    /// Re-includes every label and clears the search. The year selection is
    /// owned by the slider and left alone.
    pub fn reset(&mut self) -> bool {
        let a = self.set_all_categories(true);
        let b = self.set_all_countries(true);
        let c = self.set_search("");
        a | b | c
    }

    /// Badge count: unchecked categories plus unchecked countries, plus one
    /// for a non-empty search.
    pub fn active_filter_count(&self) -> usize {
        let unchecked = |m: &BTreeMap<String, bool>| m.values().filter(|v| !**v).count();
        unchecked(&self.categories) + unchecked(&self.countries) + usize::from(!self.search.is_empty())
    }

    pub fn admits(&self, record: &Record) -> bool {
        self.category_passes(record)
            && self.country_passes(record)
            && self.search_passes(record)
            && self.year_passes(record)
    }

    fn category_passes(&self, record: &Record) -> bool {
        any_included(&self.categories, &record.categories())
    }

    fn country_passes(&self, record: &Record) -> bool {
        any_included(&self.countries, &record.delivering_countries())
    }

    fn search_passes(&self, record: &Record) -> bool {
        if self.search_lower.is_empty() {
            return true;
        }
        let needle = self.search_lower.as_str();
        [
            record.category.as_deref(),
            record.delivering_country.as_deref(),
            record.receiving_countries.as_deref(),
            record.comments.as_deref(),
            record.year_text(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
    }

    fn year_passes(&self, record: &Record) -> bool {
        match self.year {
            YearSelection::All => true,
            YearSelection::Exact(y) => record.year_value() == Some(y),
        }
    }
}

// Absent field means no constraint. A token without an entry counts as
// included.
fn any_included(map: &BTreeMap<String, bool>, tokens: &[&str]) -> bool {
    tokens.is_empty() || tokens.iter().any(|t| map.get(*t).copied().unwrap_or(true))
}

fn set_label(map: &mut BTreeMap<String, bool>, label: &str, included: bool) -> bool {
    match map.get_mut(label) {
        Some(v) if *v != included => {
            *v = included;
            true
        }
        _ => false,
    }
}

fn set_all(map: &mut BTreeMap<String, bool>, included: bool) -> bool {
    let mut changed = false;
    for v in map.values_mut() {
        changed |= *v != included;
        *v = included;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::{FilterState, YearSelection};
    use formats::{Attributes, Record};
    use foundation::{LonLat, RecordId};

    fn record(category: Option<&str>, country: Option<&str>, year: Option<&str>) -> Record {
        Record::new(
            RecordId(0),
            LonLat::new(150.0, -10.0),
            Attributes {
                category: category.map(str::to_string),
                delivering_country: country.map(str::to_string),
                year: year.map(str::to_string),
                comments: Some("Joint patrol off Honiara".to_string()),
                ..Default::default()
            },
        )
    }

    fn filter() -> FilterState {
        FilterState::with_labels(["Training", "Arms control"], ["Australia", "Japan"])
    }

    #[test]
    fn category_uses_or_semantics() {
        let mut f = filter();
        let r = record(Some("Training; Arms control"), None, None);
        assert!(f.set_category("Training", false));
        assert!(f.admits(&r));
        assert!(f.set_category("Arms control", false));
        assert!(!f.admits(&r));
    }

    #[test]
    fn absent_fields_pass() {
        let mut f = filter();
        f.set_all_categories(false);
        f.set_all_countries(false);
        assert!(f.admits(&record(None, None, None)));
    }

    #[test]
    fn unknown_label_toggle_is_noop() {
        let mut f = filter();
        let before = f.clone();
        assert!(!f.set_country("Atlantis", false));
        assert_eq!(f, before);
        assert_eq!(f.country_included("Atlantis"), None);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let mut f = filter();
        let r = record(Some("Training"), Some("Australia"), Some("2019"));
        assert!(f.set_search("HONIARA"));
        assert!(f.admits(&r));
        f.set_search("2019");
        assert!(f.admits(&r));
        f.set_search("japan");
        assert!(!f.admits(&r));
        assert!(!f.set_search("japan"));
    }

    #[test]
    fn exact_year_requires_parsed_match() {
        let mut f = filter();
        f.set_year(YearSelection::Exact(2019));
        assert!(f.admits(&record(None, None, Some("2019 "))));
        assert!(!f.admits(&record(None, None, Some("2020"))));
        assert!(!f.admits(&record(None, None, None)));
        assert!(!f.admits(&record(None, None, Some("unknown"))));
    }

    #[test]
    fn active_count_and_reset() {
        let mut f = filter();
        f.set_category("Training", false);
        f.set_country("Japan", false);
        f.set_search("x");
        f.set_year(YearSelection::Exact(2020));
        assert_eq!(f.active_filter_count(), 3);
        assert!(f.reset());
        assert_eq!(f.active_filter_count(), 0);
        assert_eq!(f.year(), YearSelection::Exact(2020));
        assert!(!f.reset());
    }
}
