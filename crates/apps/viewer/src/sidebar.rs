//! View models for the sidebar list and the side panels.

use foundation::RecordId;
use layers::popup::{compact_line, heading};
use scene::{FilterState, RecordStore, YearSelection};

pub const EMPTY_LIST_MESSAGE: &str = "No events match your filters.";
pub const LIST_DESCRIPTION_MAX: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub record: RecordId,
    pub title: String,
    pub subtitle: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarView {
    pub heading: String,
    pub entries: Vec<SidebarEntry>,
    pub empty_message: Option<&'static str>,
}

impl SidebarView {
    /// One entry per admitted record, in dataset order.
    pub fn build(store: &RecordStore) -> Self {
        let entries: Vec<SidebarEntry> = store
            .filtered()
            .map(|r| SidebarEntry {
                record: r.id,
                title: heading(r),
                subtitle: compact_line(r),
                description: r.comments.as_deref().map(clip_description),
            })
            .collect();
        Self {
            heading: format!("Events ({})", entries.len()),
            empty_message: entries.is_empty().then_some(EMPTY_LIST_MESSAGE),
            entries,
        }
    }
}

// First 100 characters, then the ellipsis.
fn clip_description(text: &str) -> String {
    if text.chars().count() > LIST_DESCRIPTION_MAX {
        let mut s: String = text.chars().take(LIST_DESCRIPTION_MAX).collect();
        s.push_str("...");
        s
    } else {
        text.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckItem {
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPanelView {
    pub categories: Vec<CheckItem>,
    pub countries: Vec<CheckItem>,
    pub search: String,
    pub active_filters: usize,
}

impl FilterPanelView {
    pub fn build(filter: &FilterState) -> Self {
        Self {
            categories: check_items(filter.categories()),
            countries: check_items(filter.countries()),
            search: filter.search().to_string(),
            active_filters: filter.active_filter_count(),
        }
    }
}

fn check_items<'a>(items: impl Iterator<Item = (&'a str, bool)>) -> Vec<CheckItem> {
    items
        .map(|(label, checked)| CheckItem {
            label: label.to_string(),
            checked,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSliderView {
    pub min: i32,
    pub max: i32,
    /// Slider thumb position.
    pub value: i32,
    pub all_years: bool,
    /// `"All Years"` or the selected year.
    pub label: String,
}

impl YearSliderView {
    /// `None` when no record carries a year; the slider is hidden then.
    pub fn build(years: &[i32], active: Option<i32>, selection: YearSelection) -> Option<Self> {
        if years.is_empty() {
            return None;
        }
        let (min, max) = compute::year_range(years);
        let all_years = selection == YearSelection::All;
        let value = active.unwrap_or(min);
        Some(Self {
            min,
            max,
            value,
            all_years,
            label: match selection {
                YearSelection::All => "All Years".to_string(),
                YearSelection::Exact(y) => y.to_string(),
            },
        })
    }
}

/// Which side panels are open.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PanelState {
    pub sidebar_collapsed: bool,
    pub filter_open: bool,
    pub stats_open: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use formats::{Attributes, Dataset, Record};
    use foundation::LonLat;
    use pretty_assertions::assert_eq;

    fn store() -> RecordStore {
        let r = Record::new(
            RecordId(0),
            LonLat::new(160.0, -9.0),
            Attributes {
                category: Some("Training".to_string()),
                delivering_country: Some("Australia".to_string()),
                receiving_countries: Some("Fiji".to_string()),
                year: Some("2020".to_string()),
                comments: Some("x".repeat(120)),
                ..Default::default()
            },
        );
        RecordStore::from_dataset(Dataset::from_records(vec![r]))
    }

    #[test]
    fn sidebar_lists_admitted_records() {
        let v = SidebarView::build(&store());
        assert_eq!(v.heading, "Events (1)");
        assert_eq!(v.empty_message, None);
        let e = &v.entries[0];
        assert_eq!(e.title, "Training");
        assert_eq!(e.subtitle, "Australia \u{2192} Fiji (2020)");
        let d = e.description.as_deref().expect("description");
        assert_eq!(d.chars().count(), 103);
        assert!(d.ends_with("..."));
    }

    #[test]
    fn empty_list_message() {
        let mut s = store();
        let mut f = s.default_filter();
        f.set_all_categories(false);
        s.apply_filter(&f);
        let v = SidebarView::build(&s);
        assert_eq!(v.heading, "Events (0)");
        assert_eq!(v.empty_message, Some(EMPTY_LIST_MESSAGE));
    }

    #[test]
    fn filter_panel_reflects_state() {
        let s = store();
        let mut f = s.default_filter();
        f.set_country("Australia", false);
        let v = FilterPanelView::build(&f);
        assert_eq!(v.countries, vec![CheckItem { label: "Australia".to_string(), checked: false }]);
        assert_eq!(v.active_filters, 1);
    }

    #[test]
    fn year_slider_labels() {
        assert_eq!(YearSliderView::build(&[], None, YearSelection::All), None);
        let v = YearSliderView::build(&[2018, 2021], None, YearSelection::All).expect("slider");
        assert_eq!((v.min, v.max, v.value, v.all_years), (2018, 2021, 2018, true));
        assert_eq!(v.label, "All Years");
        let v = YearSliderView::build(&[2018, 2021], Some(2020), YearSelection::Exact(2020)).expect("slider");
        assert_eq!(v.label, "2020");
        assert!(!v.all_years);
    }
}
