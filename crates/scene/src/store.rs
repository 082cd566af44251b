use std::collections::BTreeSet;

use formats::{Dataset, Record};
use foundation::RecordId;
use tracing::debug;

use crate::filter::FilterState;
use crate::selection::RecordSet;

/// All loaded records plus the currently admitted subset.
///
/// Records are never mutated after load; filtering only rewrites the
/// admitted set.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    filtered: RecordSet,
    categories: Vec<String>,
    countries: Vec<String>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of the loaded records. Everything starts admitted.
    pub fn from_dataset(dataset: Dataset) -> Self {
        let records = dataset.records;
        let mut categories = BTreeSet::new();
        let mut countries = BTreeSet::new();
        for r in &records {
            categories.extend(r.categories().into_iter().map(str::to_string));
            countries.extend(r.delivering_countries().into_iter().map(str::to_string));
        }
        Self {
            filtered: RecordSet::full(records.len()),
            records,
            categories: categories.into_iter().collect(),
            countries: countries.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.index())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct parsed category tokens, sorted.
    pub fn category_labels(&self) -> &[String] {
        &self.categories
    }

    /// Distinct parsed delivering-country tokens, sorted.
    pub fn country_labels(&self) -> &[String] {
        &self.countries
    }

    /// Fresh filter with every observed label included.
    pub fn default_filter(&self) -> FilterState {
        FilterState::with_labels(self.categories.iter().cloned(), self.countries.iter().cloned())
    }

    pub fn is_admitted(&self, id: RecordId) -> bool {
        self.filtered.contains(id)
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Admitted records in dataset order.
    pub fn filtered(&self) -> impl Iterator<Item = &Record> + '_ {
        self.filtered.iter().filter_map(|id| self.get(id))
    }

    /// Recomputes the admitted set. Returns `true` if membership changed.
    pub fn apply_filter(&mut self, filter: &FilterState) -> bool {
        let next: RecordSet = self
            .records
            .iter()
            .filter(|r| filter.admits(r))
            .map(|r| r.id)
            .collect();
        if next == self.filtered {
            return false;
        }
        debug!(
            admitted = next.len(),
            total = self.records.len(),
            "filter applied"
        );
        self.filtered = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::RecordStore;
    use formats::{Attributes, Dataset, Record};
    use foundation::{LonLat, RecordId};
    use pretty_assertions::assert_eq;

    fn dataset() -> Dataset {
        let mk = |i: u32, cat: &str, country: &str| {
            Record::new(
                RecordId(i),
                LonLat::new(150.0 + i as f64, -10.0),
                Attributes {
                    category: Some(cat.to_string()),
                    delivering_country: Some(country.to_string()),
                    ..Default::default()
                },
            )
        };
        Dataset::from_records(vec![
            mk(0, "Training; Arms control", "Australia"),
            mk(1, "Maritime Security", "Japan; Australia"),
            mk(2, "Training", "France"),
        ])
    }

    #[test]
    fn observed_labels_are_sorted_unique() {
        let store = RecordStore::from_dataset(dataset());
        assert_eq!(
            store.category_labels(),
            &["Arms control", "Maritime Security", "Training"]
        );
        assert_eq!(store.country_labels(), &["Australia", "France", "Japan"]);
        assert_eq!(store.filtered_len(), 3);
    }

    #[test]
    fn apply_filter_is_idempotent_and_keeps_records() {
        let mut store = RecordStore::from_dataset(dataset());
        let mut f = store.default_filter();
        f.set_country("Australia", false);

        assert!(store.apply_filter(&f));
        let ids: Vec<u32> = store.filtered().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![1, 2]);

        assert!(!store.apply_filter(&f));
        assert_eq!(store.len(), 3);
        assert!(!store.is_admitted(RecordId(0)));
    }
}
