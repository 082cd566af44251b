use std::collections::BTreeSet;

use formats::Record;

/// Slider range used when no record has a parseable year.
pub const EMPTY_YEAR_RANGE: (i32, i32) = (0, 3000);

/// Distinct parsed years, ascending.
pub fn available_years(records: &[Record]) -> Vec<i32> {
    records
        .iter()
        .filter_map(Record::year_value)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Inclusive `(min, max)` of `years`, which must be sorted.
pub fn year_range(years: &[i32]) -> (i32, i32) {
    match (years.first(), years.last()) {
        (Some(lo), Some(hi)) => (*lo, *hi),
        _ => EMPTY_YEAR_RANGE,
    }
}

#[cfg(test)]
mod tests {
    use super::{EMPTY_YEAR_RANGE, available_years, year_range};
    use formats::{Attributes, Record};
    use foundation::{LonLat, RecordId};

    #[test]
    fn years_are_sorted_unique_and_skip_unparseable() {
        let records: Vec<Record> = ["2021", "2019 ", "n/a", "2021"]
            .iter()
            .enumerate()
            .map(|(i, y)| {
                Record::new(
                    RecordId(i as u32),
                    LonLat::new(0.0, 0.0),
                    Attributes {
                        year: Some(y.to_string()),
                        ..Default::default()
                    },
                )
            })
            .collect();
        let years = available_years(&records);
        assert_eq!(years, vec![2019, 2021]);
        assert_eq!(year_range(&years), (2019, 2021));
        assert_eq!(year_range(&[]), EMPTY_YEAR_RANGE);
    }
}
