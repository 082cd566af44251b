use std::collections::BTreeMap;

use formats::Record;

pub const TOP_PARTNERS: usize = 5;

/// One labelled bar of the statistics panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
    /// `count` as a rounded share of all events.
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearBar {
    pub year: i32,
    pub count: usize,
    /// Bar height, clamped to `10..=90`.
    pub height: f64,
}

/// Aggregates shown in the statistics panel.
///
/// Computed over every loaded record, independent of the active filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventStatistics {
    pub total_events: usize,
    pub partner_count: usize,
    pub category_count: usize,
    /// In label order.
    pub by_category: Vec<LabelCount>,
    /// Highest count first; ties in label order.
    pub top_partners: Vec<LabelCount>,
    /// Ascending by year.
    pub timeline: Vec<YearBar>,
}

impl EventStatistics {
    pub fn compute(records: &[Record]) -> Self {
        let total = records.len();
        let mut categories: BTreeMap<&str, usize> = BTreeMap::new();
        let mut partners: BTreeMap<&str, usize> = BTreeMap::new();
        let mut years: BTreeMap<i32, usize> = BTreeMap::new();

        for r in records {
            for c in dedup(r.categories()) {
                *categories.entry(c).or_default() += 1;
            }
            for p in dedup(r.delivering_countries()) {
                *partners.entry(p).or_default() += 1;
            }
            if let Some(y) = r.year_value() {
                *years.entry(y).or_default() += 1;
            }
        }

        let share = |count: usize| -> u32 {
            if total == 0 {
                0
            } else {
                (count as f64 / total as f64 * 100.0).round() as u32
            }
        };
        let bar = |(label, count): (&str, usize)| LabelCount {
            label: label.to_string(),
            count,
            percent: share(count),
        };

        let by_category: Vec<LabelCount> = categories.iter().map(|(k, v)| bar((*k, *v))).collect();

        let mut top_partners: Vec<LabelCount> = partners.iter().map(|(k, v)| bar((*k, *v))).collect();
        top_partners.sort_by(|a, b| b.count.cmp(&a.count));
        top_partners.truncate(TOP_PARTNERS);

        let max = years.values().copied().max().unwrap_or(1).max(1);
        let timeline = years
            .into_iter()
            .map(|(year, count)| YearBar {
                year,
                count,
                height: (count as f64 / max as f64 * 100.0).clamp(10.0, 90.0),
            })
            .collect();

        Self {
            total_events: total,
            partner_count: partners.len(),
            category_count: categories.len(),
            by_category,
            top_partners,
            timeline,
        }
    }
}

// A record counts once per label even if the label repeats in its list.
fn dedup(mut items: Vec<&str>) -> Vec<&str> {
    let mut seen = Vec::with_capacity(items.len());
    items.retain(|i| {
        if seen.contains(i) {
            false
        } else {
            seen.push(*i);
            true
        }
    });
    items
}

#[cfg(test)]
mod tests {
    use super::EventStatistics;
    use formats::{Attributes, Record};
    use foundation::{LonLat, RecordId};
    use pretty_assertions::assert_eq;

    fn rec(i: u32, cat: &str, country: &str, year: Option<&str>) -> Record {
        Record::new(
            RecordId(i),
            LonLat::new(0.0, 0.0),
            Attributes {
                category: Some(cat.to_string()),
                delivering_country: Some(country.to_string()),
                year: year.map(str::to_string),
                ..Default::default()
            },
        )
    }

    #[test]
    fn counts_percentages_and_partners() {
        let records = vec![
            rec(0, "Training; Arms control", "Australia", Some("2019")),
            rec(1, "Training", "Japan; Australia", Some("2019")),
            rec(2, "Maritime Security", "France", Some("2021")),
        ];
        let s = EventStatistics::compute(&records);
        assert_eq!(s.total_events, 3);
        assert_eq!(s.partner_count, 3);
        assert_eq!(s.category_count, 3);

        let training = s
            .by_category
            .iter()
            .find(|c| c.label == "Training")
            .expect("training");
        assert_eq!((training.count, training.percent), (2, 67));

        let partners: Vec<(&str, usize)> = s
            .top_partners
            .iter()
            .map(|p| (p.label.as_str(), p.count))
            .collect();
        assert_eq!(partners, vec![("Australia", 2), ("France", 1), ("Japan", 1)]);
    }

    #[test]
    fn timeline_heights_are_clamped() {
        let mut records: Vec<_> = (0..20)
            .map(|i| rec(i, "Training", "Australia", Some("2020")))
            .collect();
        records.push(rec(20, "Training", "Australia", Some("2018")));
        records.push(rec(21, "Training", "Australia", None));
        let s = EventStatistics::compute(&records);
        let bars: Vec<(i32, usize, f64)> = s.timeline.iter().map(|b| (b.year, b.count, b.height)).collect();
        assert_eq!(bars, vec![(2018, 1, 10.0), (2020, 20, 90.0)]);
    }

    #[test]
    fn empty_input() {
        let s = EventStatistics::compute(&[]);
        assert_eq!(s, EventStatistics::default());
    }
}
