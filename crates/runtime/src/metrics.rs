use std::collections::BTreeMap;

/// Session counters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Counter {
    MessagesHandled,
    CommandsIssued,
    FiltersApplied,
    ClustersExpanded,
    ClustersCollapsed,
    LeafQueriesFailed,
    StaleLeafResponses,
    IconFallbacks,
    FlagFallbacks,
    DataLoadFailures,
}

impl Counter {
    pub fn name(self) -> &'static str {
        match self {
            Counter::MessagesHandled => "messages_handled",
            Counter::CommandsIssued => "commands_issued",
            Counter::FiltersApplied => "filters_applied",
            Counter::ClustersExpanded => "clusters_expanded",
            Counter::ClustersCollapsed => "clusters_collapsed",
            Counter::LeafQueriesFailed => "leaf_queries_failed",
            Counter::StaleLeafResponses => "stale_leaf_responses",
            Counter::IconFallbacks => "icon_fallbacks",
            Counter::FlagFallbacks => "flag_fallbacks",
            Counter::DataLoadFailures => "data_load_failures",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Gauge {
    RecordsLoaded,
    RecordsAdmitted,
    ActiveFilters,
}

impl Gauge {
    pub fn name(self) -> &'static str {
        match self {
            Gauge::RecordsLoaded => "records_loaded",
            Gauge::RecordsAdmitted => "records_admitted",
            Gauge::ActiveFilters => "active_filters",
        }
    }
}

/// Deterministic metrics aggregation.
///
/// Metrics must not depend on wall-clock time or unordered iteration.
/// Sorted maps keep snapshots in a stable order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metrics {
    counters: BTreeMap<Counter, u64>,
    gauges: BTreeMap<Gauge, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub counters: Vec<(&'static str, u64)>,
    pub gauges: Vec<(&'static str, i64)>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, c: Counter) -> u64 {
        self.counters.get(&c).copied().unwrap_or(0)
    }

    pub fn inc(&mut self, c: Counter) {
        self.add(c, 1);
    }

    pub fn add(&mut self, c: Counter, by: u64) {
        *self.counters.entry(c).or_insert(0) += by;
    }

    pub fn gauge(&self, g: Gauge) -> Option<i64> {
        self.gauges.get(&g).copied()
    }

    pub fn set_gauge(&mut self, g: Gauge, value: i64) {
        self.gauges.insert(g, value);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self.counters.iter().map(|(k, v)| (k.name(), *v)).collect(),
            gauges: self.gauges.iter().map(|(k, v)| (k.name(), *v)).collect(),
        }
    }
}
