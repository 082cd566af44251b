//! Scripted replays and text reports for the `ddmap` tool.

use compute::EventStatistics;
use foundation::{ClusterId, LonLat, RecordId};
use layers::popup::{compact_line, heading};
use scene::{ClusterClick, FilterState, LeafQueryError, RecordStore, YearSelection};
use serde::Deserialize;
use tracing::warn;
use viewer::{Command, Message, Session};

/// One scripted interaction.
///
/// `cluster_leaves` and `cluster_leaves_failed` answer whatever leaf request
/// the session is waiting on at that point of the script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    ClusterClick {
        cluster: u64,
        point_count: u32,
        center: [f64; 2],
        zoom: f64,
    },
    ClusterLeaves {
        records: Vec<u32>,
    },
    ClusterLeavesFailed {
        message: String,
    },
    PointHover {
        record: u32,
    },
    PointLeave,
    PointClick {
        record: u32,
    },
    MapClick,
    ZoomStart,
    DragStart,
    Wheel,
    Escape,
    Collapse,
    PinHover {
        record: u32,
    },
    PinLeave {
        record: u32,
    },
    PinClick {
        record: u32,
    },
    FlagFailed {
        record: u32,
        country: String,
    },
    ToggleCategory {
        label: String,
        included: bool,
    },
    ToggleCountry {
        label: String,
        included: bool,
    },
    AllCategories {
        included: bool,
    },
    AllCountries {
        included: bool,
    },
    Search {
        query: String,
    },
    Reset,
    Year {
        year: i32,
    },
    AllYears {
        enabled: bool,
    },
    ListClick {
        record: u32,
    },
    ToggleSidebar,
    ToggleFilters,
    ToggleStats,
}

pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>, serde_json::Error> {
    serde_json::from_str(text)
}

impl ScriptStep {
    /// The message this step stands for, or `None` for a leaf answer with no
    /// outstanding request.
    pub fn to_message(&self, session: &Session) -> Option<Message> {
        let msg = match self {
            ScriptStep::ClusterClick {
                cluster,
                point_count,
                center,
                zoom,
            } => Message::ClusterClicked(ClusterClick {
                cluster: ClusterId(*cluster),
                point_count: *point_count,
                center: LonLat::new(center[0], center[1]),
                zoom: *zoom,
            }),
            ScriptStep::ClusterLeaves { records } => Message::ClusterLeaves {
                request: session.pending_leaf_request()?,
                result: Ok(records.iter().copied().map(RecordId).collect()),
            },
            ScriptStep::ClusterLeavesFailed { message } => Message::ClusterLeaves {
                request: session.pending_leaf_request()?,
                result: Err(LeafQueryError::new(message.clone())),
            },
            ScriptStep::PointHover { record } => Message::PointHoverEnter(RecordId(*record)),
            ScriptStep::PointLeave => Message::PointHoverLeave,
            ScriptStep::PointClick { record } => Message::PointClicked(RecordId(*record)),
            ScriptStep::MapClick => Message::MapClicked,
            ScriptStep::ZoomStart => Message::ZoomStart,
            ScriptStep::DragStart => Message::DragStart,
            ScriptStep::Wheel => Message::Wheel,
            ScriptStep::Escape => Message::Escape,
            ScriptStep::Collapse => Message::CollapseRequested,
            ScriptStep::PinHover { record } => Message::PinHoverEnter(RecordId(*record)),
            ScriptStep::PinLeave { record } => Message::PinHoverLeave(RecordId(*record)),
            ScriptStep::PinClick { record } => Message::PinClicked(RecordId(*record)),
            ScriptStep::FlagFailed { record, country } => Message::FlagLoadFailed {
                record: RecordId(*record),
                country: country.clone(),
            },
            ScriptStep::ToggleCategory { label, included } => Message::ToggleCategory {
                label: label.clone(),
                included: *included,
            },
            ScriptStep::ToggleCountry { label, included } => Message::ToggleCountry {
                label: label.clone(),
                included: *included,
            },
            ScriptStep::AllCategories { included } => Message::SelectAllCategories(*included),
            ScriptStep::AllCountries { included } => Message::SelectAllCountries(*included),
            ScriptStep::Search { query } => Message::SetSearch(query.clone()),
            ScriptStep::Reset => Message::ResetFilters,
            ScriptStep::Year { year } => Message::YearSliderMoved(*year),
            ScriptStep::AllYears { enabled } => Message::SetAllYears(*enabled),
            ScriptStep::ListClick { record } => Message::ListItemClicked(RecordId(*record)),
            ScriptStep::ToggleSidebar => Message::ToggleSidebar,
            ScriptStep::ToggleFilters => Message::ToggleFilterPanel,
            ScriptStep::ToggleStats => Message::ToggleStatsPanel,
        };
        Some(msg)
    }
}

/// Feeds `steps` to `session`, returning one summary block per step.
pub fn replay(session: &mut Session, steps: &[ScriptStep]) -> Vec<(String, Vec<String>)> {
    let mut out = Vec::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        let Some(message) = step.to_message(session) else {
            warn!(index, "no pending leaf request; step skipped");
            out.push((format!("#{index} skipped"), Vec::new()));
            continue;
        };
        let name = format!("#{index} {}", message.name());
        let commands = session.handle(message);
        out.push((name, commands.iter().map(Command::summary).collect()));
    }
    out
}

/// Filter assembled from command-line options.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub exclude_categories: Vec<String>,
    pub exclude_countries: Vec<String>,
    pub search: Option<String>,
    pub year: Option<i32>,
}

impl ListFilter {
    pub fn apply(&self, store: &mut RecordStore) -> FilterState {
        let mut filter = store.default_filter();
        for c in &self.exclude_categories {
            filter.set_category(c, false);
        }
        for c in &self.exclude_countries {
            filter.set_country(c, false);
        }
        if let Some(q) = &self.search {
            filter.set_search(q);
        }
        if let Some(y) = self.year {
            filter.set_year(YearSelection::Exact(y));
        }
        store.apply_filter(&filter);
        filter
    }
}

pub fn list_lines(store: &RecordStore) -> Vec<String> {
    store
        .filtered()
        .map(|r| format!("{:>4}  {}  |  {}", r.id.0, heading(r), compact_line(r)))
        .collect()
}

pub fn stats_lines(stats: &EventStatistics) -> Vec<String> {
    let mut lines = vec![
        format!("events      {}", stats.total_events),
        format!("partners    {}", stats.partner_count),
        format!("categories  {}", stats.category_count),
        String::new(),
        "by category".to_string(),
    ];
    lines.extend(
        stats
            .by_category
            .iter()
            .map(|c| format!("  {:<40} {:>5} {:>3}%", c.label, c.count, c.percent)),
    );
    lines.push("top partners".to_string());
    lines.extend(
        stats
            .top_partners
            .iter()
            .map(|c| format!("  {:<40} {:>5}", c.label, c.count)),
    );
    lines.push("timeline".to_string());
    lines.extend(
        stats
            .timeline
            .iter()
            .map(|y| format!("  {}  {:>5}  {:>3.0}%", y.year, y.count, y.height)),
    );
    lines
}
