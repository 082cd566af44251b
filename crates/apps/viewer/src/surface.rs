//! Commands a session issues to the map and UI surfaces.

use compute::EventStatistics;
use foundation::{LonLat, RecordId};
use layers::{FallbackGlyph, LayerSpec, LoadedImage, PopupContent, SourceSpec, SpiderPin};
use scene::LeafRequest;
use serde_json::Value;

use crate::sidebar::{FilterPanelView, PanelState, SidebarView, YearSliderView};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PopupId {
    /// Transient popup following the pointer over an unclustered point.
    Hover,
    /// Popup opened by a click; has a close button.
    Pinned,
    /// Hover popup over a spider pin.
    LeafHover(RecordId),
    /// Clicked popup on a spider pin.
    LeafPinned(RecordId),
}

impl PopupId {
    pub fn is_leaf(self) -> bool {
        matches!(self, PopupId::LeafHover(_) | PopupId::LeafPinned(_))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Pointer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddSource(SourceSpec),
    AddLayer(LayerSpec),
    RegisterImage(LoadedImage),
    SetSourceData {
        source: String,
        data: Value,
    },
    EaseTo {
        center: LonLat,
        zoom: f64,
    },
    FlyTo {
        center: LonLat,
        zoom: f64,
        speed: f64,
    },
    QueryClusterLeaves(LeafRequest),
    ShowPopup {
        id: PopupId,
        anchor: LonLat,
        content: PopupContent,
    },
    RemovePopup(PopupId),
    ShowSpider {
        center: LonLat,
        pins: Vec<SpiderPin>,
    },
    ClearSpider,
    ShowFallbackFlag {
        record: RecordId,
        country: String,
        glyph: FallbackGlyph,
    },
    SetCursor(Cursor),
    RenderSidebar(SidebarView),
    RenderFilterPanel(FilterPanelView),
    RenderYearSlider(Option<YearSliderView>),
    RenderStatistics(EventStatistics),
    SetPanels(PanelState),
}

impl Command {
    /// One-line description for logs and the replay tool.
    pub fn summary(&self) -> String {
        match self {
            Command::AddSource(s) => format!("add_source {}", s.id),
            Command::AddLayer(l) => format!("add_layer {} <- {}", l.id, l.source),
            Command::RegisterImage(img) => format!(
                "register_image {}{}",
                img.image_id,
                if img.bitmap.is_fallback() { " (fallback)" } else { "" }
            ),
            Command::SetSourceData { source, data } => format!(
                "set_source_data {source} ({} features)",
                data.get("features")
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len)
            ),
            Command::EaseTo { center, zoom } => format!(
                "ease_to [{:.4}, {:.4}] z{zoom}",
                center.lon_deg, center.lat_deg
            ),
            Command::FlyTo {
                center,
                zoom,
                speed,
            } => format!(
                "fly_to [{:.4}, {:.4}] z{zoom} speed {speed}",
                center.lon_deg, center.lat_deg
            ),
            Command::QueryClusterLeaves(r) => format!(
                "query_cluster_leaves cluster {} limit {} gen {}",
                r.cluster.0, r.limit, r.generation
            ),
            Command::ShowPopup { id, content, .. } => format!("show_popup {id:?}: {}", content.heading),
            Command::RemovePopup(id) => format!("remove_popup {id:?}"),
            Command::ShowSpider { pins, .. } => {
                let ids: Vec<String> = pins.iter().map(|p| p.record.0.to_string()).collect();
                format!("show_spider [{}]", ids.join(", "))
            }
            Command::ClearSpider => "clear_spider".to_string(),
            Command::ShowFallbackFlag { record, country, glyph } => format!(
                "fallback_flag record {} {country} {} {}",
                record.0,
                glyph.letter,
                glyph.css_color()
            ),
            Command::SetCursor(c) => format!("set_cursor {c:?}"),
            Command::RenderSidebar(v) => format!("render_sidebar {}", v.heading),
            Command::RenderFilterPanel(v) => {
                format!("render_filter_panel ({} active)", v.active_filters)
            }
            Command::RenderYearSlider(v) => match v {
                Some(v) => format!("render_year_slider {}..{} {}", v.min, v.max, v.label),
                None => "render_year_slider hidden".to_string(),
            },
            Command::RenderStatistics(s) => format!("render_statistics {} events", s.total_events),
            Command::SetPanels(p) => format!(
                "set_panels sidebar_collapsed={} filter={} stats={}",
                p.sidebar_collapsed, p.filter_open, p.stats_open
            ),
        }
    }
}

/// Receiver of session commands.
pub trait MapSurface {
    fn apply(&mut self, command: Command);
}

/// Surface that keeps every command it receives.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<Command>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }
}

impl MapSurface for RecordingSurface {
    fn apply(&mut self, command: Command) {
        self.commands.push(command);
    }
}
