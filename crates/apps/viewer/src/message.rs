use formats::Dataset;
use foundation::{LonLat, RecordId};
use layers::LoadedImage;
use scene::{ClusterClick, LeafQueryError, LeafRequest};

/// Everything that can happen to a session: user input, map events and
/// completions of async work.
#[derive(Debug)]
pub enum Message {
    DataLoaded(Dataset),
    DataFailed(String),
    IconsReady(Vec<LoadedImage>),

    ClusterClicked(ClusterClick),
    ClusterLeaves {
        request: LeafRequest,
        result: Result<Vec<RecordId>, LeafQueryError>,
    },
    PointHoverEnter(RecordId),
    PointHoverLeave,
    PointClicked(RecordId),
    /// Click that hit no feature.
    MapClicked,
    ZoomStart,
    DragStart,
    Wheel,
    Moved {
        center: LonLat,
        zoom: f64,
    },
    Escape,
    CollapseRequested,

    PinHoverEnter(RecordId),
    PinHoverLeave(RecordId),
    PinClicked(RecordId),
    FlagLoadFailed {
        record: RecordId,
        country: String,
    },
    PopupClosed,

    ToggleCategory {
        label: String,
        included: bool,
    },
    ToggleCountry {
        label: String,
        included: bool,
    },
    SelectAllCategories(bool),
    SelectAllCountries(bool),
    SetSearch(String),
    ResetFilters,
    YearSliderMoved(i32),
    SetAllYears(bool),

    ListItemClicked(RecordId),
    ToggleSidebar,
    ToggleFilterPanel,
    ToggleStatsPanel,
}

impl Message {
    pub fn name(&self) -> &'static str {
        match self {
            Message::DataLoaded(_) => "data_loaded",
            Message::DataFailed(_) => "data_failed",
            Message::IconsReady(_) => "icons_ready",
            Message::ClusterClicked(_) => "cluster_clicked",
            Message::ClusterLeaves { .. } => "cluster_leaves",
            Message::PointHoverEnter(_) => "point_hover_enter",
            Message::PointHoverLeave => "point_hover_leave",
            Message::PointClicked(_) => "point_clicked",
            Message::MapClicked => "map_clicked",
            Message::ZoomStart => "zoom_start",
            Message::DragStart => "drag_start",
            Message::Wheel => "wheel",
            Message::Moved { .. } => "moved",
            Message::Escape => "escape",
            Message::CollapseRequested => "collapse_requested",
            Message::PinHoverEnter(_) => "pin_hover_enter",
            Message::PinHoverLeave(_) => "pin_hover_leave",
            Message::PinClicked(_) => "pin_clicked",
            Message::FlagLoadFailed { .. } => "flag_load_failed",
            Message::PopupClosed => "popup_closed",
            Message::ToggleCategory { .. } => "toggle_category",
            Message::ToggleCountry { .. } => "toggle_country",
            Message::SelectAllCategories(_) => "select_all_categories",
            Message::SelectAllCountries(_) => "select_all_countries",
            Message::SetSearch(_) => "set_search",
            Message::ResetFilters => "reset_filters",
            Message::YearSliderMoved(_) => "year_slider_moved",
            Message::SetAllYears(_) => "set_all_years",
            Message::ListItemClicked(_) => "list_item_clicked",
            Message::ToggleSidebar => "toggle_sidebar",
            Message::ToggleFilterPanel => "toggle_filter_panel",
            Message::ToggleStatsPanel => "toggle_stats_panel",
        }
    }
}
