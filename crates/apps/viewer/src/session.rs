//! The view orchestrator.
//!
//! A [`Session`] owns the record store, the filter state and the cluster
//! machine. Every input arrives as a [`Message`]; every effect leaves as a
//! [`Command`]. Nothing else mutates the filtered set or the expansion.

use std::collections::BTreeSet;

use compute::{EventStatistics, available_years};
use formats::Dataset;
use foundation::{LonLat, RecordId};
use layers::{
    Classifier, FallbackGlyph, HOVER_SOURCE, LoadedImage, MARKERS_SOURCE, PinStyle, PopupContent,
    SourceSpec, load_images, marker_features, marker_layers, spider_pins,
};
use runtime::{Counter, EventQueue, Gauge, Metrics};
use scene::{
    ClusterAction, ClusterClick, ClusterMachine, CollapseReason, Expansion, FilterState, LeafQueryError,
    LeafRequest, LeavesOutcome, RecordStore, YearSelection,
};
use tracing::{debug, error, info};

use crate::assets::loader_for;
use crate::config::ViewerConfig;
use crate::message::Message;
use crate::sidebar::{FilterPanelView, PanelState, SidebarView, YearSliderView};
use crate::source::{DataSource, load_dataset, source_for};
use crate::surface::{Command, Cursor, MapSurface, PopupId};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loaded,
}

pub struct Session {
    config: ViewerConfig,
    classifier: Classifier,
    store: RecordStore,
    filter: FilterState,
    machine: ClusterMachine,
    load_state: LoadState,
    icons_ready: bool,
    years: Vec<i32>,
    slider_value: Option<i32>,
    hover_popup: Option<RecordId>,
    pinned_popup: Option<RecordId>,
    leaf_popups: BTreeSet<PopupId>,
    panels: PanelState,
    view: (LonLat, f64),
    queue: EventQueue<Message>,
    metrics: Metrics,
}

impl Session {
    pub fn new(config: ViewerConfig) -> Self {
        let [lon, lat] = config.map.center;
        Self {
            classifier: Classifier::new(config.classifier.clone()),
            machine: ClusterMachine::new(config.map.zoom),
            view: (LonLat::new(lon, lat), config.map.initial_zoom),
            config,
            store: RecordStore::new(),
            filter: FilterState::default(),
            load_state: LoadState::NotLoaded,
            icons_ready: false,
            years: Vec::new(),
            slider_value: None,
            hover_popup: None,
            pinned_popup: None,
            leaf_popups: BTreeSet::new(),
            panels: PanelState::default(),
            queue: EventQueue::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn machine(&self) -> &ClusterMachine {
        &self.machine
    }

    pub fn expansion(&self) -> Option<&Expansion> {
        self.machine.expansion()
    }

    /// The leaf request the session is waiting on, if any.
    pub fn pending_leaf_request(&self) -> Option<LeafRequest> {
        self.machine.pending().copied()
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn panels(&self) -> PanelState {
        self.panels
    }

    pub fn pinned_popup(&self) -> Option<RecordId> {
        self.pinned_popup
    }

    /// Last reported viewport center and zoom.
    pub fn view(&self) -> (LonLat, f64) {
        self.view
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Queues a message for [`Session::run_pending`].
    pub fn enqueue(&mut self, message: Message) -> u64 {
        self.queue.push(message)
    }

    /// Handles queued messages in arrival order, forwarding every command to
    /// `surface`. Returns the number of messages handled.
    pub fn run_pending(&mut self, surface: &mut dyn MapSurface) -> usize {
        let mut handled = 0;
        while let Some(envelope) = self.queue.pop() {
            debug!(seq = envelope.seq, "dispatching queued message");
            for command in self.handle(envelope.item) {
                surface.apply(command);
            }
            handled += 1;
        }
        handled
    }

    pub fn handle(&mut self, message: Message) -> Vec<Command> {
        debug!(message = message.name(), "handling message");
        self.metrics.inc(Counter::MessagesHandled);
        let mut out = Vec::new();

        match message {
            Message::DataLoaded(dataset) => self.on_data_loaded(dataset, &mut out),
            Message::DataFailed(reason) => {
                error!(%reason, "event data could not be loaded");
                self.metrics.inc(Counter::DataLoadFailures);
            }
            Message::IconsReady(images) => self.on_icons_ready(images, &mut out),
            Message::Moved { center, zoom } => self.view = (center, zoom),
            Message::ToggleSidebar => {
                self.panels.sidebar_collapsed = !self.panels.sidebar_collapsed;
                out.push(Command::SetPanels(self.panels));
            }
            Message::ToggleFilterPanel => {
                self.panels.filter_open = !self.panels.filter_open;
                out.push(Command::SetPanels(self.panels));
            }
            Message::ToggleStatsPanel => {
                self.panels.stats_open = !self.panels.stats_open;
                out.push(Command::SetPanels(self.panels));
            }
            other if self.load_state == LoadState::NotLoaded => {
                debug!(message = other.name(), "ignored before data load");
            }
            other => self.on_interaction(other, &mut out),
        }

        self.metrics.add(Counter::CommandsIssued, out.len() as u64);
        out
    }

    fn on_interaction(&mut self, message: Message, out: &mut Vec<Command>) {
        match message {
            Message::ClusterClicked(click) => self.on_cluster_click(click, out),
            Message::ClusterLeaves { request, result } => self.on_leaves(request, result, out),

            Message::PointHoverEnter(id) => self.on_point_hover(id, out),
            Message::PointHoverLeave => {
                out.push(Command::SetCursor(Cursor::Default));
                out.push(Command::SetSourceData {
                    source: HOVER_SOURCE.to_string(),
                    data: marker_features(std::iter::empty(), &self.classifier),
                });
                if self.hover_popup.take().is_some() {
                    out.push(Command::RemovePopup(PopupId::Hover));
                }
            }
            Message::PointClicked(id) => self.pin_popup(id, out),
            Message::PopupClosed => self.pinned_popup = None,
            Message::MapClicked => {
                self.collapse(CollapseReason::EmptyClick, out);
                if self.pinned_popup.take().is_some() {
                    out.push(Command::RemovePopup(PopupId::Pinned));
                }
            }

            Message::ZoomStart => self.collapse(CollapseReason::ZoomStart, out),
            Message::DragStart => self.collapse(CollapseReason::DragStart, out),
            Message::Wheel => self.collapse(CollapseReason::Wheel, out),
            Message::Escape => self.collapse(CollapseReason::Escape, out),
            Message::CollapseRequested => self.collapse(CollapseReason::Explicit, out),

            Message::PinHoverEnter(id) => {
                if let Some(anchor) = self.leaf_anchor(id) {
                    self.show_leaf_popup(PopupId::LeafHover(id), anchor, id, out);
                }
            }
            Message::PinHoverLeave(id) => {
                if self.leaf_popups.remove(&PopupId::LeafHover(id)) {
                    out.push(Command::RemovePopup(PopupId::LeafHover(id)));
                }
            }
            Message::PinClicked(id) => {
                if let Some(anchor) = self.leaf_anchor(id) {
                    if self.leaf_popups.remove(&PopupId::LeafHover(id)) {
                        out.push(Command::RemovePopup(PopupId::LeafHover(id)));
                    }
                    self.show_leaf_popup(PopupId::LeafPinned(id), anchor, id, out);
                }
            }
            Message::FlagLoadFailed { record, country } => {
                if self.leaf_anchor(record).is_some() {
                    self.metrics.inc(Counter::FlagFallbacks);
                    out.push(Command::ShowFallbackFlag {
                        record,
                        glyph: FallbackGlyph::for_country(&country),
                        country,
                    });
                }
            }

            Message::ToggleCategory { label, included } => {
                let changed = self.filter.set_category(&label, included);
                self.after_filter_edit(changed, out);
            }
            Message::ToggleCountry { label, included } => {
                let changed = self.filter.set_country(&label, included);
                self.after_filter_edit(changed, out);
            }
            Message::SelectAllCategories(included) => {
                let changed = self.filter.set_all_categories(included);
                self.after_filter_edit(changed, out);
            }
            Message::SelectAllCountries(included) => {
                let changed = self.filter.set_all_countries(included);
                self.after_filter_edit(changed, out);
            }
            Message::SetSearch(query) => {
                let changed = self.filter.set_search(&query);
                self.after_filter_edit(changed, out);
            }
            Message::ResetFilters => {
                let changed = self.filter.reset();
                self.after_filter_edit(changed, out);
            }
            Message::YearSliderMoved(year) => {
                self.slider_value = Some(year);
                let changed = self.filter.set_year(YearSelection::Exact(year));
                self.after_filter_edit(changed, out);
                out.push(self.year_slider());
            }
            Message::SetAllYears(all) => {
                let selection = if all {
                    YearSelection::All
                } else {
                    match self.slider_value.or_else(|| self.years.first().copied()) {
                        Some(year) => {
                            self.slider_value = Some(year);
                            YearSelection::Exact(year)
                        }
                        None => return,
                    }
                };
                let changed = self.filter.set_year(selection);
                self.after_filter_edit(changed, out);
                out.push(self.year_slider());
            }

            Message::ListItemClicked(id) => {
                let Some(position) = self.store.get(id).map(|r| r.position) else {
                    return;
                };
                self.collapse(CollapseReason::Explicit, out);
                out.push(Command::FlyTo {
                    center: position,
                    zoom: self.config.map.fly_to_zoom,
                    speed: self.config.map.fly_to_speed,
                });
                self.pin_popup(id, out);
            }

            Message::DataLoaded(_)
            | Message::DataFailed(_)
            | Message::IconsReady(_)
            | Message::Moved { .. }
            | Message::ToggleSidebar
            | Message::ToggleFilterPanel
            | Message::ToggleStatsPanel => {}
        }
    }

    fn on_data_loaded(&mut self, dataset: Dataset, out: &mut Vec<Command>) {
        self.collapse(CollapseReason::Explicit, out);
        self.store = RecordStore::from_dataset(dataset);
        self.filter = self.store.default_filter();
        self.years = available_years(self.store.records());
        self.slider_value = None;
        self.hover_popup = None;
        self.pinned_popup = None;
        self.load_state = LoadState::Loaded;
        self.metrics.set_gauge(Gauge::RecordsLoaded, self.store.len() as i64);
        info!(
            records = self.store.len(),
            categories = self.store.category_labels().len(),
            countries = self.store.country_labels().len(),
            "session loaded"
        );

        self.push_markers(out);
        self.render_lists(out);
        out.push(self.year_slider());
        out.push(Command::RenderStatistics(EventStatistics::compute(
            self.store.records(),
        )));
    }

    fn on_icons_ready(&mut self, images: Vec<LoadedImage>, out: &mut Vec<Command>) {
        if self.icons_ready {
            debug!("icons already registered");
            return;
        }
        let fallbacks = images.iter().filter(|i| i.bitmap.is_fallback()).count();
        self.metrics.add(Counter::IconFallbacks, fallbacks as u64);
        out.extend(images.into_iter().map(Command::RegisterImage));
        out.push(Command::AddSource(SourceSpec::markers(self.config.map.cluster)));
        out.push(Command::AddSource(SourceSpec::hover()));
        out.extend(
            marker_layers(&self.config.symbols, &self.config.icons.cluster_image_id)
                .into_iter()
                .map(Command::AddLayer),
        );
        self.icons_ready = true;
        self.push_markers(out);
    }

    fn on_cluster_click(&mut self, click: ClusterClick, out: &mut Vec<Command>) {
        match self.machine.on_cluster_click(click) {
            ClusterAction::EaseTo {
                center,
                zoom,
                collapsed,
            } => {
                if let Some(e) = collapsed {
                    self.tear_down(&e, out);
                }
                out.push(Command::EaseTo { center, zoom });
            }
            ClusterAction::Collapsed(e) => self.tear_down(&e, out),
            ClusterAction::FetchLeaves(request) => out.push(Command::QueryClusterLeaves(request)),
        }
    }

    fn on_leaves(
        &mut self,
        request: LeafRequest,
        result: Result<Vec<RecordId>, LeafQueryError>,
        out: &mut Vec<Command>,
    ) {
        match self
            .machine
            .on_leaves(request, result, &self.store, &self.config.layout)
        {
            LeavesOutcome::Expanded { replaced } => {
                if let Some(e) = replaced {
                    self.tear_down(&e, out);
                }
                if let Some(expansion) = self.machine.expansion() {
                    let style = PinStyle {
                        classifier: &self.classifier,
                        catalog: &self.config.icons,
                        flags: &self.config.flags,
                        size_px: self.config.symbols.pin_size_px,
                    };
                    out.push(Command::ShowSpider {
                        center: expansion.center,
                        pins: spider_pins(expansion, &self.store, &style),
                    });
                    self.metrics.inc(Counter::ClustersExpanded);
                }
            }
            LeavesOutcome::Stale => self.metrics.inc(Counter::StaleLeafResponses),
            LeavesOutcome::Failed => self.metrics.inc(Counter::LeafQueriesFailed),
        }
    }

    fn on_point_hover(&mut self, id: RecordId, out: &mut Vec<Command>) {
        let Some(record) = self.store.get(id) else {
            return;
        };
        out.push(Command::SetCursor(Cursor::Pointer));
        out.push(Command::SetSourceData {
            source: HOVER_SOURCE.to_string(),
            data: marker_features(std::iter::once(record), &self.classifier),
        });
        if self.pinned_popup.is_none() {
            out.push(Command::ShowPopup {
                id: PopupId::Hover,
                anchor: record.position,
                content: PopupContent::for_record(record),
            });
            self.hover_popup = Some(id);
        }
    }

    fn pin_popup(&mut self, id: RecordId, out: &mut Vec<Command>) {
        let Some(record) = self.store.get(id) else {
            return;
        };
        if self.hover_popup.take().is_some() {
            out.push(Command::RemovePopup(PopupId::Hover));
        }
        out.push(Command::ShowPopup {
            id: PopupId::Pinned,
            anchor: record.position,
            content: PopupContent::for_record(record),
        });
        self.pinned_popup = Some(id);
    }

    fn leaf_anchor(&self, id: RecordId) -> Option<LonLat> {
        let e = self.machine.expansion()?;
        e.leaves.iter().any(|l| l.record == id).then_some(e.center)
    }

    fn show_leaf_popup(&mut self, popup: PopupId, anchor: LonLat, id: RecordId, out: &mut Vec<Command>) {
        let Some(record) = self.store.get(id) else {
            return;
        };
        out.push(Command::ShowPopup {
            id: popup,
            anchor,
            content: PopupContent::for_record(record),
        });
        self.leaf_popups.insert(popup);
    }

    fn collapse(&mut self, reason: CollapseReason, out: &mut Vec<Command>) {
        if let Some(e) = self.machine.collapse(reason) {
            self.tear_down(&e, out);
        }
    }

    /// Removes the spider overlay and every per-leaf popup.
    fn tear_down(&mut self, expansion: &Expansion, out: &mut Vec<Command>) {
        debug!(cluster = expansion.cluster.0, "removing spider overlay");
        self.metrics.inc(Counter::ClustersCollapsed);
        out.push(Command::ClearSpider);
        out.extend(
            std::mem::take(&mut self.leaf_popups)
                .into_iter()
                .map(Command::RemovePopup),
        );
    }

    fn after_filter_edit(&mut self, changed: bool, out: &mut Vec<Command>) {
        // Edits that leave the filter as it was keep the expansion open.
        if !changed {
            return;
        }
        self.metrics.inc(Counter::FiltersApplied);
        self.collapse(CollapseReason::FilterChanged, out);
        let membership_changed = self.store.apply_filter(&self.filter);
        if membership_changed {
            self.push_markers(out);
        }
        self.render_lists(out);
    }

    fn push_markers(&self, out: &mut Vec<Command>) {
        if !self.icons_ready || self.load_state != LoadState::Loaded {
            return;
        }
        out.push(Command::SetSourceData {
            source: MARKERS_SOURCE.to_string(),
            data: marker_features(self.store.filtered(), &self.classifier),
        });
    }

    fn render_lists(&mut self, out: &mut Vec<Command>) {
        self.metrics
            .set_gauge(Gauge::RecordsAdmitted, self.store.filtered_len() as i64);
        self.metrics
            .set_gauge(Gauge::ActiveFilters, self.filter.active_filter_count() as i64);
        out.push(Command::RenderSidebar(SidebarView::build(&self.store)));
        out.push(Command::RenderFilterPanel(FilterPanelView::build(&self.filter)));
    }

    fn year_slider(&self) -> Command {
        Command::RenderYearSlider(YearSliderView::build(
            &self.years,
            self.slider_value,
            self.filter.year(),
        ))
    }
}

/// Loads the dataset and every icon concurrently and returns the resulting
/// messages, icons first.
pub async fn startup_messages(
    config: &ViewerConfig,
    source: &dyn DataSource,
    assets: &dyn layers::AssetLoader,
) -> Vec<Message> {
    let (images, dataset) = futures_util::future::join(
        load_images(assets, config.icons.image_requests()),
        load_dataset(source),
    )
    .await;
    let data = match dataset {
        Ok(ds) => Message::DataLoaded(ds),
        Err(e) => Message::DataFailed(e.to_string()),
    };
    vec![Message::IconsReady(images), data]
}

/// [`startup_messages`] against the sources named by the config.
pub async fn startup_from_config(config: &ViewerConfig) -> Vec<Message> {
    let source = source_for(&config.data);
    let assets = loader_for(&config.asset_root);
    startup_messages(config, source.as_ref(), assets.as_ref()).await
}
