use std::cmp::Ordering;

use foundation::{ClusterId, LonLat, RecordId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::layout::{LeafLayout, LegPlacement};
use crate::store::RecordStore;

/// Zoom thresholds driving cluster clicks.
///
/// Expected ordering: `intermediate_zoom < spiderify_zoom <= max_zoom`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomPolicy {
    pub intermediate_zoom: f64,
    pub spiderify_zoom: f64,
    pub max_zoom: f64,
    pub max_spiderify_points: u32,
    pub zoom_step: f64,
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self {
            intermediate_zoom: 4.5,
            spiderify_zoom: 7.5,
            max_zoom: 15.0,
            max_spiderify_points: 45,
            zoom_step: 1.5,
        }
    }
}

impl ZoomPolicy {
    pub fn is_ordered(&self) -> bool {
        self.intermediate_zoom < self.spiderify_zoom && self.spiderify_zoom <= self.max_zoom
    }
}

/// A click on a cluster symbol, as reported by the map surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClusterClick {
    pub cluster: ClusterId,
    pub point_count: u32,
    pub center: LonLat,
    pub zoom: f64,
}

/// Outstanding leaf query. Only the most recent one is honored.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LeafRequest {
    pub cluster: ClusterId,
    pub center: LonLat,
    pub limit: u32,
    pub generation: u64,
}

impl LeafRequest {
    /// Same query, compared by identity only.
    pub fn is_same(&self, other: &LeafRequest) -> bool {
        self.generation == other.generation && self.cluster == other.cluster
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafQueryError {
    pub message: String,
}

impl LeafQueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LeafQueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cluster leaf query failed: {}", self.message)
    }
}

impl std::error::Error for LeafQueryError {}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Leaf {
    pub record: RecordId,
    pub placement: LegPlacement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    pub cluster: ClusterId,
    pub center: LonLat,
    /// Sorted by category label, then year, then record id.
    pub leaves: Vec<Leaf>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ExpansionState {
    #[default]
    Idle,
    Expanded(Expansion),
}

/// What the caller should do in response to a cluster click.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterAction {
    /// Zoom toward the cluster. Any open expansion has been closed.
    EaseTo {
        center: LonLat,
        zoom: f64,
        collapsed: Option<Expansion>,
    },
    /// The clicked cluster was the expanded one and has been closed.
    Collapsed(Expansion),
    FetchLeaves(LeafRequest),
}

/// Result of feeding a leaf response into the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum LeavesOutcome {
    /// Entered `Expanded`. Carries the expansion that was torn down, if any.
    Expanded { replaced: Option<Expansion> },
    /// Response to a superseded or cancelled request.
    Stale,
    Failed,
}

/// Why an expansion is being closed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CollapseReason {
    FilterChanged,
    ZoomStart,
    DragStart,
    Wheel,
    EmptyClick,
    Explicit,
    Escape,
}

/// Cluster click handling with at most one spiderified cluster.
#[derive(Debug, Clone, Default)]
pub struct ClusterMachine {
    policy: ZoomPolicy,
    state: ExpansionState,
    pending: Option<LeafRequest>,
    generation: u64,
}

impl ClusterMachine {
    pub fn new(policy: ZoomPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn policy(&self) -> &ZoomPolicy {
        &self.policy
    }

    pub fn state(&self) -> &ExpansionState {
        &self.state
    }

    pub fn expansion(&self) -> Option<&Expansion> {
        match &self.state {
            ExpansionState::Expanded(e) => Some(e),
            ExpansionState::Idle => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, ExpansionState::Idle)
    }

    pub fn pending(&self) -> Option<&LeafRequest> {
        self.pending.as_ref()
    }

    pub fn on_cluster_click(&mut self, click: ClusterClick) -> ClusterAction {
        let p = self.policy;
        let target = if click.zoom < p.intermediate_zoom {
            Some(p.intermediate_zoom)
        } else if click.zoom < p.spiderify_zoom {
            Some(p.spiderify_zoom)
        } else if click.point_count > p.max_spiderify_points {
            Some((click.zoom + p.zoom_step).min(p.max_zoom))
        } else {
            None
        };
        if let Some(zoom) = target {
            return ClusterAction::EaseTo {
                center: click.center,
                zoom,
                collapsed: self.collapse(CollapseReason::ZoomStart),
            };
        }

        if self.expansion().is_some_and(|e| e.cluster == click.cluster) {
            if let Some(e) = self.collapse(CollapseReason::Explicit) {
                return ClusterAction::Collapsed(e);
            }
        }

        self.generation += 1;
        let request = LeafRequest {
            cluster: click.cluster,
            center: click.center,
            limit: click.point_count,
            generation: self.generation,
        };
        self.pending = Some(request);
        debug!(cluster = click.cluster.0, count = click.point_count, "requesting cluster leaves");
        ClusterAction::FetchLeaves(request)
    }

    /// Feeds the answer to a [`LeafRequest`].
    ///
    /// Leaves that are no longer in the store are dropped. On failure the
    /// current state is kept as is.
    pub fn on_leaves(
        &mut self,
        request: LeafRequest,
        result: Result<Vec<RecordId>, LeafQueryError>,
        store: &RecordStore,
        layout: &dyn LeafLayout,
    ) -> LeavesOutcome {
        let Some(request) = self.pending.filter(|p| p.is_same(&request)) else {
            debug!(cluster = request.cluster.0, "dropping stale leaf response");
            return LeavesOutcome::Stale;
        };
        self.pending = None;

        let ids = match result {
            Ok(ids) => ids,
            Err(e) => {
                warn!(cluster = request.cluster.0, error = %e, "cluster expansion abandoned");
                return LeavesOutcome::Failed;
            }
        };

        let mut ids: Vec<RecordId> = ids.into_iter().filter(|id| store.get(*id).is_some()).collect();
        ids.sort_by(|a, b| compare_leaves(store, *a, *b));
        ids.dedup();

        let placements = layout.layout(ids.len());
        let leaves = ids
            .into_iter()
            .zip(placements)
            .map(|(record, placement)| Leaf { record, placement })
            .collect::<Vec<_>>();

        info!(cluster = request.cluster.0, leaves = leaves.len(), "cluster expanded");
        let replaced = std::mem::replace(
            &mut self.state,
            ExpansionState::Expanded(Expansion {
                cluster: request.cluster,
                center: request.center,
                leaves,
            }),
        );
        LeavesOutcome::Expanded {
            replaced: match replaced {
                ExpansionState::Expanded(e) => Some(e),
                ExpansionState::Idle => None,
            },
        }
    }

    /// Returns to `Idle` and cancels any outstanding leaf request.
    ///
    /// Idempotent; returns the expansion that was closed.
    pub fn collapse(&mut self, reason: CollapseReason) -> Option<Expansion> {
        if self.pending.take().is_some() {
            debug!(?reason, "leaf request cancelled");
        }
        match std::mem::take(&mut self.state) {
            ExpansionState::Expanded(e) => {
                info!(cluster = e.cluster.0, ?reason, "cluster collapsed");
                Some(e)
            }
            ExpansionState::Idle => None,
        }
    }
}

fn compare_leaves(store: &RecordStore, a: RecordId, b: RecordId) -> Ordering {
    let key = |id: RecordId| {
        let r = store.get(id);
        (
            r.and_then(|r| r.category_label()).unwrap_or_default(),
            r.and_then(|r| r.year_value()).unwrap_or(0),
        )
    };
    key(a).cmp(&key(b)).then(a.cmp(&b))
}
