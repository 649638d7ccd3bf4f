use crate::error::DiscoveryError;
use crate::events::{Notice, SessionEvents};
use crate::fetch::{FetchKey, FetchSlot, Refresh, conclude};
use crate::filter::{ItemFilter, admits};
use crate::location::{LocationProvider, Permission};
use eco_catalog::{ItemCatalog, PointDirectory, PointQuery};
use eco_domain::config::MapConfig;
use eco_domain::{Coordinate, ItemCategory, ItemId, Locality, Marker, Point, PointId};
use fxhash::FxHashSet;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Points admitted by `selected` (all of them when it is empty), in payload order.
#[must_use]
pub fn visible_points<'a>(points: &'a [Point], selected: &BTreeSet<ItemId>) -> Vec<&'a Point> {
    points.iter().filter(|point| admits(selected, point)).collect()
}

/// One marker per point id; later duplicates are dropped.
pub fn markers<'a>(points: impl IntoIterator<Item = &'a Point>) -> Vec<Marker> {
    let mut seen = FxHashSet::default();
    points.into_iter().filter(|point| seen.insert(point.id)).map(Marker::from).collect()
}

fn dedupe(points: Vec<Point>) -> Vec<Point> {
    let mut seen = FxHashSet::default();
    points.into_iter().filter(|point| seen.insert(point.id)).collect()
}

/// Map area of the directory screen.
#[derive(Debug, Clone, PartialEq)]
pub enum MapArea {
    /// Waiting for the location permission answer.
    Pending,
    /// Permission denied; the rest of the directory still renders.
    Unavailable,
    Ready(MapSurface),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapSurface {
    pub center: Coordinate,
    pub zoom_delta: f64,
    pub markers: Vec<Marker>,
}

/// Item category row with its toggle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemChip {
    pub item: ItemCategory,
    pub selected: bool,
}

/// Render snapshot of the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryView {
    pub locality: Option<Locality>,
    pub items: Vec<ItemChip>,
    pub visible: Vec<Point>,
    pub point_count: usize,
    pub map: MapArea,
    /// An item or point request is outstanding.
    pub loading: bool,
}

/// Outcome of [`DirectoryController::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opened {
    pub items: Refresh,
    pub points: Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Fix {
    Pending,
    Locating,
    Denied,
    Resolved(Coordinate),
}

#[derive(Debug)]
struct DirectoryState {
    locality: Option<Locality>,
    items: Vec<ItemCategory>,
    points: Vec<Point>,
    points_for: Option<Locality>,
    filter: ItemFilter,
    fix: Fix,
    items_slot: FetchSlot<()>,
    points_slot: FetchSlot<Locality>,
}

impl Default for DirectoryState {
    fn default() -> Self {
        Self {
            locality: None,
            items: Vec::new(),
            points: Vec::new(),
            points_for: None,
            filter: ItemFilter::default(),
            fix: Fix::Pending,
            items_slot: FetchSlot::default(),
            points_slot: FetchSlot::default(),
        }
    }
}

#[derive(Debug)]
struct DirectoryInner<S, L> {
    source: Arc<S>,
    location: L,
    map: MapConfig,
    events: SessionEvents,
    state: Mutex<DirectoryState>,
}

/// Items, points, filter and map for the chosen locality.
#[derive(Debug)]
pub struct DirectoryController<S, L> {
    inner: Arc<DirectoryInner<S, L>>,
}

impl<S, L> Clone for DirectoryController<S, L> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S, L> DirectoryController<S, L>
where
    S: ItemCatalog + PointDirectory,
    L: LocationProvider,
{
    pub fn new(source: Arc<S>, location: L, map: MapConfig, events: SessionEvents) -> Self {
        Self {
            inner: Arc::new(DirectoryInner {
                source,
                location,
                map,
                events,
                state: Mutex::default(),
            }),
        }
    }

    /// Shows `locality`: loads the item catalog (once), its points (once per
    /// locality) and resolves the map position, concurrently.
    pub async fn open(&self, locality: Locality) -> Opened {
        info!(region = %locality.region, locality = %locality.name, "Opening directory");
        self.inner.state.lock().locality = Some(locality.clone());

        let (items, points, ()) =
            tokio::join!(self.load_items(), self.load_points(locality), self.locate());
        Opened { items, points }
    }

    async fn load_items(&self) -> Refresh {
        let ticket = {
            let mut state = self.inner.state.lock();
            if !state.items.is_empty() {
                return Refresh::Skipped;
            }
            match state.items_slot.begin(()) {
                Some(ticket) => ticket,
                None => return Refresh::Skipped,
            }
        };

        debug!("Fetching item catalog");
        let result = self.inner.source.fetch_items().await;

        let mut state = self.inner.state.lock();
        let current = state.items_slot.settle(&ticket);
        conclude(FetchKey::Items, current, result, |items| state.items = items)
    }

    async fn load_points(&self, locality: Locality) -> Refresh {
        let ticket = {
            let mut state = self.inner.state.lock();
            if state.points_for.as_ref() == Some(&locality) {
                return Refresh::Skipped;
            }
            let Some(ticket) = state.points_slot.begin(locality.clone()) else {
                return Refresh::Skipped;
            };
            state.points.clear();
            state.points_for = None;
            state.filter.clear();
            ticket
        };

        let query = PointQuery::new(locality.region.clone(), locality.name.clone());
        debug!(region = %query.region, locality = %query.locality, "Fetching points");
        let result = self.inner.source.fetch_points(&query).await;

        let mut state = self.inner.state.lock();
        let current = state.points_slot.settle(&ticket);
        conclude(FetchKey::Points, current, result, |points| {
            state.points = dedupe(points);
            state.points_for = Some(locality);
        })
    }

    /// Resolves the map center once per session.
    async fn locate(&self) {
        {
            let mut state = self.inner.state.lock();
            if state.fix != Fix::Pending {
                return;
            }
            state.fix = Fix::Locating;
        }

        let fix = match self.inner.location.request_permission().await {
            Permission::Denied => Fix::Denied,
            Permission::Granted if self.inner.map.use_device_position => {
                let position = self.inner.location.current_position().await;
                Fix::Resolved(
                    position.filter(Coordinate::is_valid).unwrap_or(self.inner.map.fallback_anchor),
                )
            },
            Permission::Granted => Fix::Resolved(self.inner.map.fallback_anchor),
        };

        self.inner.state.lock().fix = fix;
        match fix {
            Fix::Denied => {
                info!("Location permission denied; map stays empty");
                self.inner.events.notify(Notice::PermissionDenied {
                    message: self.inner.map.permission_notice.clone(),
                });
            },
            Fix::Resolved(center) => debug!(%center, "Map center resolved"),
            Fix::Pending | Fix::Locating => {},
        }
    }

    /// Toggles an item category. Returns whether it is now selected.
    ///
    /// # Errors
    /// [`DiscoveryError::InvalidTransition`] for an id missing from a loaded catalog.
    pub fn toggle(&self, id: ItemId) -> Result<bool, DiscoveryError> {
        let mut state = self.inner.state.lock();
        if !state.items.is_empty() && !state.items.iter().any(|item| item.id == id) {
            return Err(DiscoveryError::invalid(format!("unknown item category {id}")));
        }
        let selected = state.filter.toggle(id);
        debug!(item = %id, selected, "Item filter toggled");
        Ok(selected)
    }

    #[must_use]
    pub fn filter(&self) -> ItemFilter {
        self.inner.state.lock().filter.clone()
    }

    /// Currently visible points.
    #[must_use]
    pub fn visible(&self) -> Vec<Point> {
        let state = self.inner.state.lock();
        visible_points(&state.points, &state.filter.current()).into_iter().cloned().collect()
    }

    /// Marker tap. Accepts only ids of currently visible markers.
    ///
    /// # Errors
    /// [`DiscoveryError::InvalidTransition`] for any other id.
    pub fn select_marker(&self, id: PointId) -> Result<PointId, DiscoveryError> {
        let state = self.inner.state.lock();
        let selected = state.filter.current();
        if visible_points(&state.points, &selected).iter().any(|point| point.id == id) {
            Ok(id)
        } else {
            Err(DiscoveryError::invalid(format!("point {id} is not on the map")))
        }
    }

    #[must_use]
    pub fn view(&self) -> DirectoryView {
        let state = self.inner.state.lock();
        let selected = state.filter.current();
        let visible = visible_points(&state.points, &selected);

        let map = match state.fix {
            Fix::Pending | Fix::Locating => MapArea::Pending,
            Fix::Denied => MapArea::Unavailable,
            Fix::Resolved(center) => MapArea::Ready(MapSurface {
                center,
                zoom_delta: self.inner.map.zoom_delta,
                markers: markers(visible.iter().copied()),
            }),
        };

        DirectoryView {
            locality: state.locality.clone(),
            items: state
                .items
                .iter()
                .map(|item| ItemChip { item: item.clone(), selected: selected.contains(&item.id) })
                .collect(),
            point_count: visible.len(),
            visible: visible.into_iter().cloned().collect(),
            map,
            loading: state.items_slot.is_busy() || state.points_slot.is_busy(),
        }
    }
}
