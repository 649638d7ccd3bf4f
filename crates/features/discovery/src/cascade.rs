use crate::error::DiscoveryError;
use crate::fetch::{FetchKey, FetchSlot, Refresh, conclude};
use eco_catalog::RegionCatalog;
use eco_domain::{Locality, Region, RegionCode, is_no_choice};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Current region/locality choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub region: Option<RegionCode>,
    pub locality: Option<String>,
}

#[derive(Debug, Default)]
struct CascadeState {
    regions: Vec<Region>,
    localities: Vec<Locality>,
    selection: Selection,
    regions_slot: FetchSlot<()>,
    localities_slot: FetchSlot<RegionCode>,
}

#[derive(Debug)]
struct CascadeInner<S> {
    source: Arc<S>,
    state: Mutex<CascadeState>,
}

/// Region → locality dependent selection.
///
/// Choosing a region always resets the locality and refetches that region's
/// localities; a response for a region the user has since left is dropped.
#[derive(Debug)]
pub struct SelectionCascade<S> {
    inner: Arc<CascadeInner<S>>,
}

impl<S> Clone for SelectionCascade<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: RegionCatalog> SelectionCascade<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { inner: Arc::new(CascadeInner { source, state: Mutex::default() }) }
    }

    /// Fetches the region list once; later calls are skipped after a successful load.
    pub async fn load_regions(&self) -> Refresh {
        let ticket = {
            let mut state = self.inner.state.lock();
            if !state.regions.is_empty() {
                return Refresh::Skipped;
            }
            match state.regions_slot.begin(()) {
                Some(ticket) => ticket,
                None => return Refresh::Skipped,
            }
        };

        debug!("Fetching regions");
        let result = self.inner.source.fetch_regions().await;

        let mut state = self.inner.state.lock();
        let current = state.regions_slot.settle(&ticket);
        conclude(FetchKey::Regions, current, result, |regions| state.regions = regions)
    }

    /// Replaces the region, clears the locality and fetches the new region's localities.
    ///
    /// `None` is the empty state: nothing is fetched and any outstanding locality
    /// request is abandoned.
    pub async fn select_region(&self, region: Option<RegionCode>) -> Refresh {
        let ticket = {
            let mut state = self.inner.state.lock();
            state.selection = Selection { region: region.clone(), locality: None };
            state.localities.clear();

            let Some(code) = region else {
                state.localities_slot.invalidate();
                return Refresh::Skipped;
            };
            match state.localities_slot.begin(code) {
                Some(ticket) => ticket,
                None => return Refresh::Skipped,
            }
        };

        let code = ticket.param();
        debug!(region = %code, "Fetching localities");
        let result = self.inner.source.fetch_localities(code).await;

        let mut state = self.inner.state.lock();
        let current = state.localities_slot.settle(&ticket);
        conclude(FetchKey::Localities, current, result, |localities| {
            state.localities = localities;
        })
    }

    /// Chooses a locality of the current region. Placeholder values clear it.
    ///
    /// # Errors
    /// [`DiscoveryError::InvalidTransition`] without a region, while the region's
    /// localities are still loading, or for a name missing from the loaded list.
    pub fn select_locality(&self, name: &str) -> Result<(), DiscoveryError> {
        let mut state = self.inner.state.lock();
        let Some(region) = state.selection.region.clone() else {
            return Err(DiscoveryError::invalid("choose a region before a locality"));
        };

        if is_no_choice(name) {
            state.selection.locality = None;
            return Ok(());
        }

        if state.localities_slot.is_busy() {
            return Err(DiscoveryError::invalid(format!("localities of {region} are still loading")));
        }

        let name = name.trim();
        if !state.localities.is_empty() && !state.localities.iter().any(|l| l.name == name) {
            return Err(DiscoveryError::invalid(format!("'{name}' is not a locality of {region}")));
        }

        state.selection.locality = Some(name.to_owned());
        Ok(())
    }

    /// The `(region, locality)` pair handed to the directory.
    ///
    /// # Errors
    /// [`DiscoveryError::InvalidTransition`] unless both are chosen.
    pub fn ready_criteria(&self) -> Result<Locality, DiscoveryError> {
        let state = self.inner.state.lock();
        match &state.selection {
            Selection { region: Some(region), locality: Some(name) } => {
                Ok(Locality { region: region.clone(), name: name.clone() })
            },
            Selection { region: None, .. } => Err(DiscoveryError::invalid("no region chosen")),
            Selection { locality: None, .. } => Err(DiscoveryError::invalid("no locality chosen")),
        }
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.inner.state.lock().selection.clone()
    }

    #[must_use]
    pub fn regions(&self) -> Vec<Region> {
        self.inner.state.lock().regions.clone()
    }

    #[must_use]
    pub fn localities(&self) -> Vec<Locality> {
        self.inner.state.lock().localities.clone()
    }
}
