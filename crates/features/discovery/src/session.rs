use crate::cascade::{Selection, SelectionCascade};
use crate::contact::{ContactDispatcher, MailDraft};
use crate::detail::{DetailController, DetailView};
use crate::directory::{DirectoryController, DirectoryView, Opened};
use crate::error::DiscoveryError;
use crate::events::{Notice, SessionEvents, Stage};
use crate::fetch::Refresh;
use crate::location::LocationProvider;
use eco_catalog::CatalogSource;
use eco_domain::config::EcoConfig;
use eco_domain::{ItemId, PointId, Region, RegionCode};
use parking_lot::Mutex;
use std::sync::Arc;
use url::Url;

/// User steps the session state machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectRegion,
    SelectLocality,
    OpenDirectory,
    ToggleItem,
    OpenDetail,
    Contact,
    Back,
}

impl Stage {
    /// Whether `action` is a valid step from this stage.
    #[must_use]
    pub const fn permits(&self, action: Action) -> bool {
        match action {
            Action::SelectRegion => matches!(
                self,
                Self::Start | Self::RegionChosen { .. } | Self::LocalityChosen { .. }
            ),
            Action::SelectLocality => {
                matches!(self, Self::RegionChosen { .. } | Self::LocalityChosen { .. })
            },
            Action::OpenDirectory => matches!(self, Self::LocalityChosen { .. }),
            Action::ToggleItem | Action::OpenDetail => matches!(self, Self::DirectoryReady { .. }),
            Action::Contact => matches!(self, Self::DetailOpen { .. }),
            Action::Back => matches!(self, Self::DirectoryReady { .. } | Self::DetailOpen { .. }),
        }
    }
}

/// The whole discovery flow behind one handle.
///
/// Each step is checked against the current [`Stage`] before it touches a
/// controller; rejected steps leave every piece of state untouched.
pub struct DiscoverySession<S, L> {
    cascade: SelectionCascade<S>,
    directory: DirectoryController<S, L>,
    detail: DetailController<S>,
    events: SessionEvents,
    stage: Arc<Mutex<Stage>>,
}

impl<S, L> Clone for DiscoverySession<S, L> {
    fn clone(&self) -> Self {
        Self {
            cascade: self.cascade.clone(),
            directory: self.directory.clone(),
            detail: self.detail.clone(),
            events: self.events.clone(),
            stage: Arc::clone(&self.stage),
        }
    }
}

impl<S, L> std::fmt::Debug for DiscoverySession<S, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoverySession").field("stage", &*self.stage.lock()).finish_non_exhaustive()
    }
}

impl<S, L> DiscoverySession<S, L>
where
    S: CatalogSource,
    L: LocationProvider,
{
    pub fn new(
        source: Arc<S>,
        location: L,
        dispatcher: Arc<dyn ContactDispatcher>,
        config: &EcoConfig,
    ) -> Self {
        let events = SessionEvents::new();
        Self {
            cascade: SelectionCascade::new(Arc::clone(&source)),
            directory: DirectoryController::new(
                Arc::clone(&source),
                location,
                config.map.clone(),
                events.clone(),
            ),
            detail: DetailController::new(source, dispatcher, config.contact.clone()),
            events,
            stage: Arc::new(Mutex::new(Stage::Start)),
        }
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage.lock().clone()
    }

    #[must_use]
    pub const fn events(&self) -> &SessionEvents {
        &self.events
    }

    #[must_use]
    pub const fn cascade(&self) -> &SelectionCascade<S> {
        &self.cascade
    }

    #[must_use]
    pub const fn directory(&self) -> &DirectoryController<S, L> {
        &self.directory
    }

    #[must_use]
    pub const fn detail(&self) -> &DetailController<S> {
        &self.detail
    }

    /// Checks `action` against the current stage and runs `step` under the same
    /// lock, entering the stage it returns. Concurrent clones cannot both pass
    /// the check for one stage.
    fn transition<T>(
        &self,
        action: Action,
        step: impl FnOnce(&Stage) -> Result<(Option<Stage>, T), DiscoveryError>,
    ) -> Result<T, DiscoveryError> {
        let mut stage = self.stage.lock();
        if !stage.permits(action) {
            return Err(DiscoveryError::invalid(format!("{action:?} is not allowed at {}", *stage)));
        }

        let (next, value) = step(&stage)?;
        if let Some(next) = next {
            *stage = next.clone();
            self.events.set_stage(next);
        }
        Ok(value)
    }

    pub async fn load_regions(&self) -> Refresh {
        self.cascade.load_regions().await
    }

    #[must_use]
    pub fn regions(&self) -> Vec<Region> {
        self.cascade.regions()
    }

    /// Chooses a region (`None` returns to [`Stage::Start`]) and fetches its localities.
    ///
    /// # Errors
    /// [`DiscoveryError::InvalidTransition`] once the directory is open.
    pub async fn select_region(&self, region: Option<RegionCode>) -> Result<Refresh, DiscoveryError> {
        self.transition(Action::SelectRegion, |_| {
            let next = match &region {
                Some(code) => Stage::RegionChosen { region: code.clone() },
                None => Stage::Start,
            };
            Ok((Some(next), ()))
        })?;
        Ok(self.cascade.select_region(region).await)
    }

    /// Chooses (or with a placeholder, clears) the locality.
    ///
    /// # Errors
    /// [`DiscoveryError::InvalidTransition`] without a region, for an unknown
    /// locality, or once the directory is open.
    pub fn select_locality(&self, name: &str) -> Result<(), DiscoveryError> {
        self.transition(Action::SelectLocality, |_| {
            self.cascade.select_locality(name)?;
            let next = match (self.cascade.ready_criteria(), self.cascade.selection()) {
                (Ok(locality), _) => Stage::LocalityChosen { locality },
                (Err(_), Selection { region: Some(region), .. }) => Stage::RegionChosen { region },
                (Err(_), Selection { region: None, .. }) => Stage::Start,
            };
            Ok((Some(next), ()))
        })
    }

    /// Hands the chosen locality to the directory and loads it.
    ///
    /// # Errors
    /// [`DiscoveryError::InvalidTransition`] unless both region and locality are chosen.
    pub async fn open_directory(&self) -> Result<Opened, DiscoveryError> {
        let locality = self.transition(Action::OpenDirectory, |_| {
            let locality = self.cascade.ready_criteria()?;
            Ok((Some(Stage::DirectoryReady { locality: locality.clone() }), locality))
        })?;
        Ok(self.directory.open(locality).await)
    }

    /// # Errors
    /// [`DiscoveryError::InvalidTransition`] outside the directory or for an unknown item.
    pub fn toggle_item(&self, id: ItemId) -> Result<bool, DiscoveryError> {
        self.transition(Action::ToggleItem, |_| Ok((None, self.directory.toggle(id)?)))
    }

    #[must_use]
    pub fn directory_view(&self) -> DirectoryView {
        self.directory.view()
    }

    /// Marker tap: navigates to the detail of a visible point and fetches it by id.
    ///
    /// # Errors
    /// [`DiscoveryError::InvalidTransition`] outside the directory or for an id
    /// without a visible marker.
    pub async fn open_detail(&self, point: PointId) -> Result<Refresh, DiscoveryError> {
        let point = self.transition(Action::OpenDetail, |stage| {
            let Stage::DirectoryReady { locality } = stage else {
                return Err(DiscoveryError::invalid("directory is not open"));
            };
            let point = self.directory.select_marker(point)?;
            Ok((Some(Stage::DetailOpen { locality: locality.clone(), point }), point))
        })?;
        self.events.notify(Notice::NavigatedToDetail { point });
        Ok(self.detail.load(point).await)
    }

    #[must_use]
    pub fn detail_view(&self) -> DetailView {
        self.detail.view()
    }

    /// Detail → directory, directory → locality selection.
    ///
    /// # Errors
    /// [`DiscoveryError::InvalidTransition`] from any other stage.
    pub fn back(&self) -> Result<Stage, DiscoveryError> {
        self.transition(Action::Back, |stage| {
            let next = match stage {
                Stage::DetailOpen { locality, .. } => {
                    self.events.notify(Notice::NavigatedBack);
                    Stage::DirectoryReady { locality: locality.clone() }
                },
                Stage::DirectoryReady { locality } => {
                    Stage::LocalityChosen { locality: locality.clone() }
                },
                stage => {
                    return Err(DiscoveryError::invalid(format!("cannot go back from {stage}")));
                },
            };
            Ok((Some(next.clone()), next))
        })
    }

    /// # Errors
    /// See [`DetailController::compose_email`]; also rejected outside the detail stage.
    pub fn compose_email(&self) -> Result<MailDraft, DiscoveryError> {
        // The dispatcher runs outside the stage lock.
        self.transition(Action::Contact, |_| Ok((None, ())))?;
        self.detail.compose_email()
    }

    /// # Errors
    /// See [`DetailController::compose_chat`]; also rejected outside the detail stage.
    pub fn compose_chat(&self) -> Result<Url, DiscoveryError> {
        // The dispatcher runs outside the stage lock.
        self.transition(Action::Contact, |_| Ok((None, ())))?;
        self.detail.compose_chat()
    }
}
