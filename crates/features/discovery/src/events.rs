use eco_domain::{Locality, PointId, RegionCode};
use std::fmt;
use std::future::Future;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, trace, warn};

const DEFAULT_CAPACITY: usize = 32;

/// Where the session currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Start,
    RegionChosen { region: RegionCode },
    LocalityChosen { locality: Locality },
    DirectoryReady { locality: Locality },
    DetailOpen { locality: Locality, point: PointId },
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::RegionChosen { region } => write!(f, "region-chosen({region})"),
            Self::LocalityChosen { locality } => {
                write!(f, "locality-chosen({}, {})", locality.region, locality.name)
            },
            Self::DirectoryReady { locality } => {
                write!(f, "directory-ready({}, {})", locality.region, locality.name)
            },
            Self::DetailOpen { point, .. } => write!(f, "detail-open({point})"),
        }
    }
}

/// One-off messages for the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Location permission was refused; carries the text to show once.
    PermissionDenied { message: String },
    NavigatedToDetail { point: PointId },
    NavigatedBack,
}

/// Latest-value stage channel plus a fan-out notice channel.
///
/// Cheap to clone; every clone publishes into the same channels.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    stage: watch::Sender<Stage>,
    notices: broadcast::Sender<Notice>,
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl SessionEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A zero capacity is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (stage, _) = watch::channel(Stage::Start);
        let (notices, _) = broadcast::channel(capacity.max(1));
        Self { stage, notices }
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage.borrow().clone()
    }

    #[must_use]
    pub fn watch_stage(&self) -> watch::Receiver<Stage> {
        self.stage.subscribe()
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    pub(crate) fn set_stage(&self, stage: Stage) {
        info!(%stage, "Stage changed");
        self.stage.send_replace(stage);
    }

    pub(crate) fn notify(&self, notice: Notice) {
        if self.notices.send(notice).is_err() {
            trace!("Notice dropped; no subscribers");
        }
    }
}

/// Lag-tolerant receive for notice subscribers.
pub trait NoticeReceiverExt {
    /// Next notice, skipping over anything lost to lag. `None` once all senders are gone.
    fn next_notice(&mut self) -> impl Future<Output = Option<Notice>> + Send;
}

impl NoticeReceiverExt for broadcast::Receiver<Notice> {
    async fn next_notice(&mut self) -> Option<Notice> {
        let mut skipped = 0u64;

        loop {
            match self.recv().await {
                Ok(notice) => {
                    if skipped > 0 {
                        warn!(skipped, "Notice receiver lagged; continuing from latest notice");
                    }
                    return Some(notice);
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    skipped = skipped.saturating_add(n);
                    debug!(skipped = n, total_skipped = skipped, "Notice receiver lagged");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
