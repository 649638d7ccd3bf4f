use crate::contact::{ContactDispatcher, MailDraft, chat_link};
use crate::error::DiscoveryError;
use crate::fetch::{FetchKey, FetchSlot, Refresh, conclude};
use eco_catalog::PointDirectory;
use eco_domain::config::{ContactConfig, EmailFallback};
use eco_domain::{Point, PointId};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Display fields of a resolved point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointDetail {
    pub point: Point,
    pub items_label: String,
    pub address: String,
}

impl From<Point> for PointDetail {
    fn from(point: Point) -> Self {
        Self { items_label: point.items_label(), address: point.address(), point }
    }
}

/// What the detail screen shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailView {
    #[default]
    Idle,
    /// Requested (or failed) and not yet shown; never a previous point's fields.
    Unresolved(PointId),
    Resolved(Box<PointDetail>),
}

#[derive(Debug, Default)]
struct DetailState {
    view: DetailView,
    slot: FetchSlot<PointId>,
}

struct DetailInner<S> {
    source: Arc<S>,
    dispatcher: Arc<dyn ContactDispatcher>,
    contact: ContactConfig,
    state: Mutex<DetailState>,
}

impl<S> std::fmt::Debug for DetailInner<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailInner")
            .field("contact", &self.contact)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Resolves one point by id and dispatches contact actions for it.
#[derive(Debug)]
pub struct DetailController<S> {
    inner: Arc<DetailInner<S>>,
}

impl<S> Clone for DetailController<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: PointDirectory> DetailController<S> {
    pub fn new(
        source: Arc<S>,
        dispatcher: Arc<dyn ContactDispatcher>,
        contact: ContactConfig,
    ) -> Self {
        Self {
            inner: Arc::new(DetailInner {
                source,
                dispatcher,
                contact,
                state: Mutex::default(),
            }),
        }
    }

    /// Fetches point `id`. The view turns [`DetailView::Unresolved`] right away and
    /// only shows `id` once its own response arrives.
    pub async fn load(&self, id: PointId) -> Refresh {
        let ticket = {
            let mut state = self.inner.state.lock();
            state.view = DetailView::Unresolved(id);
            match state.slot.begin(id) {
                Some(ticket) => ticket,
                None => return Refresh::Skipped,
            }
        };

        debug!(point = %id, "Fetching point");
        let result = self.inner.source.fetch_point(id).await;

        let mut state = self.inner.state.lock();
        let current = state.slot.settle(&ticket);
        conclude(FetchKey::Point, current, result, |point| {
            state.view = DetailView::Resolved(Box::new(point.into()));
        })
    }

    #[must_use]
    pub fn view(&self) -> DetailView {
        self.inner.state.lock().view.clone()
    }

    fn resolved(&self) -> Result<Point, DiscoveryError> {
        match &self.inner.state.lock().view {
            DetailView::Resolved(detail) => Ok(detail.point.clone()),
            DetailView::Idle | DetailView::Unresolved(_) => {
                Err(DiscoveryError::invalid("no point is shown"))
            },
        }
    }

    /// Opens the mail composer for the shown point.
    ///
    /// # Errors
    /// * [`DiscoveryError::InvalidTransition`] before a point is resolved.
    /// * [`DiscoveryError::ContactUnavailable`] when the point has no email and the
    ///   fallback is disabled.
    pub fn compose_email(&self) -> Result<MailDraft, DiscoveryError> {
        let point = self.resolved()?;
        let contact = &self.inner.contact;

        let recipient = match (point.email, contact.email_fallback) {
            (Some(email), _) => email,
            (None, EmailFallback::Placeholder) => contact.default_email.clone(),
            (None, EmailFallback::Disabled) => {
                return Err(DiscoveryError::unavailable(format!("point {} has no email", point.id)));
            },
        };

        let draft = MailDraft { recipients: vec![recipient], subject: contact.mail_subject.clone() };
        info!(point = %point.id, "Opening mail composer");
        self.inner.dispatcher.open_mail(draft.clone());
        Ok(draft)
    }

    /// Opens the chat deep-link for the shown point.
    ///
    /// # Errors
    /// * [`DiscoveryError::InvalidTransition`] before a point is resolved.
    /// * [`DiscoveryError::ContactUnavailable`] for a missing or malformed handle.
    pub fn compose_chat(&self) -> Result<Url, DiscoveryError> {
        let point = self.resolved()?;
        let contact = &self.inner.contact;

        let handle = point.phone.as_deref().unwrap_or_default();
        let link = chat_link(&contact.chat_link_base, handle, &contact.chat_message)?;

        info!(point = %point.id, "Opening chat link");
        self.inner.dispatcher.open_link(link.clone());
        Ok(link)
    }
}
