//! # Discovery
//!
//! Client-side orchestration of the collection point locator:
//!
//! * [`SelectionCascade`]: region → locality choice, localities refetched per region.
//! * [`ItemFilter`]: toggled item categories, OR semantics.
//! * [`DirectoryController`]: items, points and map for one locality; the
//!   visible set is always [`visible_points`] of the current points and filter.
//! * [`DetailController`]: one point by id plus mail/chat actions.
//! * [`DiscoverySession`]: the state machine tying them together, publishing
//!   stage changes and notices through [`SessionEvents`].
//!
//! Fetches are keyed and generation-counted: a request whose parameters were
//! superseded is dropped when it finally answers ([`Refresh::Stale`]), and a
//! failed fetch keeps the previous state ([`Refresh::Failed`]).

mod cascade;
mod contact;
mod detail;
mod directory;
mod error;
mod events;
mod fetch;
mod filter;
mod location;
mod session;

pub use crate::cascade::{Selection, SelectionCascade};
pub use crate::contact::{ContactDispatcher, MailDraft, chat_link};
pub use crate::detail::{DetailController, DetailView, PointDetail};
pub use crate::directory::{
    DirectoryController, DirectoryView, ItemChip, MapArea, MapSurface, Opened, markers,
    visible_points,
};
pub use crate::error::{DiscoveryError, DiscoveryErrorExt};
pub use crate::events::{Notice, NoticeReceiverExt, SessionEvents, Stage};
pub use crate::fetch::{FetchKey, Refresh};
pub use crate::filter::ItemFilter;
pub use crate::location::{LocationProvider, Permission, StaticLocation};
pub use crate::session::{Action, DiscoverySession};
pub use url::Url;
