//! Facade crate for the EcoPoint slices and shared modules.
//! Re-exports domain/kernel primitives and wires the HTTP-backed discovery session.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! ```rust,no_run
//! use eco::discovery::StaticLocation;
//! use eco::domain::config::EcoConfig;
//! # use eco::discovery::{ContactDispatcher, MailDraft};
//! # use std::sync::Arc;
//! # #[derive(Debug)] struct Noop;
//! # impl ContactDispatcher for Noop {
//! #     fn open_mail(&self, _: MailDraft) {}
//! #     fn open_link(&self, _: eco::discovery::Url) {}
//! # }
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config: EcoConfig = eco::kernel::config::load_config(None::<&str>)?;
//! let session = eco::connect(&config, StaticLocation::granted(None), Arc::new(Noop))?;
//! session.load_regions().await;
//! # Ok(())
//! # }
//! ```

pub use eco_catalog as catalog;
pub use eco_discovery as discovery;
pub use eco_domain as domain;
pub use eco_kernel as kernel;

use eco_catalog::{FetchError, HttpCatalog};
use eco_discovery::{ContactDispatcher, DiscoverySession, LocationProvider};
use eco_domain::config::EcoConfig;
use std::sync::Arc;
use tracing::info;

/// Discovery session reading from the REST API.
pub type HttpSession<L> = DiscoverySession<HttpCatalog, L>;

/// Builds a discovery session against the endpoints in `config`.
///
/// # Errors
/// Returns [`FetchError`] if the HTTP client cannot be configured.
pub fn connect<L: LocationProvider>(
    config: &EcoConfig,
    location: L,
    dispatcher: Arc<dyn ContactDispatcher>,
) -> Result<HttpSession<L>, FetchError> {
    let source = Arc::new(HttpCatalog::from_config(config)?);
    info!(api = %config.api.base_url, "Discovery session ready");
    Ok(DiscoverySession::new(source, location, dispatcher, config))
}
