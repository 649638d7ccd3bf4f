use crate::geo::Coordinate;
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level client configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EcoConfigInner {
    pub api: ApiConfig,
    pub catalog: CatalogConfig,
    pub map: MapConfig,
    pub contact: ContactConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into controllers.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct EcoConfig {
    #[serde(flatten, default)]
    inner: Arc<EcoConfigInner>,
}

impl Deref for EcoConfig {
    type Target = EcoConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for EcoConfig {
    fn deref_mut(&mut self) -> &mut EcoConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Point/item API endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Rewrites the host of item icon URIs, e.g. `localhost` → a LAN address.
    pub asset_host_rewrite: Option<HostRewrite>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostRewrite {
    pub from: String,
    pub to: String,
}

/// Region/locality catalog endpoint. Shares the API base URL unless overridden.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: Option<String>,
    pub regions_path: String,
    /// Path template; `{code}` is replaced with the region code.
    pub localities_path: String,
}

/// Map surface defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Center used when the device cannot report a position.
    pub fallback_anchor: Coordinate,
    pub zoom_delta: f64,
    /// Ask the location provider for a position; otherwise go straight to the anchor.
    pub use_device_position: bool,
    pub permission_notice: String,
}

/// What `compose_email` does for a point without an email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailFallback {
    /// Address the placeholder in [`ContactConfig::default_email`].
    #[default]
    Placeholder,
    /// Refuse the action.
    Disabled,
}

/// Contact composer settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub email_fallback: EmailFallback,
    pub default_email: String,
    pub mail_subject: String,
    pub chat_message: String,
    pub chat_link_base: String,
}

/// Logger settings consumed by host binaries.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub filter: Option<String>,
    pub directory: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3333".to_owned(),
            timeout_seconds: 10,
            asset_host_rewrite: None,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            regions_path: "regions".to_owned(),
            localities_path: "regions/{code}/localities".to_owned(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            fallback_anchor: Coordinate::new(-3.771_114_3, -38.600_531_9),
            zoom_delta: 0.014,
            use_device_position: true,
            permission_notice: "Precisamos de sua permissão para obter a localização!".to_owned(),
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            email_fallback: EmailFallback::Placeholder,
            default_email: "default@email.com".to_owned(),
            mail_subject: "Interesse na coleta de resíduos".to_owned(),
            chat_message: "Tenho interesse na coleta de resíduos".to_owned(),
            chat_link_base: "whatsapp://send".to_owned(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), filter: None, directory: None, json: false }
    }
}
