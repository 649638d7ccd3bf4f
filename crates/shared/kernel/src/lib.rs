//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it re-exports the domain and owns configuration loading.
//!
//! ## Config loading
//! ```rust,no_run
//! use eco_kernel::config::load_config;
//! use eco_kernel::domain::config::EcoConfig;
//!
//! let cfg: EcoConfig = load_config(Some("config/local")).unwrap_or_default();
//! # drop(cfg);
//! ```
pub mod config;

pub use eco_domain as domain;
