use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File stem looked up when no explicit path is given (`ecopoint.toml`, `ecopoint.json`, ...).
pub const DEFAULT_CONFIG_FILE: &str = "ecopoint";

/// Environment prefix for overrides, e.g. `ECO__API__BASE_URL`.
pub const ENV_PREFIX: &str = "ECO";

/// Errors raised while assembling configuration layers.
#[eco_derive::eco_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Layered configuration loader: a file, overlaid by `ECO__`-prefixed environment variables.
///
/// 1. **Base file**: `path` when given (must exist), otherwise the optional
///    `ecopoint` file in the working directory. Any format the `config` crate
///    recognizes by extension works.
/// 2. **Environment**: nested keys use double underscores, so
///    `ECO__CONTACT__EMAIL_FALLBACK=disabled` maps to `contact.email_fallback`.
///
/// # Errors
/// * An explicit `path` that cannot be found.
/// * Values that do not deserialize into `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = match path {
        Some(p) => (p.as_ref().to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    layered(&effective_path, required, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
}

fn layered<T>(path: &Path, required: bool, env: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    info!(path = %path.display(), required, "Loading configuration");

    let config = Config::builder()
        .add_source(File::from(path).required(required))
        .add_source(env)
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    debug!("Configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_domain::config::EcoConfig;
    use std::collections::HashMap;

    #[test]
    fn environment_overrides_nested_keys() {
        let vars = HashMap::from([
            ("ECO__API__BASE_URL".to_owned(), "http://from-env:3333".to_owned()),
            ("ECO__CONTACT__DEFAULT_EMAIL".to_owned(), "contato@ecopoint.org".to_owned()),
            ("OTHER__API__BASE_URL".to_owned(), "http://ignored".to_owned()),
        ]);

        let cfg: EcoConfig =
            layered(Path::new("does-not-exist"), false, environment().source(Some(vars)))
                .expect("config loads");

        assert_eq!(cfg.api.base_url, "http://from-env:3333");
        assert_eq!(cfg.contact.default_email, "contato@ecopoint.org");
    }

    #[test]
    fn optional_default_file_falls_back_to_defaults() {
        let cfg: EcoConfig = layered(
            Path::new("definitely-missing-ecopoint"),
            false,
            environment().source(Some(HashMap::new())),
        )
        .expect("defaults load");

        assert_eq!(cfg.api.base_url, "http://localhost:3333");
    }
}
