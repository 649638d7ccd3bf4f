use crate::error::{FetchError, FetchErrorExt};
use crate::source::{ItemCatalog, PointDirectory, PointQuery, RegionCatalog};
use eco_domain::config::{EcoConfig, HostRewrite};
use eco_domain::{ItemCategory, Locality, Point, PointId, Region, RegionCode};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};
use url::{Url, form_urlencoded};

const REGION_PLACEHOLDER: &str = "{code}";

/// `reqwest`-backed implementation of every catalog trait.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    api: Url,
    catalog: Url,
    regions_path: String,
    localities_path: String,
    asset_rewrite: Option<HostRewrite>,
}

/// Locality as served by the catalog; the region is attached from the request.
#[derive(Deserialize)]
struct LocalityRecord {
    #[serde(alias = "nome")]
    name: String,
}

impl HttpCatalog {
    /// Builds the client from the `api` and `catalog` sections.
    ///
    /// # Errors
    /// * [`FetchError::InvalidUrl`] for an unparsable base URL.
    /// * [`FetchError::Transport`] if the TLS backend cannot be initialized.
    pub fn from_config(config: &EcoConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_seconds.max(1)))
            .build()
            .context("building HTTP client")?;

        let api = base_url(&config.api.base_url).context("api.base_url")?;
        let catalog = match &config.catalog.base_url {
            Some(url) => base_url(url).context("catalog.base_url")?,
            None => api.clone(),
        };

        Ok(Self {
            client,
            api,
            catalog,
            regions_path: config.catalog.regions_path.clone(),
            localities_path: config.catalog.localities_path.clone(),
            asset_rewrite: config.api.asset_host_rewrite.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!(%url, "GET");
        let response = self.client.get(url.clone()).send().await.context(url.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                context: Some(url.to_string().into()),
            });
        }

        let body = response.bytes().await.context(url.to_string())?;
        trace!(%url, bytes = body.len(), "Response received");
        serde_json::from_slice(&body).context(url.to_string())
    }

    fn rewrite_icon(&self, item: &mut ItemCategory) {
        let Some(rewrite) = &self.asset_rewrite else {
            return;
        };
        let Ok(mut icon) = Url::parse(&item.icon) else {
            return;
        };
        if icon.host_str() == Some(rewrite.from.as_str()) && icon.set_host(Some(&rewrite.to)).is_ok()
        {
            item.icon = icon.into();
        }
    }
}

impl RegionCatalog for HttpCatalog {
    async fn fetch_regions(&self) -> Result<Vec<Region>, FetchError> {
        let url = self.catalog.join(&self.regions_path).context("regions path")?;
        self.get_json(url).await
    }

    async fn fetch_localities(&self, region: &RegionCode) -> Result<Vec<Locality>, FetchError> {
        let code: String = form_urlencoded::byte_serialize(region.as_str().as_bytes()).collect();
        let path = self.localities_path.replace(REGION_PLACEHOLDER, &code);
        let url = self.catalog.join(&path).context("localities path")?;

        let records: Vec<LocalityRecord> = self.get_json(url).await?;
        Ok(records
            .into_iter()
            .map(|record| Locality { region: region.clone(), name: record.name })
            .collect())
    }
}

impl ItemCatalog for HttpCatalog {
    async fn fetch_items(&self) -> Result<Vec<ItemCategory>, FetchError> {
        let url = self.api.join("items").context("items path")?;
        let mut items: Vec<ItemCategory> = self.get_json(url).await?;
        for item in &mut items {
            self.rewrite_icon(item);
        }
        Ok(items)
    }
}

impl PointDirectory for HttpCatalog {
    async fn fetch_points(&self, query: &PointQuery) -> Result<Vec<Point>, FetchError> {
        let mut url = self.api.join("points").context("points path")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("city", &query.locality).append_pair("uf", query.region.as_str());
            if let Some(items) = query.items_param() {
                pairs.append_pair("items", &items);
            }
        }
        self.get_json(url).await
    }

    async fn fetch_point(&self, id: PointId) -> Result<Point, FetchError> {
        let url = self.api.join(&format!("points/{id}")).context("point path")?;
        self.get_json(url).await
    }
}

/// Parses a base URL so that relative joins append instead of replacing the last segment.
fn base_url(raw: &str) -> Result<Url, url::ParseError> {
    let trimmed = raw.trim().trim_end_matches('/');
    Url::parse(&format!("{trimmed}/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_path_prefix() {
        let base = base_url("https://servicodados.ibge.gov.br/api/v1/localidades").expect("url");
        let joined = base.join("estados/CE/municipios").expect("join");
        assert_eq!(
            joined.as_str(),
            "https://servicodados.ibge.gov.br/api/v1/localidades/estados/CE/municipios"
        );
    }

    #[test]
    fn icon_host_is_rewritten_only_when_matching() {
        let mut config = EcoConfig::default();
        config.api.asset_host_rewrite =
            Some(HostRewrite { from: "localhost".to_owned(), to: "192.168.0.121".to_owned() });
        let catalog = HttpCatalog::from_config(&config).expect("catalog");

        let mut local = ItemCategory {
            id: eco_domain::ItemId(1),
            title: "Lâmpadas".to_owned(),
            icon: "http://localhost:3333/uploads/lampadas.svg".to_owned(),
        };
        catalog.rewrite_icon(&mut local);
        assert_eq!(local.icon, "http://192.168.0.121:3333/uploads/lampadas.svg");

        let mut remote = ItemCategory { icon: "https://cdn.example.org/a.svg".to_owned(), ..local };
        catalog.rewrite_icon(&mut remote);
        assert_eq!(remote.icon, "https://cdn.example.org/a.svg");
    }
}
