use crate::output::{StdoutDispatcher, line};
use anyhow::{Context, Result, bail};
use eco::catalog::{HttpCatalog, ItemCatalog, RegionCatalog};
use eco::discovery::{
    DetailController, DetailView, DiscoverySession, LocationProvider, MapArea, Notice, Refresh,
    StaticLocation,
};
use eco::domain::config::EcoConfig;
use eco::domain::{ItemId, PointId, RegionCode};
use std::sync::Arc;

pub(crate) async fn regions(catalog: &HttpCatalog) -> Result<()> {
    for region in catalog.fetch_regions().await? {
        line(region.label())?;
    }
    Ok(())
}

pub(crate) async fn localities(catalog: &HttpCatalog, region: &str) -> Result<()> {
    let Some(code) = RegionCode::parse_choice(region) else {
        bail!("choose a region");
    };
    for locality in catalog.fetch_localities(&code).await? {
        line(locality.name)?;
    }
    Ok(())
}

pub(crate) async fn items(catalog: &HttpCatalog) -> Result<()> {
    for item in catalog.fetch_items().await? {
        line(format!("{:>4}  {}", item.id.0, item.title))?;
    }
    Ok(())
}

pub(crate) async fn points(
    config: &EcoConfig,
    region: &str,
    locality: &str,
    items: &[u32],
    deny_location: bool,
) -> Result<()> {
    let location =
        if deny_location { StaticLocation::denied() } else { StaticLocation::granted(None) };
    let session = eco::connect(config, location, Arc::new(StdoutDispatcher))?;
    browse(&session, region, locality, items).await
}

async fn browse<L: LocationProvider>(
    session: &DiscoverySession<HttpCatalog, L>,
    region: &str,
    locality: &str,
    items: &[u32],
) -> Result<()> {
    let mut notices = session.events().subscribe();

    let refresh = session.select_region(RegionCode::parse_choice(region)).await?;
    if refresh == Refresh::Failed {
        bail!("could not load the localities of {region}");
    }
    session.select_locality(locality)?;

    let opened = session.open_directory().await?;
    if opened.points == Refresh::Failed {
        bail!("could not load the points of {locality}");
    }
    for &id in items {
        session.toggle_item(ItemId(id)).with_context(|| format!("item {id}"))?;
    }

    while let Ok(notice) = notices.try_recv() {
        if let Notice::PermissionDenied { message } = notice {
            line(message)?;
        }
    }

    let view = session.directory_view();
    let selected: Vec<_> =
        view.items.iter().filter(|chip| chip.selected).map(|chip| chip.item.title.as_str()).collect();
    line(format!(
        "{} point(s) in {}{}",
        view.point_count,
        locality,
        if selected.is_empty() { String::new() } else { format!(" accepting {}", selected.join(" or ")) }
    ))?;

    for point in &view.visible {
        line(format!("{:>6}  {}  [{}]", point.id.0, point.name, point.items_label()))?;
    }

    match view.map {
        MapArea::Ready(surface) => {
            line(format!("map: {} ±{}, {} marker(s)", surface.center, surface.zoom_delta, surface.markers.len()))?;
        },
        MapArea::Unavailable => line("map: unavailable")?,
        MapArea::Pending => line("map: waiting for location")?,
    }
    Ok(())
}

pub(crate) async fn detail(config: &EcoConfig, id: u64, email: bool, chat: bool) -> Result<()> {
    let catalog = Arc::new(HttpCatalog::from_config(config)?);
    let detail = DetailController::new(catalog, Arc::new(StdoutDispatcher), config.contact.clone());

    let id = PointId(id);
    if !detail.load(id).await.is_applied() {
        bail!("could not load point {id}");
    }
    let DetailView::Resolved(shown) = detail.view() else {
        bail!("point {id} is not available");
    };

    line(&shown.point.name)?;
    line(&shown.address)?;
    line(&shown.items_label)?;
    if email {
        detail.compose_email()?;
    }
    if chat {
        detail.compose_chat()?;
    }
    Ok(())
}
