#![allow(dead_code)]

use eco_catalog::{FetchError, ItemCatalog, PointDirectory, PointQuery, RegionCatalog};
use eco_discovery::{ContactDispatcher, LocationProvider, MailDraft, Permission};
use eco_domain::{
    Coordinate, ItemCategory, ItemId, ItemRef, Locality, Point, PointId, Region, RegionCode,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tokio::sync::oneshot;
use url::Url;

/// In-memory catalog with per-request gates, failures and call counters.
///
/// Request keys: `regions`, `localities/{code}`, `items`, `points/{locality}`, `point/{id}`.
#[derive(Debug, Default)]
pub struct FakeSource {
    pub regions: Vec<Region>,
    pub localities: HashMap<RegionCode, Vec<Locality>>,
    pub items: Vec<ItemCategory>,
    pub points: HashMap<String, Vec<Point>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl FakeSource {
    /// Ceará and São Paulo; Fortaleza holds points 1 (items [3]) and 2 (items [5]).
    pub fn ceara() -> Self {
        let localities = HashMap::from([
            (RegionCode::new("CE"), vec![locality("CE", "Fortaleza"), locality("CE", "Sobral")]),
            (RegionCode::new("SP"), vec![locality("SP", "Campinas")]),
        ]);
        let items = vec![item(3, "Lâmpadas"), item(5, "Pilhas e Baterias"), item(6, "Papelão")];
        let points =
            HashMap::from([("Fortaleza".to_owned(), vec![point(1, &[3]), point(2, &[5])])]);

        Self {
            regions: vec![region("CE", "Ceará"), region("SP", "São Paulo")],
            localities,
            items,
            points,
            ..Self::default()
        }
    }

    /// Holds the next request for `key` until the returned sender fires (or is dropped).
    pub fn hold(&self, key: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(key.to_owned(), rx);
        tx
    }

    pub fn fail(&self, key: &str) {
        self.failing.lock().insert(key.to_owned());
    }

    pub fn recover(&self, key: &str) {
        self.failing.lock().remove(key);
    }

    pub fn calls(&self, key: &str) -> usize {
        self.calls.lock().get(key).copied().unwrap_or_default()
    }

    async fn request(&self, key: String) -> Result<(), FetchError> {
        *self.calls.lock().entry(key.clone()).or_default() += 1;
        let gate = self.gates.lock().remove(&key);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let failing = self.failing.lock().contains(&key);
        if failing {
            return Err(FetchError::Status { status: 503, context: Some(key.into()) });
        }
        Ok(())
    }
}

impl RegionCatalog for FakeSource {
    async fn fetch_regions(&self) -> Result<Vec<Region>, FetchError> {
        self.request("regions".to_owned()).await?;
        Ok(self.regions.clone())
    }

    async fn fetch_localities(&self, region: &RegionCode) -> Result<Vec<Locality>, FetchError> {
        self.request(format!("localities/{region}")).await?;
        Ok(self.localities.get(region).cloned().unwrap_or_default())
    }
}

impl ItemCatalog for FakeSource {
    async fn fetch_items(&self) -> Result<Vec<ItemCategory>, FetchError> {
        self.request("items".to_owned()).await?;
        Ok(self.items.clone())
    }
}

impl PointDirectory for FakeSource {
    async fn fetch_points(&self, query: &PointQuery) -> Result<Vec<Point>, FetchError> {
        self.request(format!("points/{}", query.locality)).await?;
        Ok(self.points.get(&query.locality).cloned().unwrap_or_default())
    }

    async fn fetch_point(&self, id: PointId) -> Result<Point, FetchError> {
        self.request(format!("point/{id}")).await?;
        self.points
            .values()
            .flatten()
            .find(|point| point.id == id)
            .cloned()
            .ok_or(FetchError::Status { status: 404, context: None })
    }
}

/// Location provider whose permission answer is released by the test.
#[derive(Debug)]
pub struct GatedLocation {
    answer: Mutex<Option<oneshot::Receiver<Permission>>>,
    position: Option<Coordinate>,
}

impl GatedLocation {
    pub fn new(position: Option<Coordinate>) -> (Self, oneshot::Sender<Permission>) {
        let (tx, rx) = oneshot::channel();
        (Self { answer: Mutex::new(Some(rx)), position }, tx)
    }
}

impl LocationProvider for GatedLocation {
    async fn request_permission(&self) -> Permission {
        let answer = self.answer.lock().take();
        match answer {
            Some(rx) => rx.await.unwrap_or(Permission::Denied),
            None => Permission::Denied,
        }
    }

    async fn current_position(&self) -> Option<Coordinate> {
        self.position
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Mail(MailDraft),
    Link(String),
}

#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    pub sent: Mutex<Vec<Dispatched>>,
}

impl RecordingDispatcher {
    pub fn sent(&self) -> Vec<Dispatched> {
        self.sent.lock().clone()
    }
}

impl ContactDispatcher for RecordingDispatcher {
    fn open_mail(&self, draft: MailDraft) {
        self.sent.lock().push(Dispatched::Mail(draft));
    }

    fn open_link(&self, link: Url) {
        self.sent.lock().push(Dispatched::Link(link.into()));
    }
}

pub fn region(code: &str, name: &str) -> Region {
    Region { code: RegionCode::new(code), name: name.to_owned() }
}

pub fn locality(region: &str, name: &str) -> Locality {
    Locality { region: RegionCode::new(region), name: name.to_owned() }
}

pub fn item(id: u32, title: &str) -> ItemCategory {
    ItemCategory {
        id: ItemId(id),
        title: title.to_owned(),
        icon: format!("http://localhost:3333/uploads/{id}.svg"),
    }
}

pub fn point(id: u64, items: &[u32]) -> Point {
    Point {
        id: PointId(id),
        name: format!("Ecoponto {id}"),
        image: format!("http://localhost:3333/uploads/point-{id}.jpg"),
        email: None,
        phone: None,
        coordinate: Coordinate::new(-3.73, -38.52),
        city: "Fortaleza".to_owned(),
        region: RegionCode::new("CE"),
        items: items
            .iter()
            .map(|&id| ItemRef { id: ItemId(id), title: format!("Item {id}") })
            .collect(),
    }
}
