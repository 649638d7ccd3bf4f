pub mod fixtures;

use eco_discovery::{DiscoveryError, Refresh, SelectionCascade};
use eco_domain::{Locality, RegionCode};
use fixtures::FakeSource;
use std::sync::Arc;

fn names(localities: &[Locality]) -> Vec<&str> {
    localities.iter().map(|l| l.name.as_str()).collect()
}

#[tokio::test]
async fn regions_load_once() {
    let source = Arc::new(FakeSource::ceara());
    let cascade = SelectionCascade::new(Arc::clone(&source));

    assert_eq!(cascade.load_regions().await, Refresh::Applied);
    assert_eq!(cascade.load_regions().await, Refresh::Skipped);
    assert_eq!(cascade.regions()[0].label(), "CE - Ceará");
    assert_eq!(source.calls("regions"), 1);
}

#[tokio::test]
async fn failed_region_load_is_retried_by_the_next_call() {
    let source = Arc::new(FakeSource::ceara());
    source.fail("regions");
    let cascade = SelectionCascade::new(Arc::clone(&source));

    assert_eq!(cascade.load_regions().await, Refresh::Failed);
    assert!(cascade.regions().is_empty());

    source.recover("regions");
    assert_eq!(cascade.load_regions().await, Refresh::Applied);
    assert_eq!(cascade.regions().len(), 2);
}

#[tokio::test]
async fn region_change_resets_locality_and_refetches() {
    let source = Arc::new(FakeSource::ceara());
    let cascade = SelectionCascade::new(Arc::clone(&source));

    assert_eq!(cascade.select_region(Some(RegionCode::new("CE"))).await, Refresh::Applied);
    assert_eq!(names(&cascade.localities()), ["Fortaleza", "Sobral"]);
    cascade.select_locality("Fortaleza").expect("known locality");

    assert_eq!(cascade.select_region(Some(RegionCode::new("SP"))).await, Refresh::Applied);
    assert_eq!(cascade.selection().locality, None);
    assert_eq!(names(&cascade.localities()), ["Campinas"]);
    assert!(matches!(cascade.ready_criteria(), Err(DiscoveryError::InvalidTransition { .. })));
}

#[tokio::test]
async fn no_region_never_calls_the_catalog() {
    let source = Arc::new(FakeSource::ceara());
    let cascade = SelectionCascade::new(Arc::clone(&source));

    assert_eq!(cascade.select_region(None).await, Refresh::Skipped);
    assert!(cascade.localities().is_empty());
    assert_eq!(source.calls("localities/CE") + source.calls("localities/SP"), 0);

    let err = cascade.select_locality("Fortaleza").expect_err("no region yet");
    assert!(matches!(err, DiscoveryError::InvalidTransition { .. }));
}

#[tokio::test]
async fn unknown_locality_is_rejected_and_placeholder_clears() {
    let source = Arc::new(FakeSource::ceara());
    let cascade = SelectionCascade::new(Arc::clone(&source));
    cascade.select_region(Some(RegionCode::new("CE"))).await;

    assert!(cascade.select_locality("Campinas").is_err());
    cascade.select_locality(" Sobral ").expect("trimmed name");
    assert_eq!(
        cascade.ready_criteria().expect("ready"),
        Locality { region: RegionCode::new("CE"), name: "Sobral".to_owned() }
    );

    cascade.select_locality("0").expect("placeholder");
    assert_eq!(cascade.selection().locality, None);
}

#[tokio::test]
async fn failed_locality_fetch_leaves_list_empty() {
    let source = Arc::new(FakeSource::ceara());
    source.fail("localities/CE");
    let cascade = SelectionCascade::new(Arc::clone(&source));

    assert_eq!(cascade.select_region(Some(RegionCode::new("CE"))).await, Refresh::Failed);
    assert!(cascade.localities().is_empty());
    assert_eq!(source.calls("localities/CE"), 1, "no automatic retry");

    // With nothing loaded the name cannot be checked and is accepted as typed.
    cascade.select_locality("Fortaleza").expect("unchecked locality");
}

#[tokio::test]
async fn stale_locality_response_for_abandoned_region_is_discarded() {
    let source = Arc::new(FakeSource::ceara());
    let release_ce = source.hold("localities/CE");
    let cascade = SelectionCascade::new(Arc::clone(&source));

    let (abandoned, current) = tokio::join!(
        cascade.select_region(Some(RegionCode::new("CE"))),
        async {
            let refresh = cascade.select_region(Some(RegionCode::new("SP"))).await;
            release_ce.send(()).expect("CE request still waiting");
            refresh
        }
    );

    assert_eq!(abandoned, Refresh::Stale);
    assert_eq!(current, Refresh::Applied);
    assert_eq!(cascade.selection().region, Some(RegionCode::new("SP")));
    assert_eq!(names(&cascade.localities()), ["Campinas"]);
}

#[tokio::test]
async fn clearing_region_cancels_outstanding_locality_fetch() {
    let source = Arc::new(FakeSource::ceara());
    let release_ce = source.hold("localities/CE");
    let cascade = SelectionCascade::new(Arc::clone(&source));

    let (abandoned, cleared) = tokio::join!(
        cascade.select_region(Some(RegionCode::new("CE"))),
        async {
            let refresh = cascade.select_region(None).await;
            release_ce.send(()).expect("CE request still waiting");
            refresh
        }
    );

    assert_eq!(abandoned, Refresh::Stale);
    assert_eq!(cleared, Refresh::Skipped);
    assert!(cascade.localities().is_empty());
    assert_eq!(cascade.selection().region, None);
}

#[tokio::test]
async fn repeated_choice_while_in_flight_is_skipped() {
    let source = Arc::new(FakeSource::ceara());
    let release_ce = source.hold("localities/CE");
    let cascade = SelectionCascade::new(Arc::clone(&source));

    let (first, second) = tokio::join!(cascade.select_region(Some(RegionCode::new("CE"))), async {
        let refresh = cascade.select_region(Some(RegionCode::new("CE"))).await;
        release_ce.send(()).expect("CE request still waiting");
        refresh
    });

    assert_eq!(first, Refresh::Applied);
    assert_eq!(second, Refresh::Skipped);
    assert_eq!(source.calls("localities/CE"), 1);
    assert_eq!(names(&cascade.localities()), ["Fortaleza", "Sobral"]);
}

#[tokio::test]
async fn locality_choice_waits_for_the_region_list() {
    let source = Arc::new(FakeSource::ceara());
    let release_ce = source.hold("localities/CE");
    let cascade = SelectionCascade::new(Arc::clone(&source));

    let (refresh, early) = tokio::join!(cascade.select_region(Some(RegionCode::new("CE"))), async {
        let early = cascade.select_locality("Campinas");
        release_ce.send(()).expect("CE request still waiting");
        early
    });

    assert!(matches!(early, Err(DiscoveryError::InvalidTransition { .. })));
    assert_eq!(refresh, Refresh::Applied);
    assert_eq!(cascade.selection().locality, None);
    assert!(cascade.ready_criteria().is_err());

    assert!(cascade.select_locality("Campinas").is_err(), "checked against the loaded list");
    cascade.select_locality("Sobral").expect("CE locality");
    assert_eq!(cascade.ready_criteria().expect("ready").region, RegionCode::new("CE"));
}
