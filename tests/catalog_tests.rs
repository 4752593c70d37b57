//! Catalog browsing and rating through the gateway seam, mirroring the
//! `wines` subcommand flows.

use std::sync::Arc;

use decanter::application::SessionStore;
use decanter::domain::WineId;
use decanter::error::Error;
use decanter::port::outbound::gateway::{CatalogGateway, WineRecord};
use decanter::testkit::{GatewayCall, MemoryCredentialStore, MockGateway};

fn wine(id: &str, name: &str) -> WineRecord {
    WineRecord {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        winery: None,
        year: None,
        price: None,
        rating: None,
    }
}

#[tokio::test]
async fn wine_of_month_returns_the_featured_record() {
    let gateway = MockGateway::new();
    gateway.set_wines(vec![wine("w1", "Gran Reserva"), wine("w2", "Crianza")]);

    let featured = gateway.wine_of_month().await.unwrap();

    assert_eq!(featured.id.as_deref(), Some("w1"));
    assert_eq!(featured.name.as_deref(), Some("Gran Reserva"));
}

#[tokio::test]
async fn lookup_finds_records_parsed_from_legacy_field_names() {
    // Records decoded from the backend's Spanish-era field names remain
    // addressable by their numeric id.
    let record: WineRecord = serde_json::from_str(
        r#"{"id": 7, "nombre": "Malbec", "bodega": "Finca Sur", "anio_cosecha": 2019}"#,
    )
    .unwrap();
    let gateway = MockGateway::new();
    gateway.set_wines(vec![record]);

    let found = gateway.wine_by_id(&WineId::from("7")).await.unwrap();

    assert_eq!(found.name.as_deref(), Some("Malbec"));
    assert_eq!(found.winery.as_deref(), Some("Finca Sur"));
    assert_eq!(found.year, Some(2019));
}

#[tokio::test]
async fn unknown_wine_id_surfaces_a_remote_error() {
    let gateway = MockGateway::new();
    gateway.set_wines(vec![wine("w1", "Gran Reserva")]);

    let err = gateway.wine_by_id(&WineId::from("missing")).await.unwrap_err();

    match err {
        Error::Remote(remote) => assert_eq!(remote.status, 404),
        other => panic!("expected RemoteError, got {other:?}"),
    }
}

#[tokio::test]
async fn rating_uses_the_session_token_and_records_the_score() {
    let gateway = Arc::new(MockGateway::new());
    let store = Arc::new(MemoryCredentialStore::new());
    let session = SessionStore::new(Arc::clone(&gateway), store);
    session.recover().await;
    session.login("taster@example.com", "secret").await.unwrap();

    let token = session.token().unwrap();
    gateway
        .rate_wine(&WineId::from("w1"), 4, "balanced", &token)
        .await
        .unwrap();

    assert!(gateway.calls().contains(&GatewayCall::RateWine {
        id: WineId::from("w1"),
        score: 4,
    }));
}
