//! Locator flows against a mocked PostgREST backend.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bookshare_api_client::{BookshareClient, ClientConfig};
use bookshare_geo::{haversine_distance, Coordinate};
use bookshare_locator::prelude::*;
use bookshare_locator::placement::PlacementSource;

const CAMPUS: Coordinate = Coordinate::new(40.7128, -74.0060);

fn client(server: &MockServer) -> BookshareClient {
    let config = ClientConfig::development()
        .with_project_url(server.uri())
        .with_anon_key("anon-test-key");
    BookshareClient::with_config(config).expect("failed to build test client")
}

fn locator(
    server: &MockServer,
    notifier: Arc<RecordingNotifier>,
) -> ProximityLocator<StaticProvider, bookshare_api_client::endpoints::BooksApi> {
    let books = client(server).books();
    ProximityLocator::new(
        LocationResolver::new(StaticProvider::at(CAMPUS), notifier.clone()),
        ListingFetcher::new(books, notifier.clone()).with_options(FetchOptions::newest_first()),
        MapSurface::new(backend_for(MapBackendKind::Leaflet), notifier),
    )
    .with_placement(PlacementPolicy::Synthetic {
        seed: 7,
        spread_km: 4.0,
    })
}

async fn mount_books(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/books"))
        .and(query_param("status", "eq.active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "stored",
                "title": "Organic Chemistry",
                "author": "Clayden",
                "listing_type": "sell",
                "price": 45,
                "latitude": 40.7200,
                "longitude": -74.0000
            },
            {
                "id": "far",
                "title": "Constitutional Law",
                "author": "Chemerinsky",
                "listing_type": "exchange",
                "location_point": {"type": "Point", "coordinates": [-118.2437, 34.0522]}
            },
            {
                "id": "unplaced",
                "title": "Physiology",
                "author": "Guyton",
                "listing_type": "free"
            }
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn refresh_places_filters_and_draws() {
    let server = MockServer::start().await;
    mount_books(&server).await;

    let notifier = Arc::new(RecordingNotifier::new());
    let mut locator = locator(&server, notifier.clone());

    assert_eq!(locator.refresh().await.unwrap(), Outcome::Applied);
    assert_eq!(locator.listings().len(), 3);

    let ids: Vec<&str> = locator.nearby().iter().map(NearbyListing::id).collect();
    assert!(ids.contains(&"stored"));
    assert!(ids.contains(&"unplaced"));
    assert!(!ids.contains(&"far"));

    let unplaced = locator
        .nearby()
        .iter()
        .find(|hit| hit.id() == "unplaced")
        .unwrap();
    assert_eq!(unplaced.placed.source, PlacementSource::Synthetic);
    assert!(haversine_distance(&CAMPUS, &unplaced.placed.coordinate) <= 4.0 + 1e-9);

    let id_count = ids.len();
    let doc = locator.render().unwrap();
    assert_eq!(doc["markers"].as_array().map(Vec::len), Some(id_count));
    assert_eq!(notifier.titles(), vec!["Location Found"]);
}

#[tokio::test]
async fn placement_is_stable_across_refreshes() {
    let server = MockServer::start().await;
    mount_books(&server).await;

    let notifier = Arc::new(RecordingNotifier::new());
    let mut locator = locator(&server, notifier);

    locator.refresh().await.unwrap();
    let first: Vec<(String, Coordinate)> = locator
        .nearby()
        .iter()
        .map(|hit| (hit.id().to_string(), hit.placed.coordinate))
        .collect();

    locator.reload_listings().await.unwrap();
    let second: Vec<(String, Coordinate)> = locator
        .nearby()
        .iter()
        .map(|hit| (hit.id().to_string(), hit.placed.coordinate))
        .collect();

    assert_eq!(first, second);
}

#[tokio::test]
async fn backend_failure_shows_no_listings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/books"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::new());
    let mut locator = locator(&server, notifier.clone());

    assert_eq!(locator.refresh().await.unwrap(), Outcome::Applied);
    assert!(locator.listings().is_empty());
    assert!(locator.nearby().is_empty());
    assert_eq!(locator.location().map(|l| l.source), Some(LocationSource::Device));
    assert_eq!(notifier.count_titled("Error fetching books"), 1);
}
