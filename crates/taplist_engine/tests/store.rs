use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use taplist_core::{AvailabilityError, AvailabilityRecord, BeerKey};
use taplist_engine::{
    load_availability, toggle_availability, AvailabilityStore, MemoryAvailabilityStore,
    RestAvailabilityStore, StoreError,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn key() -> BeerKey {
    BeerKey::new("Brewer A", "Golden")
}

fn at(minute: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 6, 18, minute, 0).unwrap()
}

fn rest_store(server: &MockServer) -> RestAvailabilityStore {
    RestAvailabilityStore::new(&server.uri(), "anon-key", "beer_availability").unwrap()
}

#[tokio::test]
async fn double_toggle_restores_flag_with_increasing_timestamps() {
    let store = MemoryAvailabilityStore::new();
    let now = at(0);

    let first = toggle_availability(Some(&store), &key(), "user_aaaaaaaaa", now)
        .await
        .unwrap();
    let second = toggle_availability(Some(&store), &key(), "user_bbbbbbbbb", now)
        .await
        .unwrap();

    assert!(first.is_available);
    assert!(!second.is_available);
    assert!(second.updated_at > first.updated_at);
    assert_eq!(store.get(&key()).await.unwrap(), Some(second));
}

#[tokio::test]
async fn toggle_reads_store_truth_not_a_stale_cache() {
    let store = MemoryAvailabilityStore::with_records([(
        key(),
        AvailabilityRecord {
            is_available: true,
            updated_by: "user_other0000".into(),
            updated_at: at(5),
        },
    )]);

    let written = toggle_availability(Some(&store), &key(), "user_aaaaaaaaa", at(10))
        .await
        .unwrap();
    assert!(!written.is_available);
    assert_eq!(written.updated_by, "user_aaaaaaaaa");
    assert_eq!(written.updated_at, at(10));

    let map = load_availability(Some(&store)).await.unwrap();
    assert!(!map.is_available(&key()));
    assert_eq!(map.len(), 1);
}

#[tokio::test]
async fn missing_store_is_not_configured() {
    assert_eq!(
        load_availability(None).await.unwrap_err(),
        StoreError::NotConfigured
    );
    let err = toggle_availability(None, &key(), "user_aaaaaaaaa", at(0))
        .await
        .unwrap_err();
    assert!(err.is_unavailable());
    assert!(matches!(
        AvailabilityError::from(err),
        AvailabilityError::Unavailable(_)
    ));
}

#[tokio::test]
async fn memory_store_enforces_insert_and_update_paths() {
    let store = MemoryAvailabilityStore::new();
    let record = AvailabilityRecord {
        is_available: true,
        updated_by: "user_aaaaaaaaa".into(),
        updated_at: at(0),
    };

    assert!(matches!(
        store.update(&key(), &record).await,
        Err(StoreError::WriteRejected(_))
    ));
    store.insert(&key(), &record).await.unwrap();
    assert!(matches!(
        store.insert(&key(), &record).await,
        Err(StoreError::WriteRejected(_))
    ));
}

#[tokio::test]
async fn rest_store_loads_all_rows_with_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/beer_availability"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .and(query_param(
            "select",
            "brewery,beer_name,is_available,updated_by,updated_at",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "brewery": "Brewer A",
                "beer_name": "Golden",
                "is_available": true,
                "updated_by": "user_aaaaaaaaa",
                "updated_at": "2024-08-06T18:02:00+00:00"
            },
            {
                "brewery": "Brewer B",
                "beer_name": "Night Shade",
                "is_available": false,
                "updated_by": "user_bbbbbbbbb",
                "updated_at": "2024-08-06T18:03:00Z"
            }
        ])))
        .mount(&server)
        .await;

    let store = rest_store(&server);
    let map = load_availability(Some(&store)).await.unwrap();

    assert_eq!(map.len(), 2);
    assert_eq!(map.last_seen(&key()), Some(at(2)));
    assert!(!map.is_available(&BeerKey::new("Brewer B", "Night Shade")));
}

#[tokio::test]
async fn rest_toggle_inserts_missing_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/beer_availability"))
        .and(query_param("brewery", "eq.Brewer A"))
        .and(query_param("beer_name", "eq.Golden"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/beer_availability"))
        .and(body_json(json!([{
            "brewery": "Brewer A",
            "beer_name": "Golden",
            "is_available": true,
            "updated_by": "user_aaaaaaaaa",
            "updated_at": "2024-08-06T18:07:00Z"
        }])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let store = rest_store(&server);
    let written = toggle_availability(Some(&store), &key(), "user_aaaaaaaaa", at(7))
        .await
        .unwrap();
    assert!(written.is_available);
}

#[tokio::test]
async fn rest_toggle_updates_existing_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/beer_availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "brewery": "Brewer A",
            "beer_name": "Golden",
            "is_available": true,
            "updated_by": "user_bbbbbbbbb",
            "updated_at": "2024-08-06T18:07:00Z"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/beer_availability"))
        .and(query_param("brewery", "eq.Brewer A"))
        .and(header("prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "brewery": "Brewer A",
            "beer_name": "Golden",
            "is_available": false,
            "updated_by": "user_aaaaaaaaa",
            "updated_at": "2024-08-06T18:07:00.001Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let store = rest_store(&server);
    // Clock behind the stored stamp: the write must still move forward.
    let written = toggle_availability(Some(&store), &key(), "user_aaaaaaaaa", at(1))
        .await
        .unwrap();
    assert!(!written.is_available);
    assert!(written.updated_at > at(7));
}

#[tokio::test]
async fn rest_update_matching_nothing_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/beer_availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let record = AvailabilityRecord {
        is_available: true,
        updated_by: "user_aaaaaaaaa".into(),
        updated_at: at(0),
    };
    let err = rest_store(&server).update(&key(), &record).await.unwrap_err();
    assert!(matches!(err, StoreError::WriteRejected(_)));
    assert!(matches!(
        AvailabilityError::from(err),
        AvailabilityError::WriteFailed(_)
    ));
}

#[tokio::test]
async fn rest_server_error_marks_store_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = load_availability(Some(&rest_store(&server)))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::Http {
            status: 503,
            body: "maintenance".into()
        }
    );
    assert!(err.is_unavailable());
}
