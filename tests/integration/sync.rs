//! Upsert synchronization against a mock address store.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::common::MockProffix;
use proffix_rest::api::{SyncOutcome, SyncRecord};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, Request, ResponseTemplate};

type Store = Arc<Mutex<BTreeMap<String, Value>>>;

fn key_from_path(request: &Request) -> String {
    request
        .url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_string()
}

/// Addresses kept in memory. New records get numbers from 1000 upwards;
/// records without `Name` are rejected.
async fn mount_store(px: &MockProffix) -> Store {
    let store: Store = Arc::default();

    let reader = Arc::clone(&store);
    Mock::given(method("GET"))
        .and(path_regex(r"^/pxapi/v4/ADR/Adresse/[^/]+$"))
        .respond_with(move |request: &Request| {
            match reader.lock().unwrap().get(&key_from_path(request)) {
                Some(record) => ResponseTemplate::new(200).set_body_json(record),
                None => ResponseTemplate::new(404).set_body_json(json!({
                    "Type": "NOT_FOUND",
                    "Message": "Adresse nicht gefunden"
                })),
            }
        })
        .mount(&px.server)
        .await;

    let creator = Arc::clone(&store);
    let base = px.uri();
    Mock::given(method("POST"))
        .and(path("/pxapi/v4/ADR/Adresse"))
        .respond_with(move |request: &Request| {
            let record: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
            if record.get("Name").is_none() {
                return ResponseTemplate::new(400).set_body_json(json!({
                    "Type": "INVALID_FIELDS",
                    "Message": "Ungültige Felder",
                    "Fields": [{"Reason": "EMPTY", "Name": "Name", "Message": "Name fehlt"}]
                }));
            }

            let mut store = creator.lock().unwrap();
            let key = match record.get("AdressNr") {
                Some(Value::Number(n)) => n.to_string(),
                _ => (1000 + store.len()).to_string(),
            };
            store.insert(key.clone(), record);
            ResponseTemplate::new(201).insert_header("Location", format!("{base}/pxapi/v4/ADR/Adresse/{key}"))
        })
        .mount(&px.server)
        .await;

    let updater = Arc::clone(&store);
    Mock::given(method("PUT"))
        .and(path_regex(r"^/pxapi/v4/ADR/Adresse/[^/]+$"))
        .respond_with(move |request: &Request| {
            let record: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
            updater.lock().unwrap().insert(key_from_path(request), record);
            ResponseTemplate::new(204)
        })
        .mount(&px.server)
        .await;

    store
}

#[tokio::test]
async fn test_sync_same_key_twice_never_duplicates() {
    let px = MockProffix::start().await;
    let store = mount_store(&px).await;
    let client = px.client();

    let first = client
        .sync("ADR/Adresse", "ADR/Adresse", "77", &json!({"AdressNr": 77, "Name": "Muster AG"}))
        .await
        .unwrap();
    let second = client
        .sync("ADR/Adresse", "ADR/Adresse", "77", &json!({"AdressNr": 77, "Name": "Muster AG, Bern"}))
        .await
        .unwrap();

    assert_eq!(first, SyncOutcome::Created("77".into()));
    assert_eq!(second, SyncOutcome::Updated("77".into()));

    let store = store.lock().unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store["77"]["Name"], "Muster AG, Bern");
}

#[tokio::test]
async fn test_sync_batch_mixed_collection() {
    let px = MockProffix::start().await;
    let store = mount_store(&px).await;
    store
        .lock()
        .unwrap()
        .insert("1".into(), json!({"AdressNr": 1, "Name": "Alt"}));

    let client = px.client();
    let data = serde_json::to_vec(&json!([
        {"AdressNr": 1, "Name": "Neu"},
        {"AdressNr": 2, "Name": "Zwei"},
        {"AdressNr": 3},
        {"AdressNr": "", "Name": "Ohne Nummer"},
        {"AdressNr": 5, "Name": "Fünf"}
    ]))
    .unwrap();

    let report = client
        .sync_batch_json("ADR/Adresse", "AdressNr", false, &data)
        .await
        .unwrap();

    assert_eq!(report.total, 5);
    assert_eq!(
        report.created.len() + report.updated.len() + report.failed.len(),
        report.total
    );
    assert_eq!(report.updated, vec!["1".to_string()]);
    assert_eq!(
        report.created,
        vec!["2".to_string(), "1002".to_string(), "5".to_string()]
    );
    assert_eq!(report.failed, vec!["3".to_string()]);
    assert_eq!(report.errors, vec!["Ungültige Felder (Name)".to_string()]);

    // The failing record did not stop the last one.
    assert!(store.lock().unwrap().contains_key("5"));
}

#[tokio::test]
async fn test_sync_batch_remove_key_on_create() {
    let px = MockProffix::start().await;
    let store = mount_store(&px).await;
    let client = px.client();

    let records = vec![
        SyncRecord::from_value("AdressNr", json!({"AdressNr": 9, "Name": "Neun"})).unwrap(),
        SyncRecord::from_value("AdressNr", json!({"AdressNr": 10, "Name": "Zehn"})).unwrap(),
    ];

    let report = client.sync_batch("ADR/Adresse", true, records).await;

    assert_eq!(report.created, vec!["1000".to_string(), "1001".to_string()]);
    assert!(report.failed.is_empty());

    let store = store.lock().unwrap();
    assert!(store.values().all(|record| record.get("AdressNr").is_none()));
}
