//! Batch retrieval against a mock listing of addresses.

use super::common::MockProffix;
use proffix_rest::api::{BatchResult, ErrorKind};
use proffix_rest::client::Query;
use serde::Deserialize;
use wiremock::matchers::{method, path};
use wiremock::{Mock, Request, ResponseTemplate};

const ADDRESSES: &str = "/pxapi/v4/ADR/Adresse";

#[derive(Debug, Deserialize)]
struct Address {
    #[serde(rename = "AdressNr")]
    number: usize,
    #[serde(rename = "Name")]
    name: String,
}

fn query_value(request: &Request, name: &str) -> Option<usize> {
    request
        .url
        .query_pairs()
        .find(|(key, _)| key == name)
        .and_then(|(_, value)| value.parse().ok())
}

/// Serve `total` addresses honoring `Limit` and `Offset`.
async fn mount_listing(px: &MockProffix, total: usize) {
    Mock::given(method("GET"))
        .and(path(ADDRESSES))
        .respond_with(move |request: &Request| {
            let limit = query_value(request, "Limit").unwrap_or(total);
            let offset = query_value(request, "Offset").unwrap_or(0);
            let page: Vec<serde_json::Value> = (offset..total.min(offset + limit))
                .map(|n| {
                    serde_json::json!({
                        "AdressNr": n + 1,
                        // Item text that would break naive array splicing.
                        "Name": format!("Firma ][ {}", n + 1)
                    })
                })
                .collect();

            ResponseTemplate::new(200)
                .insert_header("PxMetadata", format!(r#"{{"FilteredCount":{total}}}"#))
                .set_body_json(page)
        })
        .mount(&px.server)
        .await;
}

fn numbers(batch: &BatchResult) -> Vec<usize> {
    batch
        .deserialize::<Address>()
        .unwrap()
        .into_iter()
        .map(|a| a.number)
        .collect()
}

#[tokio::test]
async fn test_batch_returns_every_record_for_any_batch_size() {
    let px = MockProffix::start().await;
    mount_listing(&px, 45).await;
    let client = px.client();

    for batch_size in [1, 7, 10, 44, 45, 46, 200] {
        let batch = client
            .get_batch("ADR/Adresse", Query::new(), Some(batch_size))
            .await
            .unwrap();

        assert_eq!(batch.total, 45, "batch size {batch_size}");
        assert_eq!(numbers(&batch), (1..=45).collect::<Vec<_>>(), "batch size {batch_size}");
    }
}

#[tokio::test]
async fn test_batch_request_count() {
    let px = MockProffix::start().await;
    mount_listing(&px, 450).await;
    let client = px.client();

    let batch = client.get_batch("ADR/Adresse", Query::new(), None).await.unwrap();
    assert_eq!(batch.total, 450);
    assert_eq!(px.count("GET", ADDRESSES).await, 3);

    let batch = client
        .get_batch("ADR/Adresse", Query::new(), Some(1000))
        .await
        .unwrap();
    assert_eq!(batch.total, 450);
    assert_eq!(px.count("GET", ADDRESSES).await, 4);
}

#[tokio::test]
async fn test_batch_items_survive_bracket_text() {
    let px = MockProffix::start().await;
    mount_listing(&px, 5).await;

    let batch = px
        .client()
        .get_batch("ADR/Adresse", Query::new(), Some(2))
        .await
        .unwrap();

    let addresses: Vec<Address> = batch.deserialize().unwrap();
    assert_eq!(addresses[4].name, "Firma ][ 5");

    let bytes = batch.to_json_bytes().unwrap();
    let reparsed: Vec<serde_json::Value> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(reparsed.len(), 5);
}

#[tokio::test]
async fn test_batch_shrinking_listing_is_reported() {
    let px = MockProffix::start().await;

    // Claims 10 records but only ever has 3.
    Mock::given(method("GET"))
        .and(path(ADDRESSES))
        .respond_with(|request: &Request| {
            let offset = query_value(request, "Offset").unwrap_or(0);
            let page: Vec<serde_json::Value> = (offset..3.max(offset))
                .take(query_value(request, "Limit").unwrap_or(3))
                .map(|n| serde_json::json!({"AdressNr": n + 1, "Name": "x"}))
                .collect();
            ResponseTemplate::new(200)
                .insert_header("PxMetadata", r#"{"FilteredCount":10}"#)
                .set_body_json(page)
        })
        .mount(&px.server)
        .await;

    let err = px
        .client()
        .get_batch("ADR/Adresse", Query::new(), Some(2))
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind,
        ErrorKind::InconsistentTotal {
            expected: 10,
            collected: 3
        }
    ));
}
