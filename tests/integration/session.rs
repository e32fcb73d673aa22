//! Session lifecycle against a mock server.

use super::common::{credentials, live_config, MockProffix, LOGIN_PATH, SESSION_TOKEN};
use proffix_rest::client::{ClientConfig, Options, Query, SessionState};
use proffix_rest::{ProffixClient, ProffixRestClient};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_full_session_lifecycle() {
    let px = MockProffix::start().await;

    Mock::given(method("GET"))
        .and(path("/pxapi/v4/ADR/Adresse/1"))
        .and(header("PxSessionId", SESSION_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"AdressNr": 1})))
        .mount(&px.server)
        .await;

    let client = px.client();
    let inner = client.inner();
    assert_eq!(inner.session_state(), SessionState::LoggedOut);
    assert_eq!(px.count("POST", LOGIN_PATH).await, 0);

    for _ in 0..3 {
        let address: serde_json::Value = inner.get_json("ADR/Adresse/1", Query::new()).await.unwrap();
        assert_eq!(address["AdressNr"], 1);
    }
    assert_eq!(px.count("POST", LOGIN_PATH).await, 1);

    assert_eq!(client.logout().await.unwrap(), Some(204));
    assert_eq!(client.logout().await.unwrap(), None);
    assert_eq!(px.count("DELETE", LOGIN_PATH).await, 1);

    // A request after logout logs in again.
    inner.get("ADR/Adresse/1", Query::new()).await.unwrap();
    assert_eq!(px.count("POST", LOGIN_PATH).await, 2);
    assert!(inner.is_logged_in());
}

#[tokio::test]
async fn test_session_shared_between_clients() {
    let px = MockProffix::start().await;

    Mock::given(method("GET"))
        .and(path("/pxapi/v4/ADR/Adresse"))
        .and(header("PxSessionId", "shared-by-service"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(2)
        .mount(&px.server)
        .await;

    let service = ProffixClient::new(px.config()).unwrap();
    service.service_login("shared-by-service");

    let api = ProffixRestClient::from_client(service.clone());
    api.inner().get("ADR/Adresse", Query::new()).await.unwrap();
    service.get("ADR/Adresse", Query::new()).await.unwrap();

    assert_eq!(px.count("POST", LOGIN_PATH).await, 0);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_session() {
    let px = MockProffix::start().await;

    Mock::given(method("GET"))
        .and(path("/pxapi/v4/ADR/Adresse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&px.server)
        .await;

    let client = px.client().inner().clone();
    client.ensure_session().await.unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.get("ADR/Adresse", Query::new()).await.map(|_| ()) })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(px.count("POST", LOGIN_PATH).await, 1);
    assert_eq!(client.session_id(), SESSION_TOKEN);
}

#[tokio::test]
async fn test_expired_session_is_renewed() {
    let px = MockProffix::start().await;

    let client = px.client();
    client.inner().service_login("expired");

    Mock::given(method("GET"))
        .and(path("/pxapi/v4/ADR/Adresse/1"))
        .and(header("PxSessionId", "expired"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "Type": "UNAUTHORIZED",
            "Message": "Session abgelaufen"
        })))
        .expect(1)
        .mount(&px.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pxapi/v4/ADR/Adresse/1"))
        .and(header("PxSessionId", SESSION_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"AdressNr": 1})))
        .expect(1)
        .mount(&px.server)
        .await;

    client.inner().get("ADR/Adresse/1", Query::new()).await.unwrap();
    assert_eq!(client.inner().session_id(), SESSION_TOKEN);
}

#[tokio::test]
async fn test_auto_logout_after_server_error() {
    let px = MockProffix::start().await;

    Mock::given(method("DELETE"))
        .and(path("/pxapi/v4/ADR/Adresse/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&px.server)
        .await;

    let client = px.client_with(Options::builder().with_auto_logout(true).build());
    let err = client.inner().delete("ADR/Adresse/1").await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(
        err.to_string(),
        "HTTP 500 on endpoint 'ADR/Adresse/1': Internal Server Error"
    );
    assert!(!client.inner().is_logged_in());
    assert_eq!(px.count("DELETE", LOGIN_PATH).await, 1);
}

#[tokio::test]
async fn test_custom_api_prefix_and_version() {
    let px = MockProffix::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/PRO/Login"))
        .respond_with(ResponseTemplate::new(201).insert_header("PxSessionId", "v3-token"))
        .expect(1)
        .mount(&px.server)
        .await;

    let options = Options::builder()
        .with_api_prefix("/api/")
        .with_api_version("v3")
        .build();
    let client = ProffixClient::new(ClientConfig::new(px.uri(), credentials()).with_options(options)).unwrap();

    client.ensure_session().await.unwrap();
    assert_eq!(client.base_url().path(), "/api/v3/");
    assert_eq!(client.session_id(), "v3-token");
}

#[tokio::test]
#[ignore = "requires a PROFFIX REST-API server (PX_URL)"]
async fn test_live_check_api() {
    let client = ProffixClient::new(live_config()).unwrap();

    let info = client.check_api(None).await.expect("check_api should succeed");
    assert!(!info.version.is_empty());

    assert_eq!(client.logout().await.unwrap(), Some(204));
}
