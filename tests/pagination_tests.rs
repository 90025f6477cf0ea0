//! Pagination behavior against a mock server: ordering, completeness, and
//! the no-partial-results guarantee.

mod common;

use common::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use azure_api_client::azure::request::{GraphRequest, RestRequest};
use azure_api_client::error::Error;

#[tokio::test]
async fn rest_collection_concatenates_pages_in_order() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    let first: Vec<_> = (0..50).map(subscription).collect();
    let second: Vec<_> = (50..63).map(subscription).collect();
    let next = format!("{}/subscriptions-page-2", server.uri());

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(first, "nextLink", Some(next))),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/subscriptions-page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(second, "nextLink", None)))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut client = test_client(&server, dir.path());

    let result = client
        .try_call_rest(&RestRequest::new("subscriptions").api_version("2020-01-01"))
        .await
        .unwrap();

    let items = result.as_collection().unwrap();
    assert_eq!(items.len(), 63);
    assert_eq!(items[0]["subscriptionId"], "sub-0");
    assert_eq!(items[49]["subscriptionId"], "sub-49");
    assert_eq!(items[50]["subscriptionId"], "sub-50");
    assert_eq!(items[62]["subscriptionId"], "sub-62");
}

#[tokio::test]
async fn graph_collection_follows_odata_next_link() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    let first = vec![json!({"id": "app-1"}), json!({"id": "app-2"})];
    let second = vec![json!({"id": "app-3"})];
    let next = format!("{}/v1.0/applications-next", server.uri());

    Mock::given(method("GET"))
        .and(path("/v1.0/applications"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(first, "@odata.nextLink", Some(next))),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1.0/applications-next"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(second, "@odata.nextLink", None)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut client = test_client(&server, dir.path());

    let result = client
        .try_call_graph(&GraphRequest::new("applications"))
        .await
        .unwrap();

    let items = result.as_collection().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[2]["id"], "app-3");
}

#[tokio::test]
async fn graph_filter_is_sent_url_encoded() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1.0/applications"))
        .and(query_param("$filter", "startswith(displayName,'s')"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"value": [{"displayName": "sales-portal"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut client = test_client(&server, dir.path());

    let result = client
        .try_call_graph(&GraphRequest::new("applications").filter("startswith(displayName,'s')"))
        .await
        .unwrap();

    assert_eq!(result.as_collection().unwrap().len(), 1);

    let requests = server.received_requests().await.unwrap();
    let query = requests
        .iter()
        .find(|request| request.url.path() == "/v1.0/applications")
        .and_then(|request| request.url.query())
        .unwrap()
        .to_string();
    assert!(query.contains("%2C%27s%27"), "raw query was {query}");
}

#[tokio::test]
async fn single_resource_body_returns_single() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path("/subscriptions/sub-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"subscriptionId": "sub-1", "state": "Enabled"})),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut client = test_client(&server, dir.path());

    let result = client
        .try_call_rest(&RestRequest::new("subscriptions/sub-1"))
        .await
        .unwrap();

    let body = result.as_single().unwrap();
    assert_eq!(body["state"], "Enabled");
}

#[tokio::test]
async fn empty_value_array_yields_empty_collection() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut client = test_client(&server, dir.path());

    let result = client
        .try_call_rest(&RestRequest::new("subscriptions"))
        .await
        .unwrap();

    assert_eq!(result.as_collection().unwrap().len(), 0);
}

#[tokio::test]
async fn failing_second_page_discards_partial_results() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    let first: Vec<_> = (0..5).map(subscription).collect();
    let next = format!("{}/subscriptions-page-2", server.uri());

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(first, "nextLink", Some(next))),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/subscriptions-page-2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut client = test_client(&server, dir.path());
    let request = RestRequest::new("subscriptions");

    let err = client.try_call_rest(&request).await.unwrap_err();
    match err {
        Error::Pagination(inner) => {
            assert!(matches!(*inner, Error::Transient { attempts: 3, .. }));
        }
        other => panic!("expected pagination error, got {other}"),
    }

    // The sentinel contract degrades the same failure to None, never a
    // truncated list.
    assert!(client.call_rest(&request).await.is_none());
}

#[tokio::test]
async fn service_error_body_fails_the_call() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"code": "AuthorizationFailed", "message": "no access"}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut client = test_client(&server, dir.path());

    let err = client
        .try_call_rest(&RestRequest::new("subscriptions"))
        .await
        .unwrap_err();

    match err {
        Error::Api { code, message } => {
            assert_eq!(code, "AuthorizationFailed");
            assert_eq!(message, "no access");
        }
        other => panic!("expected service error, got {other}"),
    }
}
