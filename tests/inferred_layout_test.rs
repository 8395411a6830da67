//! End-to-end tests for the schema-inferred parsing strategy.

use std::io::Write;
use std::sync::Arc;

use restware::prelude::*;
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: i64,
}

fn sample_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[tokio::test]
async fn inferred_success_path_drives_extraction() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"result": {"items": [{"id": 3}, {"id": 4}]}})),
        )
        .mount(&server)
        .await;

    let sample = sample_file(
        r#"{"result": {"items": [{"id": 0}]}, "problems": [{"msg": "sample"}]}"#,
    );
    let options = RequestOptions::new()
        .with_base_url(Arc::new(StaticUrl::new(server.uri())))
        .with_response_layout(sample.path(), "result>items", "problems")
        .unwrap();
    let client = RestClient::new(options).unwrap();

    let (users, envelope) = client
        .get_list::<User>(&RestRequest::new("users"))
        .await
        .unwrap();
    assert_eq!(users, vec![User { id: 3 }, User { id: 4 }]);
    assert!(envelope.is_success());
}

#[tokio::test]
async fn inferred_error_path_drives_the_envelope_error_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "problems": [{"msg": "quota exceeded"}, {"unrelated": true}]
        })))
        .mount(&server)
        .await;

    let sample = sample_file(
        r#"{"result": {"items": []}, "problems": [{"msg": "sample"}]}"#,
    );
    let options = RequestOptions::new()
        .with_base_url(Arc::new(StaticUrl::new(server.uri())))
        .with_response_layout(sample.path(), "result>items", "problems")
        .unwrap();
    let client = RestClient::new(options).unwrap();

    let request = RestRequest::new("users").with_body(json!({}));
    let envelope = client.post(&request).await.unwrap();
    assert!(envelope.is_client_error());
    assert_eq!(envelope.errors, vec!["quota exceeded"]);
}

#[tokio::test]
async fn plain_string_errors_pass_through_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"errors": {"details": ["boom"]}})),
        )
        .mount(&server)
        .await;

    let sample = json!({"data": null, "errors": {"details": ["x"]}});
    let layout = InferredLayout::from_sample(&sample, "data", "errors>details");
    let options = RequestOptions::new()
        .with_base_url(Arc::new(StaticUrl::new(server.uri())))
        .with_strategy(Arc::new(layout));
    let client = RestClient::new(options).unwrap();

    let request = RestRequest::new("users").with_body(json!({}));
    let envelope = client.post(&request).await.unwrap();
    assert_eq!(envelope.errors, vec!["boom"]);
}

#[tokio::test]
async fn inferred_strategy_travels_through_the_option_merge() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": [{"id": 2}]})))
        .mount(&server)
        .await;

    // Strategy configured globally; the request carries none of its own.
    let layout = InferredLayout::from_sample(&json!({"users": [{"id": 1}]}), "users", "errors");
    let global = RequestOptions::new()
        .with_base_url(Arc::new(StaticUrl::new(server.uri())))
        .with_strategy(Arc::new(layout));
    let client = RestClient::new(global).unwrap();

    let (users, _) = client
        .get_single_item::<Vec<User>>(&RestRequest::new("users"))
        .await
        .unwrap();
    assert_eq!(users, Some(vec![User { id: 2 }]));
}
