//! Hooks installed as a tower layer inside `HyperClient`.

use std::sync::{Arc, Mutex};

use assert2::{check, let_assert};
use roundhook::middleware::HookLayer;
use roundhook::{Hooks, HttpClient, HyperClient, Method, Request};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

/// Test that `with_hooks` applies before hooks to the wire request.
#[tokio::test]
async fn test_with_hooks_adds_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hooked"))
        .and(header("X-Tenant", "acme"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .with_hooks(Hooks::<()>::new().before(|mut request, ()| {
            request
                .headers_mut()
                .insert("X-Tenant".to_string(), "acme".to_string());
            request
        }))
        .build();

    let url = url::Url::parse(&format!("{}/hooked", mock_server.uri())).expect("url");
    let response = client
        .execute(Request::builder(Method::Get, url).build())
        .await
        .expect("response");

    assert!(response.is_success());
}

/// Test that layers run outermost-first: the first layer's before hook runs
/// first and its after hook runs last.
#[tokio::test]
async fn test_layer_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ordered"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let log = Arc::new(Mutex::new(Vec::new()));
    let hooks = |name: &'static str| {
        let (before, after) = (Arc::clone(&log), Arc::clone(&log));
        Hooks::<()>::new()
            .before(move |request, ()| {
                before.lock().expect("lock").push(format!("{name}:before"));
                request
            })
            .after(move |_, _, ()| {
                after.lock().expect("lock").push(format!("{name}:after"));
            })
    };

    let client = HyperClient::builder()
        .layer(HookLayer::new(hooks("outer")))
        .with_hooks(hooks("inner"))
        .build();

    let url = url::Url::parse(&format!("{}/ordered", mock_server.uri())).expect("url");
    let_assert!(Ok(response) = client.execute(Request::builder(Method::Get, url).build()).await);

    check!(response.status() == 204);
    check!(
        *log.lock().expect("lock")
            == ["outer:before", "inner:before", "inner:after", "outer:after"]
    );
}
