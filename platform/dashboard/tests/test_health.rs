use std::sync::Arc;

use dashboard::AppState;
use stockboard::config::Config;
use stockboard::data::{MockListingSource, MockMarketData};

#[tokio::test]
async fn health_check_works() {
    let address = spawn_app(Config::default());

    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{}/health", address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert_eq!("OK", response.text().await.unwrap());
}

#[tokio::test]
async fn index_returns_configured_title() {
    let address = spawn_app(Config {
        title: Some("KRX Dashboard".to_string()),
        ..Config::default()
    });

    let body: serde_json::Value = reqwest::get(format!("http://{}/", address))
        .await
        .expect("Failed to execute request.")
        .json()
        .await
        .unwrap();

    assert_eq!(body["title"], "KRX Dashboard");
}

#[tokio::test]
async fn resolve_without_query_is_rejected() {
    let address = spawn_app(Config::default());

    let response = reqwest::get(format!("http://{}/resolve?query=", address))
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

fn spawn_app(config: Config) -> std::net::SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();

    let state = AppState::new(
        &config,
        Arc::new(MockListingSource::new()),
        Arc::new(MockMarketData::new()),
    );

    let server = dashboard::run(listener, state).unwrap();
    tokio::spawn(server);

    address
}
