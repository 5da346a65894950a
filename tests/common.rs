// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides database, resources, and signed-webhook helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `trenera_server` integration tests

use anyhow::Result;
use std::sync::{Arc, Once};
use trenera_server::{
    config::{DatabaseConfig, DatabaseUrl, Environment, GatewayConfig, ServerConfig},
    context::ServerResources,
    database_plugins::{factory::Database, DatabaseProvider},
    payments::{signature, MockGateway, PaymentGateway},
};

/// Shared secret used by signed-webhook tests
pub const TEST_SHARED_SECRET: &str = "test-shared-secret";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard in-memory test database
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    let database = Arc::new(Database::new("sqlite::memory:").await?);
    Ok(database)
}

/// Test configuration wired for the mock gateway
pub fn create_test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        environment: Environment::Testing,
        database: DatabaseConfig {
            url: DatabaseUrl::Memory,
        },
        gateway: GatewayConfig {
            shared_secret: TEST_SHARED_SECRET.into(),
            use_mock: true,
            ..GatewayConfig::default()
        },
        cors_allowed_origins: String::new(),
    }
}

/// Full server resources over an in-memory database and the mock gateway.
///
/// Returns the concrete mock handle alongside, so tests can drive charges
/// to `Paid` the way a scanned QR would.
pub async fn create_test_resources() -> Result<(Arc<ServerResources>, Arc<MockGateway>)> {
    let database = create_test_database().await?;
    let mock = Arc::new(MockGateway::new());
    let gateway: Arc<dyn PaymentGateway> = mock.clone();
    let resources = Arc::new(ServerResources::new(
        database,
        gateway,
        Arc::new(create_test_config()),
    ));
    Ok((resources, mock))
}

/// Sign a webhook payload in place with the test shared secret
pub fn sign_webhook_payload(payload: &mut serde_json::Value) {
    let fields = signature::fields_from_json(payload);
    let sig = signature::sign(&fields, TEST_SHARED_SECRET);
    payload[signature::SIGNATURE_FIELD] = serde_json::Value::String(sig);
}

/// Build a JSON POST request for router tests
pub fn json_request(
    method: &str,
    uri: &str,
    body: &serde_json::Value,
) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

/// Build a bodyless GET request for router tests
pub fn get_request(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

/// Read a response body back as JSON
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
