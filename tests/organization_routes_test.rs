// ABOUTME: Integration tests for the organization registration endpoint
// ABOUTME: Field-error maps for incomplete drafts and persistence of accepted ones
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use trenera_server::database_plugins::DatabaseProvider;
use trenera_server::routes;
use uuid::Uuid;

fn complete_draft() -> serde_json::Value {
    json!({
        "name": "Iron Temple",
        "org_type": "gym",
        "description": "Strength and conditioning",
        "specializations": ["strength"],
        "packages": [{
            "name": "8 group sessions",
            "description": "Morning classes",
            "price": 24000,
            "currency": "KZT",
            "duration_days": 30,
            "session_count": 8,
            "features": ["Towels included"],
            "popular": true
        }],
        "contact": {
            "phones": ["+7 701 000 00 00"],
            "emails": ["front@irontemple.kz"]
        },
        "location": {
            "city": "Almaty",
            "address": "Abay ave 10"
        }
    })
}

#[tokio::test]
async fn incomplete_draft_returns_field_errors() {
    let (resources, _mock) = common::create_test_resources().await.unwrap();
    let app = routes::router(resources);

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/v1/organizations/register",
            &json!({ "name": "", "specializations": [] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::response_json(response).await;
    assert_eq!(body["success"], json!(false));
    let field_errors = body["field_errors"].as_object().unwrap();
    assert!(field_errors.contains_key("name"));
    assert!(field_errors.contains_key("organization_type"));
    assert!(field_errors.contains_key("phones"));
    assert!(field_errors.contains_key("city"));
    assert!(field_errors.contains_key("packages"));
}

#[tokio::test]
async fn complete_draft_registers_and_persists_the_organization() {
    let (resources, _mock) = common::create_test_resources().await.unwrap();
    let app = routes::router(resources.clone());

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/v1/organizations/register",
            &complete_draft(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = common::response_json(response).await;
    assert_eq!(body["success"], json!(true));
    let organization_id: Uuid = body["organization_id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let stored = resources
        .database
        .get_organization(organization_id)
        .await
        .unwrap()
        .expect("organization should be stored");
    assert_eq!(stored.name, "Iron Temple");
    assert_eq!(stored.location.city, "Almaty");
    assert_eq!(stored.packages.len(), 1);
    assert_eq!(stored.packages[0].price, 24_000);
    // Defaults fill the sections the draft never touched.
    assert_eq!(stored.working_hours.open_time, "08:00");
}

#[tokio::test]
async fn draft_with_unsupported_city_is_rejected() {
    let (resources, _mock) = common::create_test_resources().await.unwrap();
    let app = routes::router(resources);

    let mut draft = complete_draft();
    draft["location"]["city"] = json!("Gotham");

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/v1/organizations/register",
            &draft,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::response_json(response).await;
    let field_errors = body["field_errors"].as_object().unwrap();
    assert_eq!(field_errors.len(), 1);
    assert!(field_errors.contains_key("city"));
}
