// ABOUTME: End-to-end payment flow tests over the HTTP router with the mock gateway
// ABOUTME: Charge creation, signed webhooks, idempotency, and subscription activation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use trenera_server::routes;
use uuid::Uuid;

/// Drive a purchase through charge creation and return its payment id
async fn create_charge(app: &axum::Router, client_id: Uuid, package_id: &str) -> String {
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/v1/payments/create",
            &json!({ "client_id": client_id, "package_id": package_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::response_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert!(body["data"]["qr_code"].as_str().is_some());
    assert!(body["data"]["deeplink"].as_str().is_some());
    body["data"]["payment_id"].as_str().unwrap().to_owned()
}

/// Webhook payload the gateway would send for a paid charge
fn paid_webhook(payment_id: &str) -> serde_json::Value {
    let mut payload = json!({
        "payment_id": payment_id,
        "payment_status": "Processed",
        "transaction_id": "txn-123",
    });
    common::sign_webhook_payload(&mut payload);
    payload
}

#[tokio::test]
async fn paid_webhook_activates_a_subscription() {
    let (resources, mock) = common::create_test_resources().await.unwrap();
    let app = routes::router(resources);
    let client_id = Uuid::new_v4();

    let payment_id = create_charge(&app, client_id, "eight").await;

    // Gateway still reports the charge as pending.
    let response = app
        .clone()
        .oneshot(common::get_request(&format!("/api/v1/payments/{payment_id}/status")))
        .await
        .unwrap();
    let body = common::response_json(response).await;
    assert_eq!(body["data"]["payment_status"], json!("pending"));

    // The QR gets scanned...
    mock.mark_paid(&payment_id).await.unwrap();

    // ...and the gateway calls our webhook.
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/v1/payments/webhook",
            &paid_webhook(&payment_id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::response_json(response).await;
    assert_eq!(body["data"]["processed"], json!(true));
    assert!(body["data"]["subscription_id"].as_str().is_some());

    // The client now holds an active eight-session subscription.
    let response = app
        .clone()
        .oneshot(common::get_request(&format!("/api/v1/subscriptions/user/{client_id}")))
        .await
        .unwrap();
    let body = common::response_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["package_id"], json!("eight"));
    assert_eq!(body["data"]["sessions_remaining"], json!(8));
    assert_eq!(body["data"]["status"], json!("active"));
}

#[tokio::test]
async fn duplicate_webhook_is_acknowledged_without_a_second_purchase() {
    let (resources, mock) = common::create_test_resources().await.unwrap();
    let app = routes::router(resources.clone());
    let client_id = Uuid::new_v4();

    let payment_id = create_charge(&app, client_id, "eight").await;
    mock.mark_paid(&payment_id).await.unwrap();

    let webhook = paid_webhook(&payment_id);
    for round in 0..2 {
        let response = app
            .clone()
            .oneshot(common::json_request(
                "POST",
                "/api/v1/payments/webhook",
                &webhook,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "round {round}");
    }

    // One purchase on record, not two.
    let history = resources.ledger.history(client_id).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn webhook_with_bad_signature_is_rejected() {
    let (resources, mock) = common::create_test_resources().await.unwrap();
    let app = routes::router(resources.clone());
    let client_id = Uuid::new_v4();

    let payment_id = create_charge(&app, client_id, "eight").await;
    mock.mark_paid(&payment_id).await.unwrap();

    // Sign, then flip a field without resigning.
    let mut tampered = paid_webhook(&payment_id);
    tampered["payment_status"] = json!("Cancelled");

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/v1/payments/webhook",
            &tampered,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::response_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["code"], json!("SIGNATURE_MISMATCH"));

    // A missing signature is rejected the same way.
    let unsigned = json!({ "payment_id": payment_id, "payment_status": "Processed" });
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/v1/payments/webhook",
            &unsigned,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Nothing was activated.
    let history = resources.ledger.history(client_id).await.unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn webhook_for_unknown_order_is_not_found() {
    let (resources, _mock) = common::create_test_resources().await.unwrap();
    let app = routes::router(resources);

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/v1/payments/webhook",
            &paid_webhook("pay_nonexistent"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn use_session_and_history_round_trip_over_http() {
    let (resources, mock) = common::create_test_resources().await.unwrap();
    let app = routes::router(resources);
    let client_id = Uuid::new_v4();

    let payment_id = create_charge(&app, client_id, "eight").await;
    mock.mark_paid(&payment_id).await.unwrap();
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/v1/payments/webhook",
            &paid_webhook(&payment_id),
        ))
        .await
        .unwrap();
    let body = common::response_json(response).await;
    let subscription_id = body["data"]["subscription_id"].as_str().unwrap().to_owned();

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            &format!("/api/v1/subscriptions/{subscription_id}/use-session"),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::response_json(response).await;
    assert_eq!(body["data"]["sessions_remaining"], json!(7));
    assert_eq!(body["data"]["is_unlimited"], json!(false));

    let response = app
        .clone()
        .oneshot(common::get_request(&format!("/api/v1/subscriptions/user/{client_id}/history")))
        .await
        .unwrap();
    let body = common::response_json(response).await;
    assert_eq!(body["data"][0]["package_id"], json!("eight"));
    assert_eq!(body["data"][0]["sessions"], json!(8));
}

#[tokio::test]
async fn cancelling_a_pending_charge_closes_the_order() {
    let (resources, _mock) = common::create_test_resources().await.unwrap();
    let app = routes::router(resources.clone());
    let client_id = Uuid::new_v4();

    let payment_id = create_charge(&app, client_id, "single").await;

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            &format!("/api/v1/payments/{payment_id}/cancel"),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::response_json(response).await;
    assert_eq!(body["data"]["ok"], json!(true));

    // No subscription was ever created for the client.
    let response = app
        .clone()
        .oneshot(common::get_request(&format!("/api/v1/subscriptions/user/{client_id}")))
        .await
        .unwrap();
    let body = common::response_json(response).await;
    assert_eq!(body["data"], serde_json::Value::Null);
    assert_eq!(body["message"], json!("No active subscription"));
}

#[tokio::test]
async fn purchasing_an_unknown_package_is_rejected() {
    let (resources, _mock) = common::create_test_resources().await.unwrap();
    let app = routes::router(resources);

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/v1/payments/create",
            &json!({ "client_id": Uuid::new_v4(), "package_id": "gold-tier" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = common::response_json(response).await;
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn catalog_listing_matches_the_static_catalog() {
    let (resources, _mock) = common::create_test_resources().await.unwrap();
    let app = routes::router(resources);

    let response = app
        .oneshot(common::get_request("/api/v1/packages"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::response_json(response).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), trenera_core::catalog::all().len());
    assert_eq!(data[0]["id"], json!("single"));
    assert_eq!(data.last().unwrap()["sessions"], json!(-1));
}
