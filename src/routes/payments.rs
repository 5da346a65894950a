// ABOUTME: Payment route handlers for QR purchases and gateway webhooks
// ABOUTME: Charge creation, status polling, cancellation, and the signed payment webhook
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! Payment routes
//!
//! A purchase starts with `POST /payments/create`, which records a pending
//! payment order keyed by the gateway payment id. The gateway later calls the
//! webhook; a verified `Paid` status turns the order into a subscription
//! (superseding any active one). The webhook is idempotent — a duplicate
//! delivery for a completed order is acknowledged without a second purchase.

use super::ApiResponse;
use crate::context::ServerResources;
use crate::database::{PaymentOrder, PaymentOrderStatus};
use crate::database_plugins::DatabaseProvider;
use crate::errors::AppError;
use crate::payments::signature::{fields_from_json, verify, SIGNATURE_FIELD};
use crate::payments::{ChargeRequest, PaymentState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use trenera_core::catalog;
use uuid::Uuid;

/// Request body for creating a package purchase charge
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Purchasing client
    pub client_id: Uuid,
    /// Catalog package to purchase
    pub package_id: String,
}

/// Payment route handlers
pub struct PaymentRoutes;

impl PaymentRoutes {
    /// Create all payment routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/payments/create", post(Self::handle_create))
            .route("/payments/:payment_id/status", get(Self::handle_status))
            .route("/payments/:payment_id/cancel", post(Self::handle_cancel))
            .route("/payments/webhook", post(Self::handle_webhook))
            .with_state(resources)
    }

    /// Create a QR charge for a catalog package purchase
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<CreatePaymentRequest>,
    ) -> Result<Response, AppError> {
        let package = catalog::find(&request.package_id)
            .ok_or_else(|| AppError::not_found("Package"))?;

        let order_id = format!("order_{}", Uuid::new_v4().simple());
        let charge = ChargeRequest {
            amount: package.price,
            currency: package.currency.to_owned(),
            order_id: order_id.clone(),
            client_id: request.client_id,
            description: package.name.to_owned(),
        };

        let created = resources.gateway.create_charge(&charge).await?;

        let order = PaymentOrder {
            payment_id: created.payment_id.clone(),
            order_id,
            client_id: request.client_id,
            package_id: package.id.to_owned(),
            amount: i64::try_from(package.price)
                .map_err(|_| AppError::internal("Package price out of range"))?,
            currency: package.currency.to_owned(),
            status: PaymentOrderStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
        };
        resources
            .database
            .create_payment_order(&order)
            .await
            .map_err(|e| AppError::database(format!("Failed to record payment order: {e}")))?;

        info!(
            payment_id = %created.payment_id,
            client_id = %request.client_id,
            package_id = package.id,
            "Charge created"
        );

        Ok((StatusCode::OK, Json(ApiResponse::ok(created))).into_response())
    }

    /// Query the gateway for the current charge status
    async fn handle_status(
        State(resources): State<Arc<ServerResources>>,
        Path(payment_id): Path<String>,
    ) -> Result<Response, AppError> {
        let status = resources.gateway.charge_status(&payment_id).await?;
        Ok((StatusCode::OK, Json(ApiResponse::ok(status))).into_response())
    }

    /// Cancel a pending charge
    async fn handle_cancel(
        State(resources): State<Arc<ServerResources>>,
        Path(payment_id): Path<String>,
    ) -> Result<Response, AppError> {
        let cancelled = resources.gateway.cancel_charge(&payment_id).await?;

        if cancelled.ok {
            if let Some(order) = resources
                .database
                .get_payment_order(&payment_id)
                .await
                .map_err(AppError::from)?
            {
                if order.status == PaymentOrderStatus::Pending {
                    resources
                        .database
                        .set_payment_order_status(&payment_id, PaymentOrderStatus::Cancelled, None)
                        .await
                        .map_err(AppError::from)?;
                }
            }
        }

        Ok((StatusCode::OK, Json(ApiResponse::ok(cancelled))).into_response())
    }

    /// Handle a signed status callback from the gateway.
    ///
    /// The signature covers every payload field except `signature` itself and
    /// is verified with a constant-time comparison before anything else is
    /// read out of the body.
    async fn handle_webhook(
        State(resources): State<Arc<ServerResources>>,
        Json(payload): Json<serde_json::Value>,
    ) -> Result<Response, AppError> {
        let provided = payload
            .get(SIGNATURE_FIELD)
            .and_then(serde_json::Value::as_str)
            .ok_or_else(AppError::signature_mismatch)?;

        let fields = fields_from_json(&payload);
        if !verify(&fields, provided, &resources.config.gateway.shared_secret) {
            warn!("Webhook rejected: signature mismatch");
            return Err(AppError::signature_mismatch());
        }

        let payment_id = payload
            .get("payment_id")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| AppError::invalid_input("payment_id is required"))?;
        let state = PaymentState::from_gateway_string(
            payload
                .get("payment_status")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default(),
        );

        match state {
            PaymentState::Paid => Self::complete_purchase(&resources, payment_id).await,
            PaymentState::Cancelled | PaymentState::Failed => {
                if let Some(order) = resources
                    .database
                    .get_payment_order(payment_id)
                    .await
                    .map_err(AppError::from)?
                {
                    if order.status == PaymentOrderStatus::Pending {
                        resources
                            .database
                            .set_payment_order_status(
                                payment_id,
                                PaymentOrderStatus::Cancelled,
                                None,
                            )
                            .await
                            .map_err(AppError::from)?;
                        info!(payment_id = %payment_id, "Payment order closed without payment");
                    }
                }
                Ok((
                    StatusCode::OK,
                    Json(ApiResponse::ok(serde_json::json!({ "processed": true }))),
                )
                    .into_response())
            }
            PaymentState::Pending => Ok((
                StatusCode::OK,
                Json(ApiResponse::ok(serde_json::json!({ "processed": false }))),
            )
                .into_response()),
        }
    }

    /// Turn a paid order into a subscription, exactly once
    async fn complete_purchase(
        resources: &Arc<ServerResources>,
        payment_id: &str,
    ) -> Result<Response, AppError> {
        let order = resources
            .database
            .get_payment_order(payment_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found("Payment order"))?;

        if order.status == PaymentOrderStatus::Completed {
            info!(payment_id = %payment_id, "Duplicate webhook for completed order");
            return Ok((
                StatusCode::OK,
                Json(ApiResponse::ok_with_message(
                    serde_json::json!({ "processed": false }),
                    "Order already completed",
                )),
            )
                .into_response());
        }

        let package = catalog::find(&order.package_id).ok_or_else(|| {
            AppError::internal(format!("Unknown package in payment order: {}", order.package_id))
        })?;

        let now = Utc::now();
        let subscription = resources
            .ledger
            .record_purchase(order.client_id, package, now)
            .await?;
        resources
            .database
            .set_payment_order_status(payment_id, PaymentOrderStatus::Completed, Some(now))
            .await
            .map_err(AppError::from)?;

        info!(
            payment_id = %payment_id,
            subscription_id = %subscription.id,
            client_id = %order.client_id,
            "Purchase completed"
        );

        Ok((
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!({
                "processed": true,
                "subscription_id": subscription.id,
            }))),
        )
            .into_response())
    }
}
