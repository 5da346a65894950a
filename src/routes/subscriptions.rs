// ABOUTME: Subscription ledger route handlers for clients and their trainers
// ABOUTME: Active-subscription lookup, session debits, package history, and cancellation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! Subscription routes
//!
//! Reads perform the ledger's lazy-expiry check, so an over-age record
//! observed through any of these endpoints is already persisted as expired.

use super::{parse_uuid, ApiResponse};
use crate::context::ServerResources;
use crate::errors::AppError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Subscription route handlers
pub struct SubscriptionRoutes;

impl SubscriptionRoutes {
    /// Create all subscription routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/subscriptions/user/:client_id",
                get(Self::handle_get_active),
            )
            .route(
                "/subscriptions/user/:client_id/history",
                get(Self::handle_history),
            )
            .route(
                "/subscriptions/:subscription_id/use-session",
                post(Self::handle_use_session),
            )
            .route(
                "/subscriptions/:subscription_id/cancel",
                post(Self::handle_cancel),
            )
            .with_state(resources)
    }

    /// Resolve the client's current active subscription
    async fn handle_get_active(
        State(resources): State<Arc<ServerResources>>,
        Path(client_id): Path<String>,
    ) -> Result<Response, AppError> {
        let client_id = parse_uuid(&client_id, "client id")?;
        let view = resources
            .ledger
            .get_active_subscription(client_id, Utc::now())
            .await?;

        let response = if view.is_none() {
            ApiResponse::ok_with_message(view, "No active subscription")
        } else {
            ApiResponse::ok(view)
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Debit one session from a subscription
    async fn handle_use_session(
        State(resources): State<Arc<ServerResources>>,
        Path(subscription_id): Path<String>,
    ) -> Result<Response, AppError> {
        let subscription_id = parse_uuid(&subscription_id, "subscription id")?;
        let usage = resources
            .ledger
            .use_session(subscription_id, Utc::now())
            .await?;
        Ok((StatusCode::OK, Json(ApiResponse::ok(usage))).into_response())
    }

    /// List the client's package history
    async fn handle_history(
        State(resources): State<Arc<ServerResources>>,
        Path(client_id): Path<String>,
    ) -> Result<Response, AppError> {
        let client_id = parse_uuid(&client_id, "client id")?;
        let history = resources.ledger.history(client_id).await?;
        Ok((StatusCode::OK, Json(ApiResponse::ok(history))).into_response())
    }

    /// Explicitly cancel an active subscription
    async fn handle_cancel(
        State(resources): State<Arc<ServerResources>>,
        Path(subscription_id): Path<String>,
    ) -> Result<Response, AppError> {
        let subscription_id = parse_uuid(&subscription_id, "subscription id")?;
        resources.ledger.cancel(subscription_id, Utc::now()).await?;
        info!(subscription_id = %subscription_id, "Subscription cancelled via API");
        Ok((
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!({ "status": "cancelled" }))),
        )
            .into_response())
    }
}
