// ABOUTME: Route module organization for the Trenera marketplace HTTP API
// ABOUTME: Centralized route definitions per domain plus the shared response envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! Route modules for the marketplace server.
//!
//! Each domain module contains route definitions and thin handlers that
//! delegate to service layers. Success responses share one envelope:
//! `{"success": true, "data": ..., "message"?: ...}`; failures are rendered
//! by [`crate::errors::AppError`] as `{"success": false, "error": ...}`.

/// Health check and system status routes
pub mod health;
/// Organization registration routes
pub mod organizations;
/// Marketplace package catalog routes
pub mod packages;
/// Payment creation, status, cancellation, and webhook routes
pub mod payments;
/// Subscription ledger routes
pub mod subscriptions;

pub use health::HealthRoutes;
pub use organizations::OrganizationRoutes;
pub use packages::PackageRoutes;
pub use payments::PaymentRoutes;
pub use subscriptions::SubscriptionRoutes;

use crate::constants::limits;
use crate::context::ServerResources;
use crate::errors::AppError;
use crate::middleware::cors::setup_cors;
use axum::Router;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Uniform success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `true`; failures never pass through this type
    pub success: bool,
    /// Endpoint-specific payload; `null` is a meaningful value here
    pub data: T,
    /// Optional human-readable note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response with a payload
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    /// Successful response with a payload and a note
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

/// Parse a path segment as a UUID, keeping the error envelope uniform
pub(crate) fn parse_uuid(value: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value)
        .map_err(|_| AppError::invalid_input(format!("Invalid {what}: {value}")))
}

/// Assemble the full application router with shared middleware
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    let api = Router::new()
        .merge(SubscriptionRoutes::routes(resources.clone()))
        .merge(OrganizationRoutes::routes(resources.clone()))
        .merge(PackageRoutes::routes())
        .merge(PaymentRoutes::routes(resources.clone()));

    Router::new()
        .nest("/api/v1", api)
        .merge(HealthRoutes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(setup_cors(&resources.config))
        .layer(TimeoutLayer::new(Duration::from_secs(
            limits::REQUEST_TIMEOUT_SECS,
        )))
        .layer(RequestBodyLimitLayer::new(limits::MAX_REQUEST_BODY_BYTES))
}
