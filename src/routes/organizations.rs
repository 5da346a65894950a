// ABOUTME: Organization registration route handlers
// ABOUTME: Validates submitted drafts with the wizard's blocking validators and persists them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! Organization registration routes
//!
//! The wizard runs client-side against the same `trenera-core` validators;
//! this endpoint re-runs every blocking validator as the submit guard before
//! anything is persisted. Validation failures come back as a field-error map
//! with `success: false` — they are part of the protocol, not exceptions.

use crate::context::ServerResources;
use crate::database_plugins::DatabaseProvider;
use crate::errors::AppError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use trenera_core::registration::{validate_submission, OrganizationDraft};

/// Organization registration route handlers
pub struct OrganizationRoutes;

impl OrganizationRoutes {
    /// Create all organization routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/organizations/register", post(Self::handle_register))
            .with_state(resources)
    }

    /// Register an organization from a completed wizard draft
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(draft): Json<OrganizationDraft>,
    ) -> Result<Response, AppError> {
        let errors = validate_submission(&draft);
        if !errors.is_empty() {
            warn!(fields = errors.len(), "Organization registration rejected");
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "success": false,
                    "error": "Registration data is incomplete",
                    "field_errors": errors,
                })),
            )
                .into_response());
        }

        let organization = draft.into_organization(Utc::now());
        let organization_id = resources
            .database
            .create_organization(&organization)
            .await
            .map_err(|e| AppError::database(format!("Failed to register organization: {e}")))?;

        info!(
            organization_id = %organization_id,
            name = %organization.name,
            city = %organization.location.city,
            "Organization registered"
        );

        Ok((
            StatusCode::CREATED,
            Json(serde_json::json!({
                "success": true,
                "organization_id": organization_id,
            })),
        )
            .into_response())
    }
}
