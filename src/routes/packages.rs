// ABOUTME: Marketplace package catalog routes
// ABOUTME: Read-only listing consumed by the purchase flow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! Package catalog routes

use super::ApiResponse;
use axum::{routing::get, Json, Router};
use trenera_core::catalog;

/// Package catalog route handlers
pub struct PackageRoutes;

impl PackageRoutes {
    /// Create the catalog routes
    #[must_use]
    pub fn routes() -> Router {
        Router::new().route("/packages", get(Self::handle_list))
    }

    /// List the purchasable marketplace packages in display order
    async fn handle_list() -> Json<ApiResponse<&'static [catalog::MarketplacePackage]>> {
        Json(ApiResponse::ok(catalog::all()))
    }
}
