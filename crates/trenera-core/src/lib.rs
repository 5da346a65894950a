// ABOUTME: Core domain library for the Trenera fitness marketplace platform
// ABOUTME: Holds organization, subscription, catalog, and registration wizard types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! # Trenera Core
//!
//! Domain types shared by the marketplace server and its tests:
//!
//! - **Models**: organizations, service packages, subscriptions and their
//!   package history
//! - **Catalog**: the canonical, immutable set of purchasable marketplace
//!   packages
//! - **Registration**: the multi-step organization registration wizard with
//!   its per-step validators
//!
//! Everything in this crate is pure: no I/O, no clocks (callers pass `now`),
//! no storage. The server crate layers persistence and HTTP on top.

/// Canonical marketplace package catalog
pub mod catalog;

/// Common data models for organizations and subscriptions
pub mod models;

/// Multi-step organization registration wizard
pub mod registration;
