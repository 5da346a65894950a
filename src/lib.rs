// ABOUTME: Main library entry point for the Trenera fitness marketplace server
// ABOUTME: Organization registration, subscription ledger, and QR payment integration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

#![deny(unsafe_code)]

//! # Trenera Server
//!
//! Backend for a multi-tenant fitness marketplace: organizations register
//! through a multi-step wizard, publish service packages, and clients buy
//! subscriptions through a QR payment gateway.
//!
//! ## Architecture
//!
//! - **`trenera-core`**: pure domain types — models, catalog, registration
//!   wizard (workspace crate)
//! - **Ledger**: subscription service with lazy expiry and transactional
//!   session debits
//! - **Payments**: signed gateway client plus webhook verification
//! - **Database**: sqlite behind a provider trait
//! - **Routes**: axum HTTP surface with one uniform response envelope
//!
//! ## Example
//!
//! ```rust,no_run
//! use trenera_server::config::ServerConfig;
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Trenera server configured for port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Configuration management and persistence
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Focused dependency injection context
pub mod context;

/// Marketplace storage implementation
pub mod database;

/// Database abstraction layer with plugin support
pub mod database_plugins;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Subscription ledger service
pub mod ledger;

/// Production logging and structured output
pub mod logging;

/// HTTP middleware (CORS)
pub mod middleware;

/// Payment gateway abstraction and backends
pub mod payments;

/// `HTTP` routes for subscriptions, organizations, packages, and payments
pub mod routes;
