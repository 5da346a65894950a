// ABOUTME: Configuration management for the Trenera marketplace server
// ABOUTME: Environment-driven server, database, and payment gateway configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! Configuration management.

/// Environment-based runtime configuration
pub mod environment;

pub use environment::{
    DatabaseConfig, DatabaseUrl, Environment, GatewayConfig, LogLevel, ServerConfig,
};
