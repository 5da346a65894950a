// ABOUTME: Dependency injection container shared across HTTP handlers
// ABOUTME: Bundles database, payment gateway, ledger, and configuration behind one Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! Focused dependency injection context for the server.

use crate::config::ServerConfig;
use crate::database_plugins::factory::Database;
use crate::ledger::SubscriptionLedger;
use crate::payments::PaymentGateway;
use std::sync::Arc;

/// Shared resources handed to every route group as axum state
pub struct ServerResources {
    /// Storage backend
    pub database: Arc<Database>,
    /// Payment gateway collaborator
    pub gateway: Arc<dyn PaymentGateway>,
    /// Subscription ledger service
    pub ledger: SubscriptionLedger,
    /// Runtime configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble server resources from their parts
    #[must_use]
    pub fn new(
        database: Arc<Database>,
        gateway: Arc<dyn PaymentGateway>,
        config: Arc<ServerConfig>,
    ) -> Self {
        let ledger = SubscriptionLedger::new(database.clone());
        Self {
            database,
            gateway,
            ledger,
            config,
        }
    }
}
