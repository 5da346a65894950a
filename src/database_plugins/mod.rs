// ABOUTME: Database abstraction layer for the Trenera marketplace server
// ABOUTME: Plugin architecture so storage backends stay swappable behind one trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

use crate::database::{DebitOutcome, PaymentOrder, PaymentOrderStatus};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use trenera_core::models::{Organization, PackageHistoryEntry, Subscription, SubscriptionStatus};
use uuid::Uuid;

pub mod factory;
pub mod sqlite;

/// Core database abstraction trait
///
/// All database implementations must implement this trait to provide
/// a consistent interface for the application layer.
#[async_trait]
pub trait DatabaseProvider: Send + Sync + Clone {
    /// Create a new database connection
    async fn new(database_url: &str) -> Result<Self>
    where
        Self: Sized;

    /// Run database migrations to set up schema
    async fn migrate(&self) -> Result<()>;

    // ================================
    // Organizations
    // ================================

    /// Persist a registered organization
    async fn create_organization(&self, org: &Organization) -> Result<Uuid>;

    /// Get an organization by id
    async fn get_organization(&self, org_id: Uuid) -> Result<Option<Organization>>;

    // ================================
    // Subscriptions
    // ================================

    /// Get a subscription by id
    async fn get_subscription(&self, subscription_id: Uuid) -> Result<Option<Subscription>>;

    /// Get the client's active subscription, if any
    async fn get_active_subscription_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Option<Subscription>>;

    /// Set a subscription's lifecycle status
    async fn set_subscription_status(
        &self,
        subscription_id: Uuid,
        status: SubscriptionStatus,
    ) -> Result<()>;

    /// Debit one session inside a single transaction
    async fn debit_session(
        &self,
        subscription_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<DebitOutcome>;

    /// Record a confirmed purchase, superseding any current active period
    async fn record_purchase(
        &self,
        client_id: Uuid,
        package_id: &str,
        package_name: &str,
        sessions: i32,
        duration_days: i64,
        now: DateTime<Utc>,
    ) -> Result<Subscription>;

    /// Get a client's package history, oldest purchase first
    async fn get_history_for_client(&self, client_id: Uuid) -> Result<Vec<PackageHistoryEntry>>;

    // ================================
    // Payment Orders
    // ================================

    /// Record a pending payment order for a created charge
    async fn create_payment_order(&self, order: &PaymentOrder) -> Result<()>;

    /// Get a payment order by gateway payment id
    async fn get_payment_order(&self, payment_id: &str) -> Result<Option<PaymentOrder>>;

    /// Move a payment order to a terminal status
    async fn set_payment_order_status(
        &self,
        payment_id: &str,
        status: PaymentOrderStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<()>;
}
