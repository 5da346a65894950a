//! SQLite database implementation
//!
//! This module wraps the sqlite database functionality
//! to implement the `DatabaseProvider` trait.

use super::DatabaseProvider;
use crate::database::{DebitOutcome, PaymentOrder, PaymentOrderStatus};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use trenera_core::models::{Organization, PackageHistoryEntry, Subscription, SubscriptionStatus};
use uuid::Uuid;

/// SQLite database implementation
#[derive(Clone)]
pub struct SqliteDatabase {
    /// The underlying database instance
    inner: crate::database::Database,
}

#[async_trait]
impl DatabaseProvider for SqliteDatabase {
    async fn new(database_url: &str) -> Result<Self> {
        let inner = crate::database::Database::new(database_url).await?;
        Ok(Self { inner })
    }

    async fn migrate(&self) -> Result<()> {
        self.inner.migrate().await
    }

    async fn create_organization(&self, org: &Organization) -> Result<Uuid> {
        self.inner.create_organization(org).await
    }

    async fn get_organization(&self, org_id: Uuid) -> Result<Option<Organization>> {
        self.inner.get_organization(org_id).await
    }

    async fn get_subscription(&self, subscription_id: Uuid) -> Result<Option<Subscription>> {
        self.inner.get_subscription(subscription_id).await
    }

    async fn get_active_subscription_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Option<Subscription>> {
        self.inner.get_active_subscription_for_client(client_id).await
    }

    async fn set_subscription_status(
        &self,
        subscription_id: Uuid,
        status: SubscriptionStatus,
    ) -> Result<()> {
        self.inner
            .set_subscription_status(subscription_id, status)
            .await
    }

    async fn debit_session(
        &self,
        subscription_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<DebitOutcome> {
        self.inner.debit_session(subscription_id, now).await
    }

    async fn record_purchase(
        &self,
        client_id: Uuid,
        package_id: &str,
        package_name: &str,
        sessions: i32,
        duration_days: i64,
        now: DateTime<Utc>,
    ) -> Result<Subscription> {
        self.inner
            .record_purchase(client_id, package_id, package_name, sessions, duration_days, now)
            .await
    }

    async fn get_history_for_client(&self, client_id: Uuid) -> Result<Vec<PackageHistoryEntry>> {
        self.inner.get_history_for_client(client_id).await
    }

    async fn create_payment_order(&self, order: &PaymentOrder) -> Result<()> {
        self.inner.create_payment_order(order).await
    }

    async fn get_payment_order(&self, payment_id: &str) -> Result<Option<PaymentOrder>> {
        self.inner.get_payment_order(payment_id).await
    }

    async fn set_payment_order_status(
        &self,
        payment_id: &str,
        status: PaymentOrderStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        self.inner
            .set_payment_order_status(payment_id, status, completed_at)
            .await
    }
}
