// ABOUTME: Database factory and provider abstraction for backend selection
// ABOUTME: Detects the backend from the connection string and delegates through one wrapper
//! Database factory for creating database providers
//!
//! This module provides automatic database type detection and creation
//! based on connection strings. SQLite is the only backend today; the
//! wrapper keeps the seam open for a server-class backend.

use super::sqlite::SqliteDatabase;
use super::DatabaseProvider;
use crate::database::{DebitOutcome, PaymentOrder, PaymentOrderStatus};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use trenera_core::models::{Organization, PackageHistoryEntry, Subscription, SubscriptionStatus};
use uuid::Uuid;

/// Supported database types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseType {
    SQLite,
}

/// Database instance wrapper that delegates to the appropriate implementation
#[derive(Clone)]
pub enum Database {
    SQLite(SqliteDatabase),
}

impl Database {
    /// Get a descriptive string for the current database backend
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::SQLite(_) => "SQLite (embedded)",
        }
    }

    /// Get the database type enum
    #[must_use]
    pub const fn database_type(&self) -> DatabaseType {
        match self {
            Self::SQLite(_) => DatabaseType::SQLite,
        }
    }
}

/// Detect the database type from a connection string
fn detect_database_type(database_url: &str) -> Result<DatabaseType> {
    if database_url.starts_with("postgresql://") || database_url.starts_with("postgres://") {
        return Err(anyhow!(
            "PostgreSQL URLs are not supported by this build: {database_url}"
        ));
    }
    // sqlite: URLs and bare file paths both map to the sqlite backend
    Ok(DatabaseType::SQLite)
}

#[async_trait]
impl DatabaseProvider for Database {
    async fn new(database_url: &str) -> Result<Self> {
        debug!("Detecting database type from URL: {}", database_url);
        let db_type = detect_database_type(database_url)?;

        match db_type {
            DatabaseType::SQLite => {
                let db = SqliteDatabase::new(database_url).await?;
                info!("SQLite database initialized successfully");
                Ok(Self::SQLite(db))
            }
        }
    }

    async fn migrate(&self) -> Result<()> {
        match self {
            Self::SQLite(db) => db.migrate().await,
        }
    }

    async fn create_organization(&self, org: &Organization) -> Result<Uuid> {
        match self {
            Self::SQLite(db) => db.create_organization(org).await,
        }
    }

    async fn get_organization(&self, org_id: Uuid) -> Result<Option<Organization>> {
        match self {
            Self::SQLite(db) => db.get_organization(org_id).await,
        }
    }

    async fn get_subscription(&self, subscription_id: Uuid) -> Result<Option<Subscription>> {
        match self {
            Self::SQLite(db) => db.get_subscription(subscription_id).await,
        }
    }

    async fn get_active_subscription_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Option<Subscription>> {
        match self {
            Self::SQLite(db) => db.get_active_subscription_for_client(client_id).await,
        }
    }

    async fn set_subscription_status(
        &self,
        subscription_id: Uuid,
        status: SubscriptionStatus,
    ) -> Result<()> {
        match self {
            Self::SQLite(db) => db.set_subscription_status(subscription_id, status).await,
        }
    }

    async fn debit_session(
        &self,
        subscription_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<DebitOutcome> {
        match self {
            Self::SQLite(db) => db.debit_session(subscription_id, now).await,
        }
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
        match self {
            Self::SQLite(db) => {
                db.record_purchase(client_id, package_id, package_name, sessions, duration_days, now)
                    .await
            }
        }
    }

    async fn get_history_for_client(&self, client_id: Uuid) -> Result<Vec<PackageHistoryEntry>> {
        match self {
            Self::SQLite(db) => db.get_history_for_client(client_id).await,
        }
    }

    async fn create_payment_order(&self, order: &PaymentOrder) -> Result<()> {
        match self {
            Self::SQLite(db) => db.create_payment_order(order).await,
        }
    }

    async fn get_payment_order(&self, payment_id: &str) -> Result<Option<PaymentOrder>> {
        match self {
            Self::SQLite(db) => db.get_payment_order(payment_id).await,
        }
    }

    async fn set_payment_order_status(
        &self,
        payment_id: &str,
        status: PaymentOrderStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        match self {
            Self::SQLite(db) => {
                db.set_payment_order_status(payment_id, status, completed_at)
                    .await
            }
        }
    }
}
