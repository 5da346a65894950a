// ABOUTME: SQLite storage for organizations, subscriptions, and payment orders
// ABOUTME: Inline migrations, indexed lookups, and transactional session debits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! # Database Management
//!
//! Durable storage for the marketplace. Subscriptions are keyed by id with a
//! secondary index on `(client_id, status)`; a partial unique index makes a
//! second `active` row per client impossible at the storage layer. Session
//! debits and purchase recording are single transactions so concurrent
//! requests cannot produce lost updates.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite, SqlitePool};
use trenera_core::models::{
    Organization, OrganizationType, PackageHistoryEntry, Subscription, SubscriptionStatus,
};
use uuid::Uuid;

/// Payment order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentOrderStatus {
    /// Charge created, awaiting gateway confirmation
    Pending,
    /// Paid and turned into a subscription
    Completed,
    /// Cancelled before payment
    Cancelled,
}

impl PaymentOrderStatus {
    /// Convert from database string
    #[must_use]
    pub fn from_db_string(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            "pending" => Self::Pending,
            _ => {
                tracing::warn!("Unknown payment order status '{}', treating as Pending", s);
                Self::Pending
            }
        }
    }

    /// Convert to database string
    #[must_use]
    pub const fn to_db_string(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Mapping from a gateway charge to the purchase it will fulfil
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrder {
    /// Gateway-issued payment identifier
    pub payment_id: String,
    /// Our order identifier sent to the gateway
    pub order_id: String,
    /// Purchasing client
    pub client_id: Uuid,
    /// Catalog package being purchased
    pub package_id: String,
    /// Charge amount in minor units
    pub amount: i64,
    /// ISO currency code
    pub currency: String,
    /// Order lifecycle status
    pub status: PaymentOrderStatus,
    /// When the charge was created
    pub created_at: DateTime<Utc>,
    /// When the order completed, if it did
    pub completed_at: Option<DateTime<Utc>>,
}

/// Outcome of a transactional session debit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebitOutcome {
    /// No subscription with that id
    NotFound,
    /// Subscription exists but is not active
    NotActive(SubscriptionStatus),
    /// Lazy expiry fired during this call; status is now `Expired`
    JustExpired,
    /// Limited subscription with no sessions remaining
    NoSessionsLeft,
    /// Debit applied (or unlimited pass-through)
    Debited {
        /// Sessions left after the debit; unchanged for unlimited plans
        sessions_remaining: i32,
        /// Whether the plan is unlimited
        is_unlimited: bool,
    },
}

/// Database manager for marketplace storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error when the connection or a migration fails
    pub async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options)
            .await
            .with_context(|| format!("Failed to connect to {database_url}"))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error when a DDL statement fails
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS organizations (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                org_type TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                specializations TEXT NOT NULL, -- JSON array
                packages TEXT NOT NULL, -- JSON array
                contact TEXT NOT NULL, -- JSON
                location TEXT NOT NULL, -- JSON
                legal TEXT NOT NULL, -- JSON
                media TEXT NOT NULL, -- JSON
                social TEXT NOT NULL, -- JSON
                trainers TEXT NOT NULL, -- JSON array
                working_hours TEXT NOT NULL, -- JSON
                color_scheme TEXT NOT NULL, -- JSON
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS subscriptions (
                id TEXT PRIMARY KEY,
                client_id TEXT NOT NULL,
                package_id TEXT NOT NULL,
                package_name TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'expired', 'cancelled')),
                sessions_remaining INTEGER NOT NULL DEFAULT 0,
                is_unlimited BOOLEAN NOT NULL DEFAULT 0,
                activated_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Secondary index for the hot "active subscription for client" lookup
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_subscriptions_client_status ON subscriptions(client_id, status)",
        )
        .execute(&self.pool)
        .await?;

        // At most one active subscription per client, enforced by storage
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_subscriptions_one_active ON subscriptions(client_id) WHERE status = 'active'",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS subscription_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subscription_id TEXT NOT NULL REFERENCES subscriptions(id) ON DELETE CASCADE,
                client_id TEXT NOT NULL,
                package_id TEXT NOT NULL,
                purchased_at TEXT NOT NULL,
                sessions INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_subscription_history_client ON subscription_history(client_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS payment_orders (
                payment_id TEXT PRIMARY KEY,
                order_id TEXT NOT NULL,
                client_id TEXT NOT NULL,
                package_id TEXT NOT NULL,
                amount INTEGER NOT NULL,
                currency TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'completed', 'cancelled')),
                created_at TEXT NOT NULL,
                completed_at TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_payment_orders_client ON payment_orders(client_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ================================
    // Organizations
    // ================================

    /// Persist a registered organization
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the insert fails
    pub async fn create_organization(&self, org: &Organization) -> Result<Uuid> {
        sqlx::query(
            r#"
            INSERT INTO organizations (
                id, name, org_type, description, specializations, packages,
                contact, location, legal, media, social, trainers,
                working_hours, color_scheme, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
        )
        .bind(org.id.to_string())
        .bind(&org.name)
        .bind(org.org_type.to_db_string())
        .bind(&org.description)
        .bind(serde_json::to_string(&org.specializations)?)
        .bind(serde_json::to_string(&org.packages)?)
        .bind(serde_json::to_string(&org.contact)?)
        .bind(serde_json::to_string(&org.location)?)
        .bind(serde_json::to_string(&org.legal)?)
        .bind(serde_json::to_string(&org.media)?)
        .bind(serde_json::to_string(&org.social)?)
        .bind(serde_json::to_string(&org.trainers)?)
        .bind(serde_json::to_string(&org.working_hours)?)
        .bind(serde_json::to_string(&org.color_scheme)?)
        .bind(org.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(org.id)
    }

    /// Get an organization by id
    ///
    /// # Errors
    ///
    /// Returns an error when the query or row decoding fails
    pub async fn get_organization(&self, org_id: Uuid) -> Result<Option<Organization>> {
        let row = sqlx::query("SELECT * FROM organizations WHERE id = ?1")
            .bind(org_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_organization(&row)?)),
            None => Ok(None),
        }
    }

    // ================================
    // Subscriptions
    // ================================

    /// Get a subscription by id
    ///
    /// # Errors
    ///
    /// Returns an error when the query or row decoding fails
    pub async fn get_subscription(&self, subscription_id: Uuid) -> Result<Option<Subscription>> {
        let row = sqlx::query("SELECT * FROM subscriptions WHERE id = ?1")
            .bind(subscription_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_subscription(&row)?)),
            None => Ok(None),
        }
    }

    /// Get the client's active subscription, if any
    ///
    /// # Errors
    ///
    /// Returns an error when the query or row decoding fails
    pub async fn get_active_subscription_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Option<Subscription>> {
        let row =
            sqlx::query("SELECT * FROM subscriptions WHERE client_id = ?1 AND status = 'active'")
                .bind(client_id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_subscription(&row)?)),
            None => Ok(None),
        }
    }

    /// Set a subscription's lifecycle status
    ///
    /// # Errors
    ///
    /// Returns an error when the update fails
    pub async fn set_subscription_status(
        &self,
        subscription_id: Uuid,
        status: SubscriptionStatus,
    ) -> Result<()> {
        sqlx::query("UPDATE subscriptions SET status = ?1 WHERE id = ?2")
            .bind(status.to_db_string())
            .bind(subscription_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Debit one session inside a single transaction.
    ///
    /// The read, the lazy-expiry check, and the decrement happen atomically,
    /// so two concurrent calls can never both consume the last session.
    ///
    /// # Errors
    ///
    /// Returns an error when the transaction fails; business outcomes are
    /// data, not errors.
    pub async fn debit_session(
        &self,
        subscription_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<DebitOutcome> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT * FROM subscriptions WHERE id = ?1")
            .bind(subscription_id.to_string())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            return Ok(DebitOutcome::NotFound);
        };
        let subscription = Self::row_to_subscription(&row)?;

        if subscription.status != SubscriptionStatus::Active {
            return Ok(DebitOutcome::NotActive(subscription.status));
        }

        if subscription.is_expired_at(now) {
            sqlx::query("UPDATE subscriptions SET status = 'expired' WHERE id = ?1")
                .bind(subscription_id.to_string())
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            return Ok(DebitOutcome::JustExpired);
        }

        if subscription.is_unlimited {
            tx.commit().await?;
            return Ok(DebitOutcome::Debited {
                sessions_remaining: subscription.sessions_remaining,
                is_unlimited: true,
            });
        }

        if subscription.sessions_remaining <= 0 {
            return Ok(DebitOutcome::NoSessionsLeft);
        }

        sqlx::query(
            "UPDATE subscriptions SET sessions_remaining = sessions_remaining - 1 WHERE id = ?1",
        )
        .bind(subscription_id.to_string())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(DebitOutcome::Debited {
            sessions_remaining: subscription.sessions_remaining - 1,
            is_unlimited: false,
        })
    }

    /// Record a confirmed purchase, superseding the current active period.
    ///
    /// An existing active record is updated in place (new package, counters
    /// and validity reset); otherwise a fresh record is inserted. Either way
    /// the purchase is appended to the client's package history, all in one
    /// transaction. The partial unique index stays satisfied by construction.
    ///
    /// # Errors
    ///
    /// Returns an error when the transaction fails
    pub async fn record_purchase(
        &self,
        client_id: Uuid,
        package_id: &str,
        package_name: &str,
        sessions: i32,
        duration_days: i64,
        now: DateTime<Utc>,
    ) -> Result<Subscription> {
        let mut tx = self.pool.begin().await?;

        let existing =
            sqlx::query("SELECT * FROM subscriptions WHERE client_id = ?1 AND status = 'active'")
                .bind(client_id.to_string())
                .fetch_optional(&mut *tx)
                .await?;

        let subscription = match existing {
            Some(row) => {
                let previous = Self::row_to_subscription(&row)?;
                let updated = Subscription {
                    id: previous.id,
                    client_id,
                    package_id: package_id.to_owned(),
                    package_name: package_name.to_owned(),
                    status: SubscriptionStatus::Active,
                    sessions_remaining: sessions.max(0),
                    is_unlimited: sessions < 0,
                    activated_at: now,
                    expires_at: now + chrono::Duration::days(duration_days),
                };
                sqlx::query(
                    r#"
                    UPDATE subscriptions
                    SET package_id = ?1, package_name = ?2, sessions_remaining = ?3,
                        is_unlimited = ?4, activated_at = ?5, expires_at = ?6
                    WHERE id = ?7
                    "#,
                )
                .bind(&updated.package_id)
                .bind(&updated.package_name)
                .bind(updated.sessions_remaining)
                .bind(updated.is_unlimited)
                .bind(updated.activated_at.to_rfc3339())
                .bind(updated.expires_at.to_rfc3339())
                .bind(updated.id.to_string())
                .execute(&mut *tx)
                .await?;
                updated
            }
            None => {
                let created = Subscription::from_purchase(
                    client_id,
                    package_id,
                    package_name,
                    sessions,
                    duration_days,
                    now,
                );
                sqlx::query(
                    r#"
                    INSERT INTO subscriptions (
                        id, client_id, package_id, package_name, status,
                        sessions_remaining, is_unlimited, activated_at, expires_at
                    )
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    "#,
                )
                .bind(created.id.to_string())
                .bind(created.client_id.to_string())
                .bind(&created.package_id)
                .bind(&created.package_name)
                .bind(created.status.to_db_string())
                .bind(created.sessions_remaining)
                .bind(created.is_unlimited)
                .bind(created.activated_at.to_rfc3339())
                .bind(created.expires_at.to_rfc3339())
                .execute(&mut *tx)
                .await?;
                created
            }
        };

        sqlx::query(
            r#"
            INSERT INTO subscription_history (subscription_id, client_id, package_id, purchased_at, sessions)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(subscription.id.to_string())
        .bind(client_id.to_string())
        .bind(package_id)
        .bind(now.to_rfc3339())
        .bind(sessions)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(subscription)
    }

    /// Get a client's package history, oldest purchase first
    ///
    /// # Errors
    ///
    /// Returns an error when the query or row decoding fails
    pub async fn get_history_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<PackageHistoryEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT package_id, purchased_at, sessions FROM subscription_history
            WHERE client_id = ?1
            ORDER BY purchased_at ASC, id ASC
            "#,
        )
        .bind(client_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let purchased_at: String = row.try_get("purchased_at")?;
                Ok(PackageHistoryEntry {
                    package_id: row.try_get("package_id")?,
                    purchased_at: parse_timestamp(&purchased_at)?,
                    sessions: row.try_get("sessions")?,
                })
            })
            .collect()
    }

    // ================================
    // Payment Orders
    // ================================

    /// Record a pending payment order for a created charge
    ///
    /// # Errors
    ///
    /// Returns an error when the insert fails
    pub async fn create_payment_order(&self, order: &PaymentOrder) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payment_orders (
                payment_id, order_id, client_id, package_id, amount,
                currency, status, created_at, completed_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&order.payment_id)
        .bind(&order.order_id)
        .bind(order.client_id.to_string())
        .bind(&order.package_id)
        .bind(order.amount)
        .bind(&order.currency)
        .bind(order.status.to_db_string())
        .bind(order.created_at.to_rfc3339())
        .bind(order.completed_at.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get a payment order by gateway payment id
    ///
    /// # Errors
    ///
    /// Returns an error when the query or row decoding fails
    pub async fn get_payment_order(&self, payment_id: &str) -> Result<Option<PaymentOrder>> {
        let row = sqlx::query("SELECT * FROM payment_orders WHERE payment_id = ?1")
            .bind(payment_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_payment_order(&row)?)),
            None => Ok(None),
        }
    }

    /// Move a payment order to a terminal status
    ///
    /// # Errors
    ///
    /// Returns an error when the update fails
    pub async fn set_payment_order_status(
        &self,
        payment_id: &str,
        status: PaymentOrderStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        sqlx::query("UPDATE payment_orders SET status = ?1, completed_at = ?2 WHERE payment_id = ?3")
            .bind(status.to_db_string())
            .bind(completed_at.map(|t| t.to_rfc3339()))
            .bind(payment_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ================================
    // Row mapping
    // ================================

    fn row_to_subscription(row: &SqliteRow) -> Result<Subscription> {
        let id: String = row.try_get("id")?;
        let client_id: String = row.try_get("client_id")?;
        let status: String = row.try_get("status")?;
        let activated_at: String = row.try_get("activated_at")?;
        let expires_at: String = row.try_get("expires_at")?;

        Ok(Subscription {
            id: Uuid::parse_str(&id)?,
            client_id: Uuid::parse_str(&client_id)?,
            package_id: row.try_get("package_id")?,
            package_name: row.try_get("package_name")?,
            status: SubscriptionStatus::from_db_string(&status),
            sessions_remaining: row.try_get("sessions_remaining")?,
            is_unlimited: row.try_get("is_unlimited")?,
            activated_at: parse_timestamp(&activated_at)?,
            expires_at: parse_timestamp(&expires_at)?,
        })
    }

    fn row_to_organization(row: &SqliteRow) -> Result<Organization> {
        let id: String = row.try_get("id")?;
        let org_type: String = row.try_get("org_type")?;
        let specializations: String = row.try_get("specializations")?;
        let packages: String = row.try_get("packages")?;
        let contact: String = row.try_get("contact")?;
        let location: String = row.try_get("location")?;
        let legal: String = row.try_get("legal")?;
        let media: String = row.try_get("media")?;
        let social: String = row.try_get("social")?;
        let trainers: String = row.try_get("trainers")?;
        let working_hours: String = row.try_get("working_hours")?;
        let color_scheme: String = row.try_get("color_scheme")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Organization {
            id: Uuid::parse_str(&id)?,
            name: row.try_get("name")?,
            org_type: OrganizationType::from_db_string(&org_type),
            description: row.try_get("description")?,
            specializations: serde_json::from_str(&specializations)?,
            packages: serde_json::from_str(&packages)?,
            contact: serde_json::from_str(&contact)?,
            location: serde_json::from_str(&location)?,
            legal: serde_json::from_str(&legal)?,
            media: serde_json::from_str(&media)?,
            social: serde_json::from_str(&social)?,
            trainers: serde_json::from_str(&trainers)?,
            working_hours: serde_json::from_str(&working_hours)?,
            color_scheme: serde_json::from_str(&color_scheme)?,
            created_at: parse_timestamp(&created_at)?,
        })
    }

    fn row_to_payment_order(row: &SqliteRow) -> Result<PaymentOrder> {
        let client_id: String = row.try_get("client_id")?;
        let status: String = row.try_get("status")?;
        let created_at: String = row.try_get("created_at")?;
        let completed_at: Option<String> = row.try_get("completed_at")?;

        Ok(PaymentOrder {
            payment_id: row.try_get("payment_id")?,
            order_id: row.try_get("order_id")?,
            client_id: Uuid::parse_str(&client_id)?,
            package_id: row.try_get("package_id")?,
            amount: row.try_get("amount")?,
            currency: row.try_get("currency")?,
            status: PaymentOrderStatus::from_db_string(&status),
            created_at: parse_timestamp(&created_at)?,
            completed_at: completed_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

/// Parse an RFC 3339 timestamp stored as TEXT
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("Invalid stored timestamp: {s}"))?
        .with_timezone(&Utc))
}
