// ABOUTME: Subscription ledger service with lazy expiry and transactional session debits
// ABOUTME: Resolves active subscriptions, authorizes session use, records purchases and cancellations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! # Subscription Ledger
//!
//! The authoritative view of subscription records. Expiry is lazy: there is
//! no background sweep, so a subscription past `expires_at` stays nominally
//! active in storage until the next read or write touches it — at which point
//! its status is persisted as `Expired` and the caller observes the expired
//! outcome. Session debits run inside a storage transaction so concurrent
//! calls cannot double-spend the last session.

use crate::database::DebitOutcome;
use crate::database_plugins::{factory::Database, DatabaseProvider};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use trenera_core::catalog::MarketplacePackage;
use trenera_core::models::{PackageHistoryEntry, Subscription, SubscriptionStatus, SubscriptionView};
use uuid::Uuid;

/// Result of a successful session debit
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionUsage {
    /// Sessions left in the current period; unchanged for unlimited plans
    pub sessions_remaining: i32,
    /// Whether the plan is unlimited
    pub is_unlimited: bool,
}

/// Subscription ledger service
#[derive(Clone)]
pub struct SubscriptionLedger {
    database: Arc<Database>,
}

impl SubscriptionLedger {
    /// Create a ledger over the given database
    #[must_use]
    pub const fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Resolve the client's current active subscription as of `now`.
    ///
    /// Returns `None` when the client holds no active record, and also when
    /// the record turns out to be past `expires_at` — in that case the status
    /// is persisted as `Expired` before returning (lazy expiry).
    ///
    /// # Errors
    ///
    /// Returns an error when storage fails
    pub async fn get_active_subscription(
        &self,
        client_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<SubscriptionView>> {
        let Some(subscription) = self
            .database
            .get_active_subscription_for_client(client_id)
            .await?
        else {
            return Ok(None);
        };

        if subscription.is_expired_at(now) {
            self.database
                .set_subscription_status(subscription.id, SubscriptionStatus::Expired)
                .await?;
            info!(
                subscription_id = %subscription.id,
                client_id = %client_id,
                "Subscription expired on read"
            );
            return Ok(None);
        }

        Ok(Some(SubscriptionView::from_subscription(&subscription, now)))
    }

    /// Authorize and record the use of one session.
    ///
    /// # Errors
    ///
    /// - `ResourceNotFound` when no subscription has that id
    /// - `InvalidState` when the subscription is not active
    /// - `SubscriptionExpired` when lazy expiry fired during this call
    /// - `NoSessionsLeft` when a limited plan has nothing left to debit
    pub async fn use_session(
        &self,
        subscription_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<SessionUsage> {
        match self.database.debit_session(subscription_id, now).await? {
            DebitOutcome::NotFound => Err(AppError::not_found("Subscription")),
            DebitOutcome::NotActive(status) => Err(AppError::invalid_state(format!(
                "Subscription is {}",
                status.to_db_string()
            ))
            .with_resource_id(subscription_id.to_string())),
            DebitOutcome::JustExpired => {
                info!(
                    subscription_id = %subscription_id,
                    "Subscription expired on session use"
                );
                Err(AppError::subscription_expired(subscription_id))
            }
            DebitOutcome::NoSessionsLeft => Err(AppError::no_sessions_left(subscription_id)),
            DebitOutcome::Debited {
                sessions_remaining,
                is_unlimited,
            } => {
                info!(
                    subscription_id = %subscription_id,
                    sessions_remaining,
                    is_unlimited,
                    "Session debited"
                );
                Ok(SessionUsage {
                    sessions_remaining,
                    is_unlimited,
                })
            }
        }
    }

    /// The client's package history, oldest purchase first.
    ///
    /// Clients without any record get an empty sequence, never an error.
    ///
    /// # Errors
    ///
    /// Returns an error only when storage fails
    pub async fn history(&self, client_id: Uuid) -> AppResult<Vec<PackageHistoryEntry>> {
        Ok(self.database.get_history_for_client(client_id).await?)
    }

    /// Create or extend a subscription for a confirmed package purchase.
    ///
    /// When the client already holds an active record it is superseded in
    /// place — counters and validity reset from the new package — keeping
    /// the single-active invariant intact. Every purchase is appended to the
    /// client's package history.
    ///
    /// # Errors
    ///
    /// Returns an error when storage fails
    pub async fn record_purchase(
        &self,
        client_id: Uuid,
        package: &MarketplacePackage,
        now: DateTime<Utc>,
    ) -> AppResult<Subscription> {
        let subscription = self
            .database
            .record_purchase(
                client_id,
                package.id,
                package.name,
                package.sessions,
                package.duration_days,
                now,
            )
            .await?;
        info!(
            subscription_id = %subscription.id,
            client_id = %client_id,
            package_id = package.id,
            "Purchase recorded"
        );
        Ok(subscription)
    }

    /// Explicitly cancel an active subscription (terminal).
    ///
    /// # Errors
    ///
    /// - `ResourceNotFound` when no subscription has that id
    /// - `SubscriptionExpired` when lazy expiry fires instead of the cancel
    /// - `InvalidState` when the subscription is already terminal
    pub async fn cancel(&self, subscription_id: Uuid, now: DateTime<Utc>) -> AppResult<()> {
        let subscription = self
            .database
            .get_subscription(subscription_id)
            .await?
            .ok_or_else(|| AppError::not_found("Subscription"))?;

        if subscription.status != SubscriptionStatus::Active {
            return Err(AppError::invalid_state(format!(
                "Subscription is {}",
                subscription.status.to_db_string()
            ))
            .with_resource_id(subscription_id.to_string()));
        }

        // Lazy expiry wins over an explicit cancel on an already-lapsed record.
        if subscription.is_expired_at(now) {
            self.database
                .set_subscription_status(subscription_id, SubscriptionStatus::Expired)
                .await?;
            return Err(AppError::subscription_expired(subscription_id));
        }

        self.database
            .set_subscription_status(subscription_id, SubscriptionStatus::Cancelled)
            .await?;
        info!(subscription_id = %subscription_id, "Subscription cancelled");
        Ok(())
    }
}
