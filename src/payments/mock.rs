// ABOUTME: In-memory payment gateway for development and tests
// ABOUTME: Deterministic charges with manual payment confirmation via mark_paid
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! Mock gateway backend.
//!
//! Behaves like the real gateway from the caller's point of view: charges
//! start `Pending`, can be cancelled while pending, and can be driven to
//! `Paid` with [`MockGateway::mark_paid`] — which is how tests and local
//! development simulate a scanned QR without a network.

use super::{
    ChargeCancelled, ChargeCreated, ChargeRequest, ChargeStatus, PaymentGateway, PaymentState,
};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// How long a mock QR stays payable
const QR_VALIDITY_MINUTES: i64 = 15;

/// In-memory gateway implementation
#[derive(Default)]
pub struct MockGateway {
    charges: RwLock<HashMap<String, ChargeStatus>>,
}

impl MockGateway {
    /// Create an empty mock gateway
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive a pending charge to `Paid`, as a scanned QR would.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for unknown payment ids and `InvalidState`
    /// for charges that already left `Pending`.
    pub async fn mark_paid(&self, payment_id: &str) -> AppResult<ChargeStatus> {
        let mut charges = self.charges.write().await;
        let charge = charges
            .get_mut(payment_id)
            .ok_or_else(|| AppError::not_found("Payment"))?;
        if charge.payment_status != PaymentState::Pending {
            return Err(AppError::invalid_state("Charge is not pending"));
        }
        charge.payment_status = PaymentState::Paid;
        charge.transaction_id = Some(format!("txn_{}", Uuid::new_v4().simple()));
        charge.paid_at = Some(Utc::now());
        Ok(charge.clone())
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_charge(&self, request: &ChargeRequest) -> AppResult<ChargeCreated> {
        let payment_id = format!("pay_{}", Uuid::new_v4().simple());
        let status = ChargeStatus {
            payment_status: PaymentState::Pending,
            amount: i64::try_from(request.amount)
                .map_err(|_| AppError::invalid_input("Amount out of range"))?,
            currency: request.currency.clone(),
            order_id: request.order_id.clone(),
            transaction_id: None,
            paid_at: None,
        };
        self.charges
            .write()
            .await
            .insert(payment_id.clone(), status);

        Ok(ChargeCreated {
            qr_code: format!("MOCKQR:{payment_id}"),
            qr_image: format!("data:image/png;base64,{payment_id}"),
            deeplink: format!("mockpay://charge/{payment_id}"),
            payment_id,
            expires_at: Utc::now() + chrono::Duration::minutes(QR_VALIDITY_MINUTES),
        })
    }

    async fn charge_status(&self, payment_id: &str) -> AppResult<ChargeStatus> {
        self.charges
            .read()
            .await
            .get(payment_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Payment"))
    }

    async fn cancel_charge(&self, payment_id: &str) -> AppResult<ChargeCancelled> {
        let mut charges = self.charges.write().await;
        let Some(charge) = charges.get_mut(payment_id) else {
            return Err(AppError::not_found("Payment"));
        };
        if charge.payment_status != PaymentState::Pending {
            return Ok(ChargeCancelled {
                ok: false,
                message: "Charge already settled".into(),
            });
        }
        charge.payment_status = PaymentState::Cancelled;
        Ok(ChargeCancelled {
            ok: true,
            message: "Charge cancelled".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ChargeRequest {
        ChargeRequest {
            amount: 24_000,
            currency: "KZT".into(),
            order_id: "ord-1".into(),
            client_id: Uuid::new_v4(),
            description: "8 sessions".into(),
        }
    }

    #[tokio::test]
    async fn charge_lifecycle_pending_to_paid() {
        let gateway = MockGateway::new();
        let created = gateway.create_charge(&request()).await.unwrap();

        let status = gateway.charge_status(&created.payment_id).await.unwrap();
        assert_eq!(status.payment_status, PaymentState::Pending);
        assert!(status.paid_at.is_none());

        let paid = gateway.mark_paid(&created.payment_id).await.unwrap();
        assert_eq!(paid.payment_status, PaymentState::Paid);
        assert!(paid.transaction_id.is_some());

        // A settled charge cannot be cancelled.
        let cancel = gateway.cancel_charge(&created.payment_id).await.unwrap();
        assert!(!cancel.ok);
    }

    #[tokio::test]
    async fn unknown_payment_id_is_not_found() {
        let gateway = MockGateway::new();
        assert!(gateway.charge_status("pay_missing").await.is_err());
        assert!(gateway.mark_paid("pay_missing").await.is_err());
    }
}
