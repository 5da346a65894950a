// ABOUTME: Payment gateway abstraction for QR charge creation, status, and cancellation
// ABOUTME: Trait contract plus signed-request plumbing shared by the real and mock gateways
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! # Payment Gateway
//!
//! The core depends on this trait, not on a concrete provider. The Kaspi QR
//! client implements it over signed HTTP; the mock implements it in memory
//! for development and tests. Every outbound request carries a deterministic
//! signature (see [`signature`]); inbound webhooks are verified the same way.

/// Kaspi QR gateway client
pub mod kaspi;

/// In-memory gateway for development and tests
pub mod mock;

/// Deterministic request signing and webhook verification
pub mod signature;

pub use kaspi::KaspiClient;
pub use mock::MockGateway;

use crate::errors::AppResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// State of a charge as reported by the gateway
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    /// Charge created, QR not yet scanned or payment in flight
    Pending,
    /// Payment confirmed
    Paid,
    /// Charge cancelled before payment
    Cancelled,
    /// Payment failed or rejected
    Failed,
}

impl PaymentState {
    /// Map a gateway status string onto the closed state set
    #[must_use]
    pub fn from_gateway_string(s: &str) -> Self {
        match s {
            "Wait" | "Pending" | "Created" => Self::Pending,
            "Processed" | "Paid" => Self::Paid,
            "Cancelled" | "Canceled" => Self::Cancelled,
            _ => {
                tracing::warn!("Unknown gateway payment status '{}', treating as Failed", s);
                Self::Failed
            }
        }
    }

    /// Whether the charge reached a successful terminal state
    #[must_use]
    pub const fn is_paid(self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// Request to create a QR charge
#[derive(Debug, Clone, Serialize)]
pub struct ChargeRequest {
    /// Amount in minor units
    pub amount: u64,
    /// ISO currency code
    pub currency: String,
    /// Our order identifier, echoed back by the gateway
    pub order_id: String,
    /// Purchasing client
    pub client_id: Uuid,
    /// Human-readable charge description
    pub description: String,
}

/// A created charge, ready to be presented as a QR code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeCreated {
    /// QR payload string
    pub qr_code: String,
    /// Rendered QR image (data URL)
    pub qr_image: String,
    /// Gateway-issued payment identifier
    pub payment_id: String,
    /// Mobile app deeplink for the same charge
    pub deeplink: String,
    /// When the QR stops being payable
    pub expires_at: DateTime<Utc>,
}

/// Current status of a charge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeStatus {
    /// Charge state
    pub payment_status: PaymentState,
    /// Amount in minor units
    pub amount: i64,
    /// ISO currency code
    pub currency: String,
    /// Our order identifier
    pub order_id: String,
    /// Gateway transaction id, present once paid
    pub transaction_id: Option<String>,
    /// When the payment was confirmed, present once paid
    pub paid_at: Option<DateTime<Utc>>,
}

/// Result of a cancellation attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeCancelled {
    /// Whether the gateway accepted the cancellation
    pub ok: bool,
    /// Gateway-provided explanation
    pub message: String,
}

/// Contract every payment gateway backend implements
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a QR charge for the given order
    async fn create_charge(&self, request: &ChargeRequest) -> AppResult<ChargeCreated>;

    /// Query the current status of a charge
    async fn charge_status(&self, payment_id: &str) -> AppResult<ChargeStatus>;

    /// Cancel a pending charge
    async fn cancel_charge(&self, payment_id: &str) -> AppResult<ChargeCancelled>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_status_strings_map_onto_closed_state_set() {
        assert_eq!(
            PaymentState::from_gateway_string("Wait"),
            PaymentState::Pending
        );
        assert_eq!(
            PaymentState::from_gateway_string("Processed"),
            PaymentState::Paid
        );
        assert_eq!(
            PaymentState::from_gateway_string("Cancelled"),
            PaymentState::Cancelled
        );
        assert_eq!(
            PaymentState::from_gateway_string("SomethingNew"),
            PaymentState::Failed
        );
        assert!(PaymentState::Paid.is_paid());
        assert!(!PaymentState::Pending.is_paid());
    }
}
