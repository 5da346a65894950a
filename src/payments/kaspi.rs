// ABOUTME: Kaspi QR payment gateway client with signed requests and bounded timeouts
// ABOUTME: Implements charge creation, status polling, and cancellation over HTTPS
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! Kaspi QR gateway client.
//!
//! Every request body is signed with the shared secret (see
//! [`super::signature`]) before it leaves the process. Charge creation waits
//! up to 30 seconds; status and cancellation calls get 10 — slow responses
//! surface as `EXTERNAL_TIMEOUT`, never hang a request handler.

use super::signature::{sign, SIGNATURE_FIELD};
use super::{
    ChargeCancelled, ChargeCreated, ChargeRequest, ChargeStatus, PaymentGateway, PaymentState,
};
use crate::config::GatewayConfig;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Name used in error messages for this collaborator
const SERVICE_NAME: &str = "Kaspi QR gateway";

/// Kaspi QR gateway client
pub struct KaspiClient {
    config: GatewayConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CreateChargeResponse {
    qr_code: String,
    qr_image: String,
    payment_id: String,
    deeplink: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ChargeStatusResponse {
    payment_status: String,
    amount: i64,
    currency: String,
    order_id: String,
    transaction_id: Option<String>,
    paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct CancelChargeResponse {
    ok: bool,
    message: Option<String>,
}

impl KaspiClient {
    /// Create a new gateway client
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Sign `fields` and POST them as JSON to `path`
    async fn post_signed(
        &self,
        path: &str,
        mut fields: BTreeMap<String, String>,
        timeout: std::time::Duration,
    ) -> AppResult<reqwest::Response> {
        let signature = sign(&fields, &self.config.shared_secret);
        fields.insert(SIGNATURE_FIELD.to_owned(), signature);

        let url = format!("{}{path}", self.config.base_url);
        debug!(url = %url, "Calling payment gateway");

        let response = self
            .http_client
            .post(&url)
            .timeout(timeout)
            .json(&fields)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::external_timeout(SERVICE_NAME)
                } else {
                    AppError::external_service(SERVICE_NAME, e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Gateway returned an error response");
            return Err(AppError::external_service(
                SERVICE_NAME,
                format!("HTTP {status}: {body}"),
            ));
        }

        Ok(response)
    }
}

#[async_trait]
impl PaymentGateway for KaspiClient {
    async fn create_charge(&self, request: &ChargeRequest) -> AppResult<ChargeCreated> {
        let mut fields = BTreeMap::new();
        fields.insert("merchant_id".to_owned(), self.config.merchant_id.clone());
        fields.insert("amount".to_owned(), request.amount.to_string());
        fields.insert("currency".to_owned(), request.currency.clone());
        fields.insert("order_id".to_owned(), request.order_id.clone());
        fields.insert("client_id".to_owned(), request.client_id.to_string());
        fields.insert("description".to_owned(), request.description.clone());

        let response = self
            .post_signed("/payment/create", fields, self.config.create_timeout)
            .await?;

        let created: CreateChargeResponse = response.json().await.map_err(|e| {
            AppError::external_service(SERVICE_NAME, format!("JSON parse error: {e}"))
        })?;

        Ok(ChargeCreated {
            qr_code: created.qr_code,
            qr_image: created.qr_image,
            payment_id: created.payment_id,
            deeplink: created.deeplink,
            expires_at: created.expires_at,
        })
    }

    async fn charge_status(&self, payment_id: &str) -> AppResult<ChargeStatus> {
        let mut fields = BTreeMap::new();
        fields.insert("merchant_id".to_owned(), self.config.merchant_id.clone());
        fields.insert("payment_id".to_owned(), payment_id.to_owned());

        let response = self
            .post_signed("/payment/status", fields, self.config.status_timeout)
            .await?;

        let status: ChargeStatusResponse = response.json().await.map_err(|e| {
            AppError::external_service(SERVICE_NAME, format!("JSON parse error: {e}"))
        })?;

        Ok(ChargeStatus {
            payment_status: PaymentState::from_gateway_string(&status.payment_status),
            amount: status.amount,
            currency: status.currency,
            order_id: status.order_id,
            transaction_id: status.transaction_id,
            paid_at: status.paid_at,
        })
    }

    async fn cancel_charge(&self, payment_id: &str) -> AppResult<ChargeCancelled> {
        let mut fields = BTreeMap::new();
        fields.insert("merchant_id".to_owned(), self.config.merchant_id.clone());
        fields.insert("payment_id".to_owned(), payment_id.to_owned());

        let response = self
            .post_signed("/payment/cancel", fields, self.config.status_timeout)
            .await?;

        let cancelled: CancelChargeResponse = response.json().await.map_err(|e| {
            AppError::external_service(SERVICE_NAME, format!("JSON parse error: {e}"))
        })?;

        Ok(ChargeCancelled {
            ok: cancelled.ok,
            message: cancelled.message.unwrap_or_default(),
        })
    }
}
