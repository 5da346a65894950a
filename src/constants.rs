// ABOUTME: Application constants and default configuration values
// ABOUTME: Environment variable names, defaults, and limits in one place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! Application constants, grouped by concern.

/// Service identity strings
pub mod service_names {
    /// Canonical service name used in logs and health responses
    pub const TRENERA_SERVER: &str = "trenera-server";
}

/// Environment variable names read by [`crate::config`]
pub mod env_keys {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Deployment environment (development / production / testing)
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Database connection URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Payment gateway base URL
    pub const PAYMENT_GATEWAY_URL: &str = "PAYMENT_GATEWAY_URL";
    /// Merchant identifier issued by the payment gateway
    pub const PAYMENT_MERCHANT_ID: &str = "PAYMENT_MERCHANT_ID";
    /// Shared secret used to sign gateway requests and verify webhooks
    pub const PAYMENT_SHARED_SECRET: &str = "PAYMENT_SHARED_SECRET";
    /// Use the built-in mock gateway instead of the real client
    pub const PAYMENT_MOCK_GATEWAY: &str = "PAYMENT_MOCK_GATEWAY";
    /// Comma-separated CORS origin allowlist, or "*"
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
}

/// Default configuration values
pub mod defaults {
    /// Default HTTP listen port
    pub const HTTP_PORT: u16 = 8081;
    /// Default sqlite database location
    pub const DATABASE_URL: &str = "sqlite:./data/trenera.db";
    /// Default gateway base URL (sandbox)
    pub const PAYMENT_GATEWAY_URL: &str = "https://qr-api.sandbox.example.kz";
}

/// Operational limits and timeouts
pub mod limits {
    /// Charge creation timeout, seconds
    pub const GATEWAY_CREATE_TIMEOUT_SECS: u64 = 30;
    /// Charge status / cancellation timeout, seconds
    pub const GATEWAY_STATUS_TIMEOUT_SECS: u64 = 10;
    /// Maximum accepted request body, bytes
    pub const MAX_REQUEST_BODY_BYTES: usize = 256 * 1024;
    /// Whole-request timeout applied by middleware, seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}
