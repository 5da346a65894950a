// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! Environment-based configuration management for production deployment

use crate::constants::{defaults, env_keys, limits};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite { path: PathBuf },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from a connection string
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite:").unwrap_or(s);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Convert to a sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        DatabaseUrl::parse_url(defaults::DATABASE_URL)
    }
}

/// Database configuration section
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// Connection URL
    pub url: DatabaseUrl,
}

/// Payment gateway configuration section
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Gateway API base URL
    pub base_url: String,
    /// Merchant identifier issued by the gateway
    pub merchant_id: String,
    /// Shared secret for request signing and webhook verification
    pub shared_secret: String,
    /// Charge creation timeout
    pub create_timeout: Duration,
    /// Status / cancellation timeout
    pub status_timeout: Duration,
    /// Use the built-in mock gateway (development and tests)
    pub use_mock: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::PAYMENT_GATEWAY_URL.to_owned(),
            merchant_id: String::new(),
            shared_secret: String::new(),
            create_timeout: Duration::from_secs(limits::GATEWAY_CREATE_TIMEOUT_SECS),
            status_timeout: Duration::from_secs(limits::GATEWAY_STATUS_TIMEOUT_SECS),
            use_mock: false,
        }
    }
}

/// Complete server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database section
    pub database: DatabaseConfig,
    /// Payment gateway section
    pub gateway: GatewayConfig,
    /// Comma-separated CORS origin allowlist; empty or "*" allows any origin
    pub cors_allowed_origins: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a present variable fails to parse, or when the
    /// gateway secret is missing outside mock mode in production.
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var(env_keys::HTTP_PORT) {
            Ok(port) => port
                .parse::<u16>()
                .with_context(|| format!("Invalid {} value: {port}", env_keys::HTTP_PORT))?,
            Err(_) => defaults::HTTP_PORT,
        };

        let environment = Environment::from_str_or_default(
            &env::var(env_keys::ENVIRONMENT).unwrap_or_default(),
        );

        let database = DatabaseConfig {
            url: env::var(env_keys::DATABASE_URL)
                .map_or_else(|_| DatabaseUrl::default(), |s| DatabaseUrl::parse_url(&s)),
        };

        let use_mock = env::var(env_keys::PAYMENT_MOCK_GATEWAY)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let gateway = GatewayConfig {
            base_url: env::var(env_keys::PAYMENT_GATEWAY_URL)
                .unwrap_or_else(|_| defaults::PAYMENT_GATEWAY_URL.to_owned()),
            merchant_id: env::var(env_keys::PAYMENT_MERCHANT_ID).unwrap_or_default(),
            shared_secret: env::var(env_keys::PAYMENT_SHARED_SECRET).unwrap_or_default(),
            create_timeout: Duration::from_secs(limits::GATEWAY_CREATE_TIMEOUT_SECS),
            status_timeout: Duration::from_secs(limits::GATEWAY_STATUS_TIMEOUT_SECS),
            use_mock,
        };

        if environment.is_production() && !gateway.use_mock && gateway.shared_secret.is_empty() {
            anyhow::bail!(
                "{} must be set in production (or enable {})",
                env_keys::PAYMENT_SHARED_SECRET,
                env_keys::PAYMENT_MOCK_GATEWAY
            );
        }

        Ok(Self {
            http_port,
            environment,
            database,
            gateway,
            cors_allowed_origins: env::var(env_keys::CORS_ALLOWED_ORIGINS).unwrap_or_default(),
        })
    }

    /// One-line configuration summary for startup logs; never includes secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "env={} port={} database={} gateway={} mock_gateway={}",
            self.environment,
            self.http_port,
            self.database.url.to_connection_string(),
            self.gateway.base_url,
            self.gateway.use_mock
        )
    }
}
