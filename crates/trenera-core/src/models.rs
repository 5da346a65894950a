// ABOUTME: Core data models for the Trenera fitness marketplace
// ABOUTME: Defines Organization, ServicePackage, Subscription and related domain types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! Domain models shared across the platform.
//!
//! Subscriptions carry their own package history so "what did this client
//! buy before" stays answerable even after a record leaves the `Active`
//! status. Status transitions are strictly `Active -> Expired` (time) and
//! `Active -> Cancelled` (explicit); both end states are terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Seconds in one day, used for day-granular expiry arithmetic.
const SECONDS_PER_DAY: i64 = 86_400;

/// Organization category in the marketplace
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationType {
    /// Full-service gym with equipment floor
    Gym,
    /// Group-class fitness studio
    FitnessStudio,
    /// Yoga or pilates studio
    YogaStudio,
    /// Crossfit box
    CrossfitBox,
    /// Martial arts school
    MartialArts,
    /// Dance school
    DanceStudio,
    /// Swimming pool / aquatics center
    Pool,
    /// Individual personal trainer
    PersonalTrainer,
}

impl OrganizationType {
    /// Convert from database string
    #[must_use]
    pub fn from_db_string(s: &str) -> Self {
        match s {
            "gym" => Self::Gym,
            "fitness_studio" => Self::FitnessStudio,
            "yoga_studio" => Self::YogaStudio,
            "crossfit_box" => Self::CrossfitBox,
            "martial_arts" => Self::MartialArts,
            "dance_studio" => Self::DanceStudio,
            "pool" => Self::Pool,
            "personal_trainer" => Self::PersonalTrainer,
            _ => {
                tracing::warn!("Unknown organization type '{}', defaulting to Gym", s);
                Self::Gym
            }
        }
    }

    /// Convert to database string
    #[must_use]
    pub const fn to_db_string(self) -> &'static str {
        match self {
            Self::Gym => "gym",
            Self::FitnessStudio => "fitness_studio",
            Self::YogaStudio => "yoga_studio",
            Self::CrossfitBox => "crossfit_box",
            Self::MartialArts => "martial_arts",
            Self::DanceStudio => "dance_studio",
            Self::Pool => "pool",
            Self::PersonalTrainer => "personal_trainer",
        }
    }
}

/// Contact details for an organization
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContactInfo {
    /// Phone numbers, at least one required at the contact step
    pub phones: Vec<String>,
    /// Email addresses, at least one required at the contact step
    pub emails: Vec<String>,
}

/// Physical location of an organization
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocationInfo {
    /// City, must come from the supported city list
    pub city: String,
    /// Street address within the city
    pub address: String,
    /// Optional map latitude
    pub latitude: Option<f64>,
    /// Optional map longitude
    pub longitude: Option<f64>,
}

/// Legal registration details (optional step)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LegalInfo {
    /// Registered legal entity name
    pub legal_name: Option<String>,
    /// State registration number
    pub registration_number: Option<String>,
    /// Settlement account for payouts
    pub bank_account: Option<String>,
}

/// Logo, cover and gallery imagery (optional step)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MediaInfo {
    /// Logo image URL
    pub logo_url: Option<String>,
    /// Cover/banner image URL
    pub cover_url: Option<String>,
    /// Additional gallery image URLs
    pub gallery: Vec<String>,
}

/// Social and messenger links (optional step)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SocialLinks {
    /// Instagram profile URL
    pub instagram: Option<String>,
    /// Telegram channel or contact
    pub telegram: Option<String>,
    /// WhatsApp contact number
    pub whatsapp: Option<String>,
    /// Organization website
    pub website: Option<String>,
}

/// Trainer stub collected during registration (optional step)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TrainerStub {
    /// Trainer display name
    pub name: String,
    /// Primary specialization
    pub specialization: Option<String>,
    /// Profile photo URL
    pub photo_url: Option<String>,
}

/// Opening hours, defaulted when the registration wizard opens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WorkingHours {
    /// Daily opening time, "HH:MM"
    pub open_time: String,
    /// Daily closing time, "HH:MM"
    pub close_time: String,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            open_time: "08:00".into(),
            close_time: "22:00".into(),
        }
    }
}

/// Brand colors for the organization profile page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColorScheme {
    /// Primary brand color, hex
    pub primary: String,
    /// Secondary/accent color, hex
    pub secondary: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            primary: "#1D4ED8".into(),
            secondary: "#F97316".into(),
        }
    }
}

/// A purchasable service package offered by an organization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServicePackage {
    /// Package display name, non-empty
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Price in minor units, strictly positive
    pub price: u64,
    /// ISO currency code, e.g. "KZT"
    pub currency: String,
    /// Validity period in days, if limited
    pub duration_days: Option<u32>,
    /// Number of bookable sessions, if limited
    pub session_count: Option<u32>,
    /// Ordered feature bullet points
    #[serde(default)]
    pub features: Vec<String>,
    /// Highlighted as the popular choice
    #[serde(default)]
    pub popular: bool,
}

/// A registered organization in the marketplace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Unique organization identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Marketplace category
    pub org_type: OrganizationType,
    /// Free-text description
    pub description: String,
    /// Specialization tags, e.g. "strength", "stretching"
    pub specializations: Vec<String>,
    /// Offered service packages
    pub packages: Vec<ServicePackage>,
    /// Contact details
    pub contact: ContactInfo,
    /// Physical location
    pub location: LocationInfo,
    /// Legal registration details
    pub legal: LegalInfo,
    /// Imagery
    pub media: MediaInfo,
    /// Social links
    pub social: SocialLinks,
    /// Trainer roster collected at registration
    pub trainers: Vec<TrainerStub>,
    /// Opening hours
    pub working_hours: WorkingHours,
    /// Profile brand colors
    pub color_scheme: ColorScheme,
    /// When the organization was registered
    pub created_at: DateTime<Utc>,
}

/// Subscription lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Currently usable for session bookings
    Active,
    /// Validity period ran out (terminal)
    Expired,
    /// Explicitly cancelled (terminal)
    Cancelled,
}

impl SubscriptionStatus {
    /// Convert from database string
    #[must_use]
    pub fn from_db_string(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "expired" => Self::Expired,
            "cancelled" => Self::Cancelled,
            _ => {
                // Unknown statuses are treated as expired so they can never
                // authorize a session debit.
                tracing::warn!("Unknown subscription status '{}', treating as Expired", s);
                Self::Expired
            }
        }
    }

    /// Convert to database string
    #[must_use]
    pub const fn to_db_string(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

/// One prior purchase recorded against a subscription
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageHistoryEntry {
    /// Catalog package that was purchased
    pub package_id: String,
    /// When the purchase was confirmed
    pub purchased_at: DateTime<Utc>,
    /// Sessions granted by that purchase (-1 for unlimited)
    pub sessions: i32,
}

/// A client's subscription record in the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique subscription identifier
    pub id: Uuid,
    /// Owning client
    pub client_id: Uuid,
    /// Catalog package backing the current period
    pub package_id: String,
    /// Package display name at purchase time
    pub package_name: String,
    /// Lifecycle status
    pub status: SubscriptionStatus,
    /// Sessions left in the current period; authoritative only when not unlimited
    pub sessions_remaining: i32,
    /// Unlimited plans never decrement `sessions_remaining`
    pub is_unlimited: bool,
    /// Start of the current period
    pub activated_at: DateTime<Utc>,
    /// End of the current period
    pub expires_at: DateTime<Utc>,
}

impl Subscription {
    /// Create a new active subscription for a confirmed purchase.
    ///
    /// A negative `sessions` value is the unlimited sentinel used by the
    /// package catalog.
    #[must_use]
    pub fn from_purchase(
        client_id: Uuid,
        package_id: &str,
        package_name: &str,
        sessions: i32,
        duration_days: i64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            package_id: package_id.to_owned(),
            package_name: package_name.to_owned(),
            status: SubscriptionStatus::Active,
            sessions_remaining: sessions.max(0),
            is_unlimited: sessions < 0,
            activated_at: now,
            expires_at: now + chrono::Duration::days(duration_days),
        }
    }

    /// Whether the validity period has ended at `now`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Whole days remaining until expiry, rounded up; zero once expired
    #[must_use]
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        let seconds = (self.expires_at - now).num_seconds();
        if seconds <= 0 {
            0
        } else {
            (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
        }
    }
}

/// Subscription view returned by the API, augmented with derived fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionView {
    /// Subscription identifier
    pub id: Uuid,
    /// Owning client
    pub client_id: Uuid,
    /// Catalog package backing the current period
    pub package_id: String,
    /// Package display name
    pub package_name: String,
    /// Lifecycle status
    pub status: SubscriptionStatus,
    /// Sessions left; meaningful only when not unlimited
    pub sessions_remaining: i32,
    /// Unlimited flag
    pub is_unlimited: bool,
    /// Start of the current period
    pub activated_at: DateTime<Utc>,
    /// End of the current period
    pub expires_at: DateTime<Utc>,
    /// Whole days until expiry, rounded up
    pub days_remaining: i64,
}

impl SubscriptionView {
    /// Build the API view of a subscription as of `now`
    #[must_use]
    pub fn from_subscription(subscription: &Subscription, now: DateTime<Utc>) -> Self {
        Self {
            id: subscription.id,
            client_id: subscription.client_id,
            package_id: subscription.package_id.clone(),
            package_name: subscription.package_name.clone(),
            status: subscription.status,
            sessions_remaining: subscription.sessions_remaining,
            is_unlimited: subscription.is_unlimited,
            activated_at: subscription.activated_at,
            expires_at: subscription.expires_at,
            days_remaining: subscription.days_remaining(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_status_round_trips_through_db_strings() {
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::Expired,
            SubscriptionStatus::Cancelled,
        ] {
            assert_eq!(
                SubscriptionStatus::from_db_string(status.to_db_string()),
                status
            );
        }
    }

    #[test]
    fn unknown_status_never_authorizes_usage() {
        assert_eq!(
            SubscriptionStatus::from_db_string("halted"),
            SubscriptionStatus::Expired
        );
    }

    #[test]
    fn days_remaining_rounds_up_partial_days() {
        let now = Utc::now();
        let sub = Subscription::from_purchase(Uuid::new_v4(), "eight", "8 sessions", 8, 30, now);
        assert_eq!(sub.days_remaining(now), 30);

        // 29 days and one hour left still reads as 30 days
        let later = now + chrono::Duration::hours(23);
        assert_eq!(sub.days_remaining(later), 30);

        let past_expiry = now + chrono::Duration::days(31);
        assert_eq!(sub.days_remaining(past_expiry), 0);
        assert!(sub.is_expired_at(past_expiry));
    }

    #[test]
    fn unlimited_sentinel_sets_flag_and_clamps_counter() {
        let now = Utc::now();
        let sub =
            Subscription::from_purchase(Uuid::new_v4(), "unlimited", "Unlimited", -1, 30, now);
        assert!(sub.is_unlimited);
        assert_eq!(sub.sessions_remaining, 0);
    }
}
