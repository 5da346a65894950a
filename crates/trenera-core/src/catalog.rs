// ABOUTME: Canonical package catalog for the default marketplace
// ABOUTME: Immutable ordered set of purchasable packages with pure lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! The canonical set of purchasable marketplace packages.
//!
//! Used by the purchase flow when creating a charge and by the ledger when a
//! confirmed payment turns into a subscription. There is no mutation API;
//! the catalog changes only with a release.

use serde::Serialize;

/// Session-count sentinel marking a package as unlimited
pub const UNLIMITED_SESSIONS: i32 = -1;

/// An immutable catalog package definition
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MarketplacePackage {
    /// Stable package identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Short description shown at purchase time
    pub description: &'static str,
    /// Price in minor units
    pub price: u64,
    /// ISO currency code
    pub currency: &'static str,
    /// Sessions granted, or [`UNLIMITED_SESSIONS`]
    pub sessions: i32,
    /// Validity period in days
    pub duration_days: i64,
}

impl MarketplacePackage {
    /// Whether this package grants unlimited sessions
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        self.sessions == UNLIMITED_SESSIONS
    }
}

/// The default marketplace catalog, in display order
static CATALOG: &[MarketplacePackage] = &[
    MarketplacePackage {
        id: "single",
        name: "Single visit",
        description: "One training session, valid for a week",
        price: 3_500,
        currency: "KZT",
        sessions: 1,
        duration_days: 7,
    },
    MarketplacePackage {
        id: "eight",
        name: "8 sessions",
        description: "Eight training sessions over a month",
        price: 24_000,
        currency: "KZT",
        sessions: 8,
        duration_days: 30,
    },
    MarketplacePackage {
        id: "twelve",
        name: "12 sessions",
        description: "Twelve training sessions over a month",
        price: 33_600,
        currency: "KZT",
        sessions: 12,
        duration_days: 30,
    },
    MarketplacePackage {
        id: "unlimited",
        name: "Unlimited",
        description: "Unlimited visits for a month",
        price: 45_000,
        currency: "KZT",
        sessions: UNLIMITED_SESSIONS,
        duration_days: 30,
    },
];

/// All catalog packages in display order
#[must_use]
pub fn all() -> &'static [MarketplacePackage] {
    CATALOG
}

/// Look up a package by its stable identifier
#[must_use]
pub fn find(package_id: &str) -> Option<&'static MarketplacePackage> {
    CATALOG.iter().find(|p| p.id == package_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_resolves_every_listed_package() {
        for package in all() {
            assert_eq!(find(package.id), Some(package));
        }
        assert!(find("gold-tier").is_none());
    }

    #[test]
    fn only_the_unlimited_package_carries_the_sentinel() {
        let unlimited: Vec<_> = all().iter().filter(|p| p.is_unlimited()).collect();
        assert_eq!(unlimited.len(), 1);
        assert_eq!(unlimited[0].id, "unlimited");
    }

    #[test]
    fn prices_are_positive() {
        assert!(all().iter().all(|p| p.price > 0));
    }
}
