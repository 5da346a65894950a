// ABOUTME: Accumulating organization draft built across wizard steps
// ABOUTME: Whole-section replacement updates; no deep-merge, no silent field loss
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! The organization draft and its update functions.
//!
//! Updates replace whole typed sections. Replacing `contact` with a value
//! built from the current contact plus new phones cannot drop the emails —
//! the sibling fields travel inside the same struct. There is no key-wise
//! merge anywhere.

use crate::models::{
    ColorScheme, ContactInfo, LegalInfo, LocationInfo, MediaInfo, Organization, OrganizationType,
    ServicePackage, SocialLinks, TrainerStub, WorkingHours,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validators::FieldErrors;

/// Accumulated, possibly incomplete organization under registration.
///
/// Created with sane defaults when the wizard opens; only the fields required
/// by already-passed steps are guaranteed well-formed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationDraft {
    /// Display name (basic step)
    pub name: String,
    /// Marketplace category (basic step)
    pub org_type: Option<OrganizationType>,
    /// Free-text description (basic step, optional)
    pub description: String,
    /// Specialization tags (basic step)
    pub specializations: Vec<String>,
    /// Service packages on offer (services step)
    pub packages: Vec<ServicePackage>,
    /// Contact details (contact step)
    pub contact: ContactInfo,
    /// Physical location (location step)
    pub location: LocationInfo,
    /// Legal details (optional step)
    pub legal: LegalInfo,
    /// Imagery (optional step)
    pub media: MediaInfo,
    /// Social links (optional step)
    pub social: SocialLinks,
    /// Trainer roster (optional step)
    pub trainers: Vec<TrainerStub>,
    /// Opening hours, defaulted at creation
    pub working_hours: WorkingHours,
    /// Brand colors, defaulted at creation
    pub color_scheme: ColorScheme,
}

impl OrganizationDraft {
    /// Create an empty draft with default working hours and colors
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the basic-info section
    pub fn set_basic(
        &mut self,
        name: String,
        org_type: OrganizationType,
        description: String,
        specializations: Vec<String>,
    ) {
        self.name = name;
        self.org_type = Some(org_type);
        self.description = description;
        self.specializations = specializations;
    }

    /// Replace the whole contact section
    pub fn set_contact(&mut self, contact: ContactInfo) {
        self.contact = contact;
    }

    /// Replace the whole location section
    pub fn set_location(&mut self, location: LocationInfo) {
        self.location = location;
    }

    /// Replace the whole legal section
    pub fn set_legal(&mut self, legal: LegalInfo) {
        self.legal = legal;
    }

    /// Replace the whole media section
    pub fn set_media(&mut self, media: MediaInfo) {
        self.media = media;
    }

    /// Replace the whole social-links section
    pub fn set_social(&mut self, social: SocialLinks) {
        self.social = social;
    }

    /// Replace the trainer roster
    pub fn set_trainers(&mut self, trainers: Vec<TrainerStub>) {
        self.trainers = trainers;
    }

    /// Replace the opening hours
    pub fn set_working_hours(&mut self, working_hours: WorkingHours) {
        self.working_hours = working_hours;
    }

    /// Replace the brand colors
    pub fn set_color_scheme(&mut self, color_scheme: ColorScheme) {
        self.color_scheme = color_scheme;
    }

    /// Append a service package to the draft.
    ///
    /// A package must carry a non-empty name and a positive price before it
    /// may be saved; violations come back as a field-error map keyed like the
    /// package form.
    pub fn add_package(&mut self, package: ServicePackage) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if package.name.trim().is_empty() {
            errors.insert("name".into(), "Package name is required".into());
        }
        if package.price == 0 {
            errors.insert("price".into(), "Price must be greater than zero".into());
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        self.packages.push(package);
        Ok(())
    }

    /// Remove a package by position; out-of-range indexes are ignored
    pub fn remove_package(&mut self, index: usize) {
        if index < self.packages.len() {
            self.packages.remove(index);
        }
    }

    /// Turn a fully validated draft into a persistable organization.
    ///
    /// Callers run [`super::validate_submission`] first; a missing category
    /// after that guard is unreachable, so the default keeps this total
    /// rather than panicking.
    #[must_use]
    pub fn into_organization(self, now: DateTime<Utc>) -> Organization {
        Organization {
            id: Uuid::new_v4(),
            name: self.name,
            org_type: self.org_type.unwrap_or(OrganizationType::Gym),
            description: self.description,
            specializations: self.specializations,
            packages: self.packages,
            contact: self.contact,
            location: self.location,
            legal: self.legal,
            media: self.media,
            social: self.social,
            trainers: self.trainers,
            working_hours: self.working_hours,
            color_scheme: self.color_scheme,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_working_hours_and_colors() {
        let draft = OrganizationDraft::new();
        assert_eq!(draft.working_hours.open_time, "08:00");
        assert_eq!(draft.color_scheme, ColorScheme::default());
        assert!(draft.name.is_empty());
        assert!(draft.org_type.is_none());
    }

    #[test]
    fn replacing_contact_phones_keeps_emails() {
        let mut draft = OrganizationDraft::new();
        draft.set_contact(ContactInfo {
            phones: vec!["1".into()],
            emails: vec!["a@b.com".into()],
        });

        // A phone-only edit rebuilds the section from the current value.
        let updated = ContactInfo {
            phones: vec!["1".into(), "2".into()],
            ..draft.contact.clone()
        };
        draft.set_contact(updated);

        assert_eq!(draft.contact.phones, vec!["1", "2"]);
        assert_eq!(draft.contact.emails, vec!["a@b.com"]);
    }

    #[test]
    fn packages_require_name_and_positive_price() {
        let mut draft = OrganizationDraft::new();
        let bad = ServicePackage {
            name: "  ".into(),
            description: String::new(),
            price: 0,
            currency: "KZT".into(),
            duration_days: None,
            session_count: Some(8),
            features: vec![],
            popular: false,
        };
        let errors = draft.add_package(bad).unwrap_err();
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("price"));
        assert!(draft.packages.is_empty());

        let good = ServicePackage {
            name: "Morning yoga".into(),
            description: "8 group classes".into(),
            price: 20_000,
            currency: "KZT".into(),
            duration_days: Some(30),
            session_count: Some(8),
            features: vec!["Mats provided".into()],
            popular: true,
        };
        assert!(draft.add_package(good).is_ok());
        assert_eq!(draft.packages.len(), 1);
    }
}
