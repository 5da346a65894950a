// ABOUTME: Pure per-step validators for the registration wizard
// ABOUTME: Each validator maps a draft to a field-error map; empty map means the step passes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! Per-step draft validators.
//!
//! Validators are pure functions of the draft. They return a map from field
//! name to a displayable message; an empty map means the step may be left.
//! The legal, media, social, trainers and review steps carry no blocking
//! validation — they are optional by design.

use std::collections::BTreeMap;

use super::{OrganizationDraft, RegistrationStep};

/// Field-level validation errors, keyed by form field name.
///
/// Ordered map so error rendering and test assertions are deterministic.
pub type FieldErrors = BTreeMap<String, String>;

/// Cities the marketplace currently operates in
pub const SUPPORTED_CITIES: &[&str] = &[
    "Almaty",
    "Astana",
    "Shymkent",
    "Karaganda",
    "Aktobe",
    "Taraz",
    "Pavlodar",
    "Oskemen",
    "Atyrau",
    "Kostanay",
];

/// Run the validator registered for `step` against the draft
#[must_use]
pub fn validate_step(step: RegistrationStep, draft: &OrganizationDraft) -> FieldErrors {
    match step {
        RegistrationStep::Basic => validate_basic(draft),
        RegistrationStep::Contact => validate_contact(draft),
        RegistrationStep::Location => validate_location(draft),
        RegistrationStep::Services => validate_services(draft),
        // Optional steps: nothing blocks leaving them.
        RegistrationStep::Legal
        | RegistrationStep::Media
        | RegistrationStep::Social
        | RegistrationStep::Trainers
        | RegistrationStep::Review => FieldErrors::new(),
    }
}

/// Run every blocking validator, as the submit guard does
#[must_use]
pub fn validate_submission(draft: &OrganizationDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.extend(validate_basic(draft));
    errors.extend(validate_contact(draft));
    errors.extend(validate_location(draft));
    errors.extend(validate_services(draft));
    errors
}

fn validate_basic(draft: &OrganizationDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if draft.name.trim().is_empty() {
        errors.insert("name".into(), "Organization name is required".into());
    }
    if draft.org_type.is_none() {
        errors.insert(
            "organization_type".into(),
            "Select an organization category".into(),
        );
    }
    if !draft.specializations.iter().any(|s| !s.trim().is_empty()) {
        errors.insert(
            "specializations".into(),
            "Select at least one specialization".into(),
        );
    }
    errors
}

fn validate_contact(draft: &OrganizationDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !draft.contact.phones.iter().any(|p| !p.trim().is_empty()) {
        errors.insert("phones".into(), "Add at least one phone number".into());
    }
    let has_valid_email = draft
        .contact
        .emails
        .iter()
        .any(|e| is_valid_email(e.trim()));
    if !has_valid_email {
        errors.insert("emails".into(), "Add at least one valid email".into());
    }
    errors
}

fn validate_location(draft: &OrganizationDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let city = draft.location.city.trim();
    if !SUPPORTED_CITIES.contains(&city) {
        errors.insert("city".into(), "Select a city from the list".into());
    }
    if draft.location.address.trim().is_empty() {
        errors.insert("address".into(), "Address is required".into());
    }
    errors
}

fn validate_services(draft: &OrganizationDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if draft.packages.is_empty() {
        errors.insert("packages".into(), "Add at least one service package".into());
    }
    errors
}

/// Minimal syntactic email check: one `@`, non-empty local part, and a dot
/// inside the domain (not at its edges).
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.split_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContactInfo, LocationInfo, OrganizationType, ServicePackage};

    fn draft_with_basic() -> OrganizationDraft {
        let mut draft = OrganizationDraft::new();
        draft.set_basic(
            "Iron Temple".into(),
            OrganizationType::Gym,
            "Strength training".into(),
            vec!["strength".into()],
        );
        draft
    }

    #[test]
    fn empty_name_blocks_the_basic_step() {
        let draft = OrganizationDraft::new();
        let errors = validate_step(RegistrationStep::Basic, &draft);
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("organization_type"));
        assert!(errors.contains_key("specializations"));
    }

    #[test]
    fn basic_step_passes_with_required_fields() {
        let draft = draft_with_basic();
        assert!(validate_step(RegistrationStep::Basic, &draft).is_empty());
    }

    #[test]
    fn contact_requires_phone_and_valid_email() {
        let mut draft = draft_with_basic();
        draft.set_contact(ContactInfo {
            phones: vec!["   ".into()],
            emails: vec!["not-an-email".into()],
        });
        let errors = validate_step(RegistrationStep::Contact, &draft);
        assert!(errors.contains_key("phones"));
        assert!(errors.contains_key("emails"));

        draft.set_contact(ContactInfo {
            phones: vec!["+7 701 000 00 00".into()],
            emails: vec!["front@irontemple.kz".into()],
        });
        assert!(validate_step(RegistrationStep::Contact, &draft).is_empty());
    }

    #[test]
    fn location_requires_supported_city() {
        let mut draft = draft_with_basic();
        draft.set_location(LocationInfo {
            city: "Gotham".into(),
            address: "Abay ave 10".into(),
            latitude: None,
            longitude: None,
        });
        let errors = validate_step(RegistrationStep::Location, &draft);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("city"));
    }

    #[test]
    fn optional_steps_never_block() {
        let draft = OrganizationDraft::new();
        for step in [
            RegistrationStep::Legal,
            RegistrationStep::Media,
            RegistrationStep::Social,
            RegistrationStep::Trainers,
            RegistrationStep::Review,
        ] {
            assert!(validate_step(step, &draft).is_empty(), "step {step:?}");
        }
    }

    #[test]
    fn services_requires_at_least_one_package() {
        let mut draft = draft_with_basic();
        assert!(validate_step(RegistrationStep::Services, &draft).contains_key("packages"));

        draft
            .add_package(ServicePackage {
                name: "8 sessions".into(),
                description: String::new(),
                price: 20_000,
                currency: "KZT".into(),
                duration_days: Some(30),
                session_count: Some(8),
                features: vec![],
                popular: false,
            })
            .unwrap();
        assert!(validate_step(RegistrationStep::Services, &draft).is_empty());
    }

    #[test]
    fn email_syntax_edge_cases() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@sub.domain.kz"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("plain"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@bcom"));
        assert!(!is_valid_email("a@b@c.com"));
    }
}
