// ABOUTME: Integration tests for the registration wizard state machine
// ABOUTME: Step navigation, per-step validation gates, and the submit guard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use trenera_core::models::{ContactInfo, LocationInfo, OrganizationType, ServicePackage};
use trenera_core::registration::{RegistrationStep, RegistrationWizard};

fn package() -> ServicePackage {
    ServicePackage {
        name: "8 group sessions".into(),
        description: "Morning strength classes".into(),
        price: 24_000,
        currency: "KZT".into(),
        duration_days: Some(30),
        session_count: Some(8),
        features: vec!["Towels included".into()],
        popular: true,
    }
}

/// Fill the draft so every blocking validator passes
fn fill_required_sections(wizard: &mut RegistrationWizard) {
    let draft = wizard.draft_mut();
    draft.set_basic(
        "Iron Temple".into(),
        OrganizationType::Gym,
        "Strength and conditioning".into(),
        vec!["strength".into(), "conditioning".into()],
    );
    draft.set_contact(ContactInfo {
        phones: vec!["+7 701 000 00 00".into()],
        emails: vec!["front@irontemple.kz".into()],
    });
    draft.set_location(LocationInfo {
        city: "Almaty".into(),
        address: "Abay ave 10".into(),
        latitude: None,
        longitude: None,
    });
    draft.add_package(package()).unwrap();
}

#[test]
fn advance_from_basic_with_empty_name_is_blocked() {
    let mut wizard = RegistrationWizard::new();
    assert_eq!(wizard.current_step(), RegistrationStep::Basic);

    let errors = wizard.advance().unwrap_err();
    assert!(errors.contains_key("name"));
    // The caller stays on the basic step; nothing was lost.
    assert_eq!(wizard.current_step(), RegistrationStep::Basic);
}

#[test]
fn validated_steps_unlock_one_at_a_time() {
    let mut wizard = RegistrationWizard::new();
    wizard.draft_mut().set_basic(
        "Iron Temple".into(),
        OrganizationType::Gym,
        String::new(),
        vec!["strength".into()],
    );

    assert_eq!(wizard.advance().unwrap(), RegistrationStep::Contact);

    // Contact data is still missing, so the wizard stays put.
    let errors = wizard.advance().unwrap_err();
    assert!(errors.contains_key("phones"));
    assert!(errors.contains_key("emails"));
    assert_eq!(wizard.current_step(), RegistrationStep::Contact);
}

#[test]
fn retreat_never_validates() {
    let mut wizard = RegistrationWizard::new();
    wizard.draft_mut().set_basic(
        "Iron Temple".into(),
        OrganizationType::Gym,
        String::new(),
        vec!["strength".into()],
    );
    wizard.advance().unwrap();

    // Blank out the name; going backward is still allowed.
    wizard.draft_mut().name = String::new();
    assert_eq!(wizard.retreat(), RegistrationStep::Basic);
    // And backward again is a no-op at the first step.
    assert_eq!(wizard.retreat(), RegistrationStep::Basic);
}

#[test]
fn optional_steps_pass_through_to_review() {
    let mut wizard = RegistrationWizard::new();
    fill_required_sections(&mut wizard);

    let expected = [
        RegistrationStep::Contact,
        RegistrationStep::Location,
        RegistrationStep::Services,
        RegistrationStep::Legal,
        RegistrationStep::Media,
        RegistrationStep::Social,
        RegistrationStep::Trainers,
        RegistrationStep::Review,
    ];
    for step in expected {
        assert_eq!(wizard.advance().unwrap(), step);
    }

    assert!(wizard.current_step().is_review());
    assert!(wizard.can_submit());
}

#[test]
fn submit_guard_reruns_every_blocking_validator() {
    let mut wizard = RegistrationWizard::new();
    fill_required_sections(&mut wizard);
    while !wizard.current_step().is_review() {
        wizard.advance().unwrap();
    }

    // Dropping the only package after the services step invalidates submit.
    wizard.draft_mut().remove_package(0);
    assert!(!wizard.can_submit());
    let errors = wizard.validate_submission();
    assert!(errors.contains_key("packages"));
}

#[test]
fn submit_is_only_available_on_the_review_step() {
    let mut wizard = RegistrationWizard::new();
    fill_required_sections(&mut wizard);
    // Fully valid draft, but the wizard is still on the basic step.
    assert!(wizard.validate_submission().is_empty());
    assert!(!wizard.can_submit());
}

#[test]
fn section_update_preserves_sibling_fields() {
    let mut wizard = RegistrationWizard::new();
    wizard.draft_mut().set_contact(ContactInfo {
        phones: vec!["1".into()],
        emails: vec!["a@b.com".into()],
    });

    let current = wizard.draft().contact.clone();
    wizard.draft_mut().set_contact(ContactInfo {
        phones: vec!["1".into(), "2".into()],
        ..current
    });

    assert_eq!(wizard.draft().contact.phones, vec!["1", "2"]);
    assert_eq!(wizard.draft().contact.emails, vec!["a@b.com"]);
}

#[test]
fn resumed_wizard_continues_where_it_left_off() {
    let mut original = RegistrationWizard::new();
    fill_required_sections(&mut original);
    original.advance().unwrap();

    let resumed =
        RegistrationWizard::resume(original.current_step(), original.draft().clone());
    assert_eq!(resumed.current_step(), RegistrationStep::Contact);
    assert_eq!(resumed.draft().name, "Iron Temple");
}
