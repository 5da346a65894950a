// ABOUTME: Multi-step organization registration wizard state machine
// ABOUTME: Fixed step order, validated forward navigation, unconditional backward navigation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

//! # Registration Wizard
//!
//! Drives an organization through a fixed, ordered sequence of steps,
//! accumulating an [`OrganizationDraft`]. Forward navigation is blocked until
//! the current step's validator passes; backward navigation never validates.
//!
//! Step dispatch is an exhaustive `match` over [`RegistrationStep`], so adding
//! a step without wiring its validator is a compile error. Validation
//! failures are data ([`FieldErrors`]), never `Err` — the caller redisplays
//! them inline and no draft state is lost.

/// Accumulating organization draft and its section update functions
pub mod draft;

/// Pure per-step validators
pub mod validators;

pub use draft::OrganizationDraft;
pub use validators::{validate_step, validate_submission, FieldErrors, SUPPORTED_CITIES};

/// The fixed, ordered steps of organization registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStep {
    /// Name, category, description, specializations
    Basic,
    /// Phones and emails
    Contact,
    /// City and address
    Location,
    /// Service packages on offer
    Services,
    /// Legal entity details (optional)
    Legal,
    /// Logo, cover, gallery (optional)
    Media,
    /// Social and messenger links (optional)
    Social,
    /// Trainer roster (optional)
    Trainers,
    /// Final review; submission happens here
    Review,
}

impl RegistrationStep {
    /// All steps in wizard order
    pub const ALL: [Self; 9] = [
        Self::Basic,
        Self::Contact,
        Self::Location,
        Self::Services,
        Self::Legal,
        Self::Media,
        Self::Social,
        Self::Trainers,
        Self::Review,
    ];

    /// The step the wizard opens on
    #[must_use]
    pub const fn first() -> Self {
        Self::Basic
    }

    /// Position of this step in wizard order
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// The step after this one, if any
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// The step before this one, if any
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(|i| Self::ALL.get(i)).copied()
    }

    /// Whether this is the first step (retreat is blocked here)
    #[must_use]
    pub fn is_first(self) -> bool {
        self == Self::first()
    }

    /// Whether this is the terminal review step (submit is available here)
    #[must_use]
    pub const fn is_review(self) -> bool {
        matches!(self, Self::Review)
    }

    /// Stable name for logging and error messages
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Contact => "contact",
            Self::Location => "location",
            Self::Services => "services",
            Self::Legal => "legal",
            Self::Media => "media",
            Self::Social => "social",
            Self::Trainers => "trainers",
            Self::Review => "review",
        }
    }
}

/// Registration wizard: current step plus the accumulating draft
#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    step: RegistrationStep,
    draft: OrganizationDraft,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    /// Open the wizard at the first step with a defaulted draft
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: RegistrationStep::first(),
            draft: OrganizationDraft::new(),
        }
    }

    /// Resume a wizard from previously saved state
    #[must_use]
    pub const fn resume(step: RegistrationStep, draft: OrganizationDraft) -> Self {
        Self { step, draft }
    }

    /// The step the wizard is currently on
    #[must_use]
    pub const fn current_step(&self) -> RegistrationStep {
        self.step
    }

    /// Read access to the accumulated draft
    #[must_use]
    pub const fn draft(&self) -> &OrganizationDraft {
        &self.draft
    }

    /// Mutable access to the draft for section updates
    pub fn draft_mut(&mut self) -> &mut OrganizationDraft {
        &mut self.draft
    }

    /// Validate the current step and, on success, move forward by one.
    ///
    /// Returns the field-error map on failure; the step does not change and
    /// no draft state is lost. At the review step there is no further step —
    /// a passing validation leaves the wizard on review, where
    /// [`Self::validate_submission`] gates the actual submit.
    pub fn advance(&mut self) -> Result<RegistrationStep, FieldErrors> {
        let errors = validate_step(self.step, &self.draft);
        if !errors.is_empty() {
            tracing::debug!(
                step = self.step.as_str(),
                fields = errors.len(),
                "Step validation failed"
            );
            return Err(errors);
        }
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Move back one step. Never validates; blocked (no-op) at the first step.
    pub fn retreat(&mut self) -> RegistrationStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Run every blocking validator over the draft, as the submit guard does
    #[must_use]
    pub fn validate_submission(&self) -> FieldErrors {
        validate_submission(&self.draft)
    }

    /// Whether submission is available: on the review step with a fully valid draft
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.step.is_review() && self.validate_submission().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_ordered_and_linked() {
        assert_eq!(RegistrationStep::first(), RegistrationStep::Basic);
        assert_eq!(
            RegistrationStep::Basic.next(),
            Some(RegistrationStep::Contact)
        );
        assert_eq!(RegistrationStep::Review.next(), None);
        assert_eq!(RegistrationStep::Basic.previous(), None);
        assert_eq!(
            RegistrationStep::Review.previous(),
            Some(RegistrationStep::Trainers)
        );

        // Walking next() from the first step visits every step once.
        let mut walked = vec![RegistrationStep::first()];
        while let Some(next) = walked.last().and_then(|s| s.next()) {
            walked.push(next);
        }
        assert_eq!(walked, RegistrationStep::ALL);
    }

    #[test]
    fn retreat_is_blocked_at_the_first_step() {
        let mut wizard = RegistrationWizard::new();
        assert_eq!(wizard.retreat(), RegistrationStep::Basic);
        assert_eq!(wizard.current_step(), RegistrationStep::Basic);
    }
}
