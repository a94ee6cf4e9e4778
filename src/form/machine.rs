// Step State Machine - owns the form aggregate and every defined transition
//
// Linear track Step1 -> Step4, no skipping. Submission status is tracked
// alongside the step so a failed submission returns to step 4 for retry.

use thiserror::Error;

use crate::form::types::{FormFields, FormUpdate, Step, SubmissionStatus};
use crate::form::validator::{validate_step, ValidationErrors, MSG_CAPTCHA_REQUIRED};
use crate::form::Field;

/// Why a `begin_submit` call was rejected before reaching the adapter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitGate {
    #[error("a submission is already in flight")]
    AlreadySubmitting,
    #[error("the current step has validation errors")]
    ValidationFailed,
    #[error("security verification is incomplete")]
    CaptchaMissing,
}

/// The single in-memory aggregate for one form instance: current step, field
/// values, validation errors, and submission status.
#[derive(Debug, Default)]
pub struct FormMachine {
    step: Step,
    fields: FormFields,
    errors: ValidationErrors,
    status: SubmissionStatus,
    // Bumped on every submission attempt and reset; lets a scheduled reset
    // detect that it is stale.
    generation: u64,
}

impl FormMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> Step {
        self.step
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    /// Merge a partial update into the form data. For every field present in
    /// the update, that field's error entry is cleared optimistically; no
    /// re-validation happens here.
    pub fn update(&mut self, update: FormUpdate) {
        for field in update.touched() {
            self.errors.remove(&field);
        }
        update.apply_to(&mut self.fields);
    }

    /// Validate the current step and advance on success, clamped at the last
    /// step. Returns whether the step advanced.
    pub fn next_step(&mut self) -> bool {
        let errors = validate_step(self.step, &self.fields);
        if !errors.is_empty() {
            tracing::debug!(
                step = self.step.number(),
                error_count = errors.len(),
                "step validation failed, staying put"
            );
            self.errors = errors;
            return false;
        }
        self.errors.clear();
        let from = self.step;
        self.step = self.step.next();
        if from != self.step {
            tracing::info!(from = from.number(), to = self.step.number(), "advanced form step");
        }
        from != self.step
    }

    /// Step back unconditionally, clamped at the first step. Entered data on
    /// the step being left is preserved.
    pub fn prev_step(&mut self) {
        let from = self.step;
        self.step = self.step.prev();
        if from != self.step {
            tracing::info!(from = from.number(), to = self.step.number(), "went back a form step");
        }
    }

    /// Gate a submission attempt. On success the machine enters `Submitting`
    /// and a snapshot of the fields is returned for payload construction
    /// (cheap: attachment buffers are shared, not copied).
    ///
    /// Rejections leave the machine unchanged except for the captcha error
    /// entry, and never reach the submission adapter.
    pub fn begin_submit(&mut self) -> Result<FormFields, SubmitGate> {
        if self.status.is_submitting() {
            tracing::warn!("ignoring submit while a submission is in flight");
            return Err(SubmitGate::AlreadySubmitting);
        }

        let errors = validate_step(self.step, &self.fields);
        if !errors.is_empty() {
            self.errors = errors;
            return Err(SubmitGate::ValidationFailed);
        }

        if self.fields.captcha_token.trim().is_empty() {
            self.errors
                .insert(Field::CaptchaToken, MSG_CAPTCHA_REQUIRED.to_string());
            tracing::debug!("submit blocked: captcha token missing");
            return Err(SubmitGate::CaptchaMissing);
        }

        self.errors.clear();
        self.status = SubmissionStatus::Submitting;
        self.generation += 1;
        tracing::info!(generation = self.generation, "submission started");
        Ok(self.fields.clone())
    }

    /// Record a successful submission. Returns the generation to hand to the
    /// scheduled reset.
    pub fn submit_succeeded(&mut self, message: &str) -> u64 {
        self.status = SubmissionStatus::Succeeded(message.to_string());
        tracing::info!(generation = self.generation, "submission succeeded");
        self.generation
    }

    /// Record a failed submission. Fields and step are untouched so the user
    /// can retry from step 4 without re-entering anything.
    pub fn submit_failed(&mut self, message: &str) {
        self.status = SubmissionStatus::Failed(message.to_string());
        tracing::warn!(generation = self.generation, message, "submission failed");
    }

    /// Restore the mount-time defaults: empty fields, step 1, idle status.
    pub fn reset(&mut self) {
        self.fields = FormFields::default();
        self.errors.clear();
        self.step = Step::FIRST;
        self.status = SubmissionStatus::Idle;
        self.generation += 1;
        tracing::info!("form state reset to defaults");
    }

    /// Scheduled variant of [`reset`](Self::reset): only fires if no newer
    /// submission attempt or reset has happened since `generation` was
    /// captured, and only out of a `Succeeded` status.
    pub fn reset_if_generation(&mut self, generation: u64) {
        if self.generation == generation && matches!(self.status, SubmissionStatus::Succeeded(_)) {
            self.reset();
        } else {
            tracing::debug!(
                expected = generation,
                actual = self.generation,
                "skipping stale scheduled reset"
            );
        }
    }
}
