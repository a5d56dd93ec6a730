//! Submission Wizard Aggregate
//!
//! Four fixed steps (form info, applicant identity, dynamic fields,
//! consent) followed by the terminal `Submitted` state. Every step gate is
//! synchronous; only `submit()` talks to the backend.
//!
//! The wizard is a shared handle: state sits behind a mutex that is never
//! held across an await, `in_flight` guards against double submission and
//! `epoch` lets `reset()` orphan a request that is still running.

use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::domain::aggregates::{FormType, Submission};
use crate::domain::events::WizardEvent;
use crate::domain::services::{derive_fields, summarize, validate, ApplicantRules, SummaryLine};
use crate::domain::value_objects::{
    Applicant, ApplicantField, FieldDescriptor, FieldValue, SubmissionData, ValidationErrors,
};
use crate::error::{FormLevelError, FormsError, WizardError};
use crate::ports::{FormsGateway, SubmissionCreate};

/// Error map key for the consent checkbox
pub const CONSENT_KEY: &str = "consent_given";
const CONSENT_MESSAGE: &str = "You must consent to the processing of personal data";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Info,
    Applicant,
    Details,
    Confirm,
    Submitted,
}

impl WizardStep {
    pub fn index(&self) -> usize {
        match self {
            Self::Info => 0,
            Self::Applicant => 1,
            Self::Details => 2,
            Self::Confirm => 3,
            Self::Submitted => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Info => "Form information",
            Self::Applicant => "Applicant details",
            Self::Details => "Request details",
            Self::Confirm => "Confirmation",
            Self::Submitted => "Submitted",
        }
    }

    /// Step reached through `next()`; Confirm only leaves via `submit()`.
    fn following(&self) -> Option<Self> {
        match self {
            Self::Info => Some(Self::Applicant),
            Self::Applicant => Some(Self::Details),
            Self::Details => Some(Self::Confirm),
            Self::Confirm | Self::Submitted => None,
        }
    }

    fn preceding(&self) -> Option<Self> {
        match self {
            Self::Applicant => Some(Self::Info),
            Self::Details => Some(Self::Applicant),
            Self::Confirm => Some(Self::Details),
            Self::Info | Self::Submitted => None,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Result of `next()`
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    Advanced(WizardStep),
    /// Gate failed; the step is unchanged
    Rejected(ValidationErrors),
    /// Confirm step is complete, call `submit()`
    ReadyToSubmit,
    Closed,
}

/// Result of `submit()`
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Submitted(Submission),
    /// Stayed on Confirm; the error is also exposed through `form_error()`
    Failed(FormLevelError),
    /// Another submit is outstanding; no request was made
    AlreadyPending,
    /// `submit()` called outside the Confirm step
    NotReady(WizardStep),
    /// The wizard was reset while the request was running
    Discarded,
}

#[derive(Debug, Default)]
struct WizardState {
    step: WizardStep,
    applicant: Applicant,
    data: SubmissionData,
    consent_given: bool,
    errors: ValidationErrors,
    form_error: Option<FormLevelError>,
    result: Option<Submission>,
    events: Vec<WizardEvent>,
}

impl WizardState {
    fn ensure_open(&self) -> Result<(), WizardError> {
        match &self.result {
            Some(receipt) => Err(WizardError::Closed {
                reference_number: receipt.reference_number.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Multi-step submission wizard for one form type
pub struct FormWizard {
    form_type: FormType,
    fields: Vec<FieldDescriptor>,
    rules: ApplicantRules,
    gateway: Arc<dyn FormsGateway>,
    state: Mutex<WizardState>,
    in_flight: AtomicBool,
    epoch: AtomicU64,
}

impl FormWizard {
    pub fn new(form_type: FormType, gateway: Arc<dyn FormsGateway>) -> Result<Self, FormsError> {
        let fields = derive_fields(&form_type.form_schema);
        Ok(Self {
            form_type,
            fields,
            rules: ApplicantRules::new()?,
            gateway,
            state: Mutex::new(WizardState::default()),
            in_flight: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
        })
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn form_type(&self) -> &FormType { &self.form_type }
    pub fn field_descriptors(&self) -> &[FieldDescriptor] { &self.fields }
    pub fn step(&self) -> WizardStep { self.state.lock().step }
    pub fn step_index(&self) -> usize { self.step().index() }
    pub fn applicant(&self) -> Applicant { self.state.lock().applicant.clone() }
    pub fn data(&self) -> SubmissionData { self.state.lock().data.clone() }
    pub fn consent_given(&self) -> bool { self.state.lock().consent_given }
    pub fn errors(&self) -> ValidationErrors { self.state.lock().errors.clone() }
    pub fn form_error(&self) -> Option<FormLevelError> { self.state.lock().form_error.clone() }
    pub fn result(&self) -> Option<Submission> { self.state.lock().result.clone() }
    pub fn is_submitting(&self) -> bool { self.in_flight.load(Ordering::Acquire) }

    /// Review lines for the Confirm step
    pub fn summary(&self) -> Vec<SummaryLine> {
        summarize(&self.state.lock().data, &self.fields)
    }

    pub fn take_events(&self) -> Vec<WizardEvent> {
        std::mem::take(&mut self.state.lock().events)
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Edits are refused once submitted and while a submission is in flight.
    fn ensure_editable(&self, state: &WizardState) -> Result<(), WizardError> {
        state.ensure_open()?;
        if self.is_submitting() {
            return Err(WizardError::Submitting);
        }
        Ok(())
    }

    /// Set a dynamic field, clearing its stale error.
    pub fn set_field(
        &self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Result<(), WizardError> {
        let mut state = self.state.lock();
        self.ensure_editable(&state)?;
        let name = name.into();
        state.errors.remove(&name);
        state.data.set(name, value);
        Ok(())
    }

    pub fn clear_field(&self, name: &str) -> Result<(), WizardError> {
        let mut state = self.state.lock();
        self.ensure_editable(&state)?;
        state.errors.remove(name);
        state.data.remove(name);
        Ok(())
    }

    pub fn set_applicant(
        &self,
        field: ApplicantField,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        let mut state = self.state.lock();
        self.ensure_editable(&state)?;
        state.errors.remove(field.key());
        state.applicant.set(field, value);
        Ok(())
    }

    pub fn set_consent(&self, given: bool) -> Result<(), WizardError> {
        let mut state = self.state.lock();
        self.ensure_editable(&state)?;
        state.errors.remove(CONSENT_KEY);
        if given && state.form_error == Some(FormLevelError::ConsentRequired) {
            state.form_error = None;
        }
        state.consent_given = given;
        Ok(())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Validate the current step and advance when it is clean.
    pub fn next(&self) -> StepOutcome {
        let mut state = self.state.lock();
        let from = state.step;

        let errors = match from {
            WizardStep::Submitted => return StepOutcome::Closed,
            WizardStep::Info => ValidationErrors::default(),
            WizardStep::Applicant => self.rules.validate(&state.applicant),
            WizardStep::Details => validate(&state.data, &self.form_type.form_schema),
            WizardStep::Confirm => consent_errors(state.consent_given),
        };

        if !errors.is_empty() {
            tracing::debug!(step = ?from, fields = ?errors.fields(), "Step rejected");
            state.events.push(WizardEvent::StepRejected {
                step: from,
                fields: errors.fields(),
            });
            state.errors = errors.clone();
            return StepOutcome::Rejected(errors);
        }

        state.errors = errors;
        let Some(to) = from.following() else {
            return StepOutcome::ReadyToSubmit;
        };

        tracing::debug!(?from, ?to, "Step advanced");
        state.step = to;
        state.events.push(WizardEvent::StepAdvanced { from, to });
        StepOutcome::Advanced(to)
    }

    /// Go one step back. Entered data and errors are kept.
    pub fn back(&self) -> WizardStep {
        let mut state = self.state.lock();
        if self.is_submitting() {
            return state.step;
        }
        if let Some(previous) = state.step.preceding() {
            state.step = previous;
        }
        state.step
    }

    /// Discard everything, as when the user navigates away.
    ///
    /// A submission still in flight completes into the void.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        if self.in_flight.load(Ordering::Acquire) {
            tracing::debug!(form_type = %self.form_type.slug, "Reset with submission in flight");
        }
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.in_flight.store(false, Ordering::Release);
        *state = WizardState::default();
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Send the request. Only valid on the Confirm step; never retried.
    pub async fn submit(&self) -> SubmitOutcome {
        let (payload, mut guard) = {
            let mut state = self.state.lock();
            if self.in_flight.load(Ordering::Acquire) {
                return SubmitOutcome::AlreadyPending;
            }
            if state.step != WizardStep::Confirm {
                return SubmitOutcome::NotReady(state.step);
            }
            if !state.consent_given {
                tracing::warn!(form_type = %self.form_type.slug, "Submission blocked: consent missing");
                state.errors = consent_errors(false);
                state.form_error = Some(FormLevelError::ConsentRequired);
                return SubmitOutcome::Failed(FormLevelError::ConsentRequired);
            }

            self.in_flight.store(true, Ordering::Release);
            state.errors.remove(CONSENT_KEY);
            state.form_error = None;
            state.events.push(WizardEvent::SubmissionSent {
                form_type_id: self.form_type.id,
            });

            let payload = SubmissionCreate::compose(
                self.form_type.id,
                &state.applicant,
                &state.data,
                state.consent_given,
            );
            let guard = InFlight {
                wizard: self,
                epoch: self.epoch.load(Ordering::Acquire),
                armed: true,
            };
            (payload, guard)
        };

        tracing::info!(form_type = %self.form_type.slug, "Submitting request");
        let response = self.gateway.create_submission(payload).await;

        let mut state = self.state.lock();
        guard.armed = false;
        if self.epoch.load(Ordering::Acquire) != guard.epoch {
            tracing::debug!(form_type = %self.form_type.slug, "Discarding stale submission result");
            return SubmitOutcome::Discarded;
        }
        self.in_flight.store(false, Ordering::Release);

        match response {
            Ok(receipt) => {
                tracing::info!(
                    reference = %receipt.reference_number,
                    form_type = %self.form_type.slug,
                    "Request submitted"
                );
                state.step = WizardStep::Submitted;
                state.errors = ValidationErrors::default();
                state.events.push(WizardEvent::SubmissionAccepted {
                    reference_number: receipt.reference_number.clone(),
                    submitted_at: receipt.submitted_at,
                });
                state.result = Some(receipt.clone());
                SubmitOutcome::Submitted(receipt)
            }
            Err(err) => {
                let err = FormLevelError::from(err);
                tracing::warn!(form_type = %self.form_type.slug, error = %err, "Submission failed");
                if let FormLevelError::Rejected { field_errors, .. } = &err {
                    for (name, message) in field_errors.iter() {
                        state.errors.insert(name.as_str(), message.as_str());
                    }
                }
                state.events.push(WizardEvent::SubmissionFailed {
                    retryable: err.is_retryable(),
                    message: err.to_string(),
                });
                state.form_error = Some(err.clone());
                SubmitOutcome::Failed(err)
            }
        }
    }
}

impl fmt::Debug for FormWizard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormWizard")
            .field("form_type", &self.form_type.slug)
            .field("step", &self.step())
            .field("in_flight", &self.is_submitting())
            .finish()
    }
}

fn consent_errors(consent_given: bool) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if !consent_given {
        errors.insert(CONSENT_KEY, CONSENT_MESSAGE);
    }
    errors
}

/// Releases `in_flight` if `submit()` is dropped mid-request.
struct InFlight<'a> {
    wizard: &'a FormWizard,
    epoch: u64,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let _state = self.wizard.state.lock();
        if self.wizard.epoch.load(Ordering::Acquire) == self.epoch {
            self.wizard.in_flight.store(false, Ordering::Release);
        }
    }
}
