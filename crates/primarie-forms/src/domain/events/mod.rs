//! Domain Events
//!
//! Raised by the submission wizard and drained by the caller through
//! `FormWizard::take_events`.

use chrono::{DateTime, Utc};

use crate::domain::aggregates::WizardStep;

/// Wizard lifecycle events
#[derive(Clone, Debug, PartialEq)]
pub enum WizardEvent {
    StepAdvanced {
        from: WizardStep,
        to: WizardStep,
    },

    /// Step gate failed; `fields` lists the offending names
    StepRejected {
        step: WizardStep,
        fields: Vec<String>,
    },

    SubmissionSent {
        form_type_id: i64,
    },

    SubmissionAccepted {
        reference_number: String,
        submitted_at: DateTime<Utc>,
    },

    SubmissionFailed {
        retryable: bool,
        message: String,
    },
}

impl WizardEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            WizardEvent::StepAdvanced { .. } => "wizard.step_advanced",
            WizardEvent::StepRejected { .. } => "wizard.step_rejected",
            WizardEvent::SubmissionSent { .. } => "submission.sent",
            WizardEvent::SubmissionAccepted { .. } => "submission.accepted",
            WizardEvent::SubmissionFailed { .. } => "submission.failed",
        }
    }
}
