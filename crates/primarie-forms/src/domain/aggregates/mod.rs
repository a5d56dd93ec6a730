//! Aggregates module

pub mod form_type;
pub mod wizard;

pub use form_type::{FormType, Submission, SubmissionStatus};
pub use wizard::{FormWizard, CONSENT_KEY, StepOutcome, SubmitOutcome, WizardStep};
