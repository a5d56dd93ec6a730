//! Error types for the forms engine

use thiserror::Error;

use crate::domain::value_objects::ValidationErrors;
use crate::ports::GatewayError;

/// Form-level failure shown as a banner above the wizard.
///
/// Field-level failures never use this type; they live in
/// [`ValidationErrors`] next to the offending input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormLevelError {
    /// Consent checkbox left unticked on the confirm step
    #[error("consent to personal data processing is required")]
    ConsentRequired,

    /// Backend refused the whole submission
    #[error("submission rejected: {message}")]
    Rejected {
        message: String,
        field_errors: ValidationErrors,
    },

    /// Backend unreachable or too slow; the user may retry
    #[error("service unavailable: {message}")]
    Transport { message: String },
}

impl FormLevelError {
    /// Whether re-invoking `submit()` unchanged can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<GatewayError> for FormLevelError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Validation { message, fields } => Self::Rejected {
                message,
                field_errors: fields,
            },
            GatewayError::NotFound(message)
            | GatewayError::Rejected { message, .. }
            | GatewayError::Server { message, .. } => Self::Rejected {
                message,
                field_errors: ValidationErrors::default(),
            },
            err @ (GatewayError::Transport(_) | GatewayError::Timeout | GatewayError::Decode(_)) => {
                Self::Transport {
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Refused wizard edits
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("request already submitted as {reference_number}")]
    Closed { reference_number: String },

    #[error("a submission is in progress")]
    Submitting,
}

/// Application service failures
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("form type not found: {0}")]
    FormTypeNotFound(String),

    #[error("form type is not accepting requests: {0}")]
    FormTypeInactive(String),

    #[error("submission not found: {0}")]
    SubmissionNotFound(String),

    #[error(transparent)]
    Gateway(GatewayError),
}

/// Crate-level error
#[derive(Error, Debug)]
pub enum FormsError {
    #[error(transparent)]
    Portal(#[from] PortalError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error("invalid form schema: {0}")]
    Schema(String),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, FormsError>;
