//! Outbound ports
//!
//! Interfaces the infrastructure layer implements.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::aggregates::{FormType, Submission};
use crate::domain::services::applicant_rules::normalize_phone;
use crate::domain::value_objects::{Applicant, SubmissionData, ValidationErrors};

/// Backend collaborator consumed by the wizard and the portal service
#[async_trait]
pub trait FormsGateway: Send + Sync {
    /// Active form types, in catalogue order
    async fn list_form_types(&self) -> Result<Vec<FormType>, GatewayError>;

    async fn get_form_type(&self, id: i64) -> Result<FormType, GatewayError>;

    async fn get_form_type_by_slug(&self, slug: &str) -> Result<FormType, GatewayError>;

    /// Create a submission. Never retried by the caller.
    async fn create_submission(&self, payload: SubmissionCreate) -> Result<Submission, GatewayError>;

    async fn get_submission_by_reference(&self, reference: &str) -> Result<Submission, GatewayError>;
}

/// Collaborator failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("not found: {0}")]
    NotFound(String),

    /// Request refused with per-field messages
    #[error("{message}")]
    Validation {
        message: String,
        fields: ValidationErrors,
    },

    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("connection failed: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout)
    }
}

/// `POST /form-submissions` body
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionCreate {
    pub form_type_id: i64,
    pub citizen_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citizen_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citizen_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citizen_cnp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citizen_address: Option<String>,
    pub submission_data: SubmissionData,
    pub consent_given: bool,
}

impl SubmissionCreate {
    /// Payload from the wizard's identity, dynamic data and consent.
    ///
    /// Identity values are trimmed and empty optional ones dropped; the
    /// phone number loses its separators. Dynamic data goes out untouched,
    /// including keys the schema does not know.
    pub fn compose(
        form_type_id: i64,
        applicant: &Applicant,
        data: &SubmissionData,
        consent_given: bool,
    ) -> Self {
        Self {
            form_type_id,
            citizen_name: applicant.name.trim().to_string(),
            citizen_email: non_empty(&applicant.email),
            citizen_phone: non_empty(&normalize_phone(&applicant.phone)),
            citizen_cnp: non_empty(&applicant.cnp),
            citizen_address: non_empty(&applicant.address),
            submission_data: data.clone(),
            consent_given,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
