//! Primarie Digitala forms engine
//!
//! Schema-driven administrative request forms for a municipal e-government
//! portal. The backend owns persistence and status transitions; this crate
//! owns the part that runs next to the citizen.
//!
//! ## Architecture
//!
//! - **Domain Layer**: form schema value objects, field derivation and
//!   validation services, the submission wizard aggregate, domain events
//! - **Ports Layer**: the `FormsGateway` collaborator interface
//! - **Application Layer**: `FormsPortal`, opening wizards and tracking
//!   submissions
//! - **Infrastructure Layer**: REST gateway, in-memory gateway and the
//!   built-in form catalogue
//!
//! ## Flow
//!
//! schema (backend) → [`derive_fields`] → descriptors → user edits →
//! [`SubmissionData`] → [`validate`] → error map → wizard step gate →
//! `create_submission` → reference number.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ports;

pub use application::{FormsPortal, SubmissionTracking};
pub use domain::aggregates::{
    FormType, FormWizard, StepOutcome, Submission, SubmissionStatus, SubmitOutcome, WizardStep,
    CONSENT_KEY,
};
pub use domain::events::WizardEvent;
pub use domain::services::{derive_fields, summarize, validate, ApplicantRules, SummaryLine};
pub use domain::value_objects::{
    Applicant, ApplicantField, FieldDescriptor, FieldKind, FieldSchema, FieldType, FieldValue,
    FormSchema, SubmissionData, ValidationErrors,
};
pub use error::{FormLevelError, FormsError, PortalError, Result, WizardError};
pub use infrastructure::{
    builtin_form_types, HttpFormsGateway, HttpGatewayConfig, InMemoryFormsGateway,
};
pub use ports::{FormsGateway, GatewayError, SubmissionCreate};
