//! Domain services module
//!
//! Pure functions over the schema value objects.

pub mod applicant_rules;
pub mod deriver;
pub mod summary;
pub mod validator;

pub use applicant_rules::ApplicantRules;
pub use deriver::derive_fields;
pub use summary::{summarize, SummaryLine};
pub use validator::validate;
