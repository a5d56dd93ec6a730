//! Value Objects module
//!
//! Immutable form schema primitives and the flat data a citizen types in.

pub mod applicant;
pub mod data;
pub mod schema;

pub use applicant::{Applicant, ApplicantField};
pub use data::{FieldValue, SubmissionData, ValidationErrors};
pub use schema::{FieldDescriptor, FieldKind, FieldSchema, FieldType, FormSchema};

use serde::{Deserialize, Deserializer};

/// Treats an explicit JSON `null` like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
