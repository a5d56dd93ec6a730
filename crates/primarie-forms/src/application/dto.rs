//! Data Transfer Objects (DTOs)

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::aggregates::{FormType, Submission, SubmissionStatus};

/// Citizen-facing view of a submission's progress
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmissionTracking {
    pub reference_number: String,
    pub form_type_id: i64,
    pub form_type_name: Option<String>,
    pub status: SubmissionStatus,
    pub status_label: String,
    pub submitted_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub processing_days: i64,
    pub estimated_processing_days: Option<u32>,
    pub is_overdue: bool,
    pub processing_notes: Option<String>,
}

impl SubmissionTracking {
    /// `form_type` is `None` when the type has since been removed; such a
    /// submission is never reported overdue.
    pub fn build(submission: &Submission, form_type: Option<&FormType>, now: DateTime<Utc>) -> Self {
        Self {
            reference_number: submission.reference_number.clone(),
            form_type_id: submission.form_type_id,
            form_type_name: form_type.map(|t| t.name.clone()),
            status: submission.status,
            status_label: submission.status.label().to_string(),
            submitted_at: submission.submitted_at,
            completed_at: submission.completed_at,
            processing_days: submission.processing_days(now),
            estimated_processing_days: form_type.and_then(|t| t.estimated_processing_days),
            is_overdue: form_type.is_some_and(|t| submission.is_overdue(t, now)),
            processing_notes: submission.processing_notes.clone(),
        }
    }
}
