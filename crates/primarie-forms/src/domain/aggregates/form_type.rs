//! Form Type and Submission
//!
//! Backend-owned records. The engine reads them; only the backend changes
//! a submission's status.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::domain::value_objects::{null_as_default, FormSchema, SubmissionData};

/// Administrative request type offered by the city hall
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormType {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub requires_auth: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub estimated_processing_days: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub form_schema: FormSchema,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_documents: Vec<String>,
}

fn default_active() -> bool {
    true
}

impl FormType {
    pub fn new(id: i64, name: impl Into<String>, slug: impl Into<String>, form_schema: FormSchema) -> Self {
        Self {
            id,
            name: name.into(),
            slug: slug.into(),
            description: None,
            instructions: None,
            requires_auth: false,
            is_active: true,
            estimated_processing_days: None,
            form_schema,
            required_documents: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_processing_days(mut self, days: u32) -> Self {
        self.estimated_processing_days = Some(days);
        self
    }

    pub fn with_documents<I, S>(mut self, documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_documents = documents.into_iter().map(Into::into).collect();
        self
    }
}

/// Processing status as reported by the backend
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    InReview,
    Approved,
    Completed,
    Rejected,
    OnHold,
    #[serde(other)]
    Unknown,
}

impl SubmissionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InReview => "In review",
            Self::Approved => "Approved",
            Self::Completed => "Completed",
            Self::Rejected => "Rejected",
            Self::OnHold => "On hold",
            Self::Unknown => "Unknown",
        }
    }

    /// No further processing is expected
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Receipt of an accepted request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub form_type_id: i64,
    pub reference_number: String,
    #[serde(default)]
    pub status: SubmissionStatus,
    #[serde(deserialize_with = "timestamp")]
    pub submitted_at: DateTime<Utc>,
    pub citizen_name: String,
    #[serde(default)]
    pub citizen_email: Option<String>,
    #[serde(default)]
    pub citizen_phone: Option<String>,
    #[serde(default)]
    pub citizen_cnp: Option<String>,
    #[serde(default)]
    pub citizen_address: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub submission_data: SubmissionData,
    #[serde(default)]
    pub consent_given: bool,
    #[serde(default)]
    pub processing_notes: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Submission {
    /// Whole days spent in processing, rounded up.
    ///
    /// Counts to `completed_at` when set, otherwise to `now`.
    pub fn processing_days(&self, now: DateTime<Utc>) -> i64 {
        let end = self.completed_at.unwrap_or(now);
        let millis = (end - self.submitted_at).num_milliseconds();
        (millis as f64 / Duration::days(1).num_milliseconds() as f64).ceil() as i64
    }

    /// Past the form type's estimated processing window and still open.
    pub fn is_overdue(&self, form_type: &FormType, now: DateTime<Utc>) -> bool {
        if self.status.is_closed() {
            return false;
        }
        match form_type.estimated_processing_days {
            Some(days) if days > 0 => now > self.submitted_at + Duration::days(i64::from(days)),
            _ => false,
        }
    }
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// RFC 3339, or a naive timestamp read as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .map(|naive| naive.and_utc())
}

fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw))),
    }
}
