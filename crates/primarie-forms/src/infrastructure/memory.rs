//! In-memory gateway
//!
//! Behaves like the backend closely enough for offline use and tests:
//! inactive types refuse submissions, payloads are validated against the
//! schema, receipts carry backend-style reference numbers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use parking_lot::RwLock;
use rand::Rng;
use uuid::Uuid;

use crate::domain::aggregates::{FormType, Submission, SubmissionStatus};
use crate::domain::services::applicant_rules::NAME_MIN_CHARS;
use crate::domain::services::validate;
use crate::domain::value_objects::ValidationErrors;
use crate::infrastructure::catalog::builtin_form_types;
use crate::ports::{FormsGateway, GatewayError, SubmissionCreate};

const REFERENCE_PREFIX: &str = "CERERE";
const REFERENCE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const REFERENCE_SUFFIX_LEN: usize = 8;

#[derive(Default)]
pub struct InMemoryFormsGateway {
    form_types: RwLock<Vec<FormType>>,
    /// Keyed by reference number, in submission order
    submissions: RwLock<IndexMap<String, Submission>>,
}

impl InMemoryFormsGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeded with [`builtin_form_types`]
    pub fn with_catalog() -> Self {
        Self::with_form_types(builtin_form_types())
    }

    pub fn with_form_types(form_types: Vec<FormType>) -> Self {
        Self {
            form_types: RwLock::new(form_types),
            submissions: RwLock::default(),
        }
    }

    /// Insert or replace by id
    pub fn upsert_form_type(&self, form_type: FormType) {
        let mut form_types = self.form_types.write();
        match form_types.iter_mut().find(|t| t.id == form_type.id) {
            Some(existing) => *existing = form_type,
            None => form_types.push(form_type),
        }
    }

    /// Returns false when no type has `slug`.
    pub fn set_active(&self, slug: &str, active: bool) -> bool {
        let mut form_types = self.form_types.write();
        match form_types.iter_mut().find(|t| t.slug == slug) {
            Some(form_type) => {
                form_type.is_active = active;
                true
            }
            None => false,
        }
    }

    /// Stand-in for back-office processing
    pub fn set_status(
        &self,
        reference: &str,
        status: SubmissionStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> bool {
        let mut submissions = self.submissions.write();
        match submissions.get_mut(reference) {
            Some(submission) => {
                submission.status = status;
                submission.completed_at = completed_at;
                true
            }
            None => false,
        }
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.read().values().cloned().collect()
    }

    fn check_payload(payload: &SubmissionCreate, form_type: &FormType) -> Result<(), GatewayError> {
        let mut fields = ValidationErrors::default();
        if payload.citizen_name.chars().count() < NAME_MIN_CHARS {
            fields.insert("citizen_name", format!("must have at least {} characters", NAME_MIN_CHARS));
        }
        if !payload.consent_given {
            fields.insert("consent_given", "consent to personal data processing is required");
        }
        for (name, message) in validate(&payload.submission_data, &form_type.form_schema).iter() {
            fields.insert(name.as_str(), message.as_str());
        }

        if fields.is_empty() {
            return Ok(());
        }
        let message = fields.iter().map(|(_, m)| m.as_str()).collect::<Vec<_>>().join("; ");
        Err(GatewayError::Validation { message, fields })
    }
}

#[async_trait]
impl FormsGateway for InMemoryFormsGateway {
    async fn list_form_types(&self) -> Result<Vec<FormType>, GatewayError> {
        Ok(self
            .form_types
            .read()
            .iter()
            .filter(|t| t.is_active)
            .cloned()
            .collect())
    }

    async fn get_form_type(&self, id: i64) -> Result<FormType, GatewayError> {
        self.form_types
            .read()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("form type {}", id)))
    }

    async fn get_form_type_by_slug(&self, slug: &str) -> Result<FormType, GatewayError> {
        self.form_types
            .read()
            .iter()
            .find(|t| t.slug == slug)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("form type {}", slug)))
    }

    async fn create_submission(&self, payload: SubmissionCreate) -> Result<Submission, GatewayError> {
        let form_type = self
            .form_types
            .read()
            .iter()
            .find(|t| t.id == payload.form_type_id && t.is_active)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound("form type not found or not active".into()))?;

        Self::check_payload(&payload, &form_type)?;

        let now = Utc::now();
        let mut submissions = self.submissions.write();
        let mut rng = rand::thread_rng();
        let reference_number = loop {
            let candidate = reference_number(now, &mut rng);
            if !submissions.contains_key(&candidate) {
                break candidate;
            }
        };

        let submission = Submission {
            id: Uuid::new_v4().to_string(),
            form_type_id: form_type.id,
            reference_number: reference_number.clone(),
            status: SubmissionStatus::Pending,
            submitted_at: now,
            citizen_name: payload.citizen_name,
            citizen_email: payload.citizen_email,
            citizen_phone: payload.citizen_phone,
            citizen_cnp: payload.citizen_cnp,
            citizen_address: payload.citizen_address,
            submission_data: payload.submission_data,
            consent_given: payload.consent_given,
            processing_notes: None,
            completed_at: None,
        };
        submissions.insert(reference_number, submission.clone());

        tracing::info!(
            reference = %submission.reference_number,
            form_type = %form_type.slug,
            "Submission recorded"
        );
        Ok(submission)
    }

    async fn get_submission_by_reference(&self, reference: &str) -> Result<Submission, GatewayError> {
        self.submissions
            .read()
            .get(reference)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("submission {}", reference)))
    }
}

/// `CERERE-YYYYMMDD-XXXXXXXX`, suffix drawn from `A-Z0-9`
pub fn reference_number<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> String {
    let suffix: String = (0..REFERENCE_SUFFIX_LEN)
        .map(|_| REFERENCE_CHARSET[rng.gen_range(0..REFERENCE_CHARSET.len())] as char)
        .collect();
    format!("{}-{}-{}", REFERENCE_PREFIX, now.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Applicant, SubmissionData};
    use chrono::TimeZone;
    use regex::Regex;

    fn payload(form_type_id: i64, data: SubmissionData) -> SubmissionCreate {
        let applicant = Applicant {
            name: "Ion Popescu".into(),
            email: "ion@example.ro".into(),
            ..Applicant::default()
        };
        SubmissionCreate::compose(form_type_id, &applicant, &data, true)
    }

    fn residence_data() -> SubmissionData {
        [
            ("nume_complet", "Ion Popescu"),
            ("cnp", "1800101123456"),
            ("adresa_domiciliu", "Str. Mare 1, Sibiu"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_reference_number_format() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let reference = reference_number(now, &mut rand::thread_rng());
        let pattern = Regex::new(r"^CERERE-20240301-[A-Z0-9]{8}$").unwrap();
        assert!(pattern.is_match(&reference), "{reference}");
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let gateway = InMemoryFormsGateway::with_catalog();
        let submission = gateway.create_submission(payload(4, residence_data())).await.unwrap();

        assert_eq!(submission.status, SubmissionStatus::Pending);
        assert!(submission.reference_number.starts_with("CERERE-"));

        let found = gateway
            .get_submission_by_reference(&submission.reference_number)
            .await
            .unwrap();
        assert_eq!(found, submission);
        assert_eq!(gateway.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_server_side_validation() {
        let gateway = InMemoryFormsGateway::with_catalog();
        let err = gateway
            .create_submission(payload(4, SubmissionData::new()))
            .await
            .unwrap_err();

        match err {
            GatewayError::Validation { fields, .. } => {
                assert_eq!(fields.fields(), vec!["nume_complet", "cnp", "adresa_domiciliu"]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(gateway.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_consent_is_enforced() {
        let gateway = InMemoryFormsGateway::with_catalog();
        let mut request = payload(4, residence_data());
        request.consent_given = false;

        let err = gateway.create_submission(request).await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation { fields, .. } if fields.contains("consent_given")));
    }

    #[tokio::test]
    async fn test_inactive_or_unknown_type() {
        let gateway = InMemoryFormsGateway::with_catalog();
        assert!(gateway.set_active("adeverinta-domiciliu", false));
        assert!(!gateway.set_active("pasaport", false));

        let err = gateway.create_submission(payload(4, residence_data())).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(_)));

        let err = gateway.create_submission(payload(99, residence_data())).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(_)));

        assert_eq!(gateway.list_form_types().await.unwrap().len(), 5);
        assert!(gateway.get_form_type_by_slug("adeverinta-domiciliu").await.is_ok());
    }

    #[tokio::test]
    async fn test_set_status() {
        let gateway = InMemoryFormsGateway::with_catalog();
        let submission = gateway.create_submission(payload(4, residence_data())).await.unwrap();

        let done = Utc::now();
        assert!(gateway.set_status(&submission.reference_number, SubmissionStatus::Completed, Some(done)));
        let found = gateway
            .get_submission_by_reference(&submission.reference_number)
            .await
            .unwrap();
        assert_eq!(found.status, SubmissionStatus::Completed);
        assert_eq!(found.completed_at, Some(done));
    }

    #[tokio::test]
    async fn test_upsert_form_type() {
        let gateway = InMemoryFormsGateway::new();
        assert!(gateway.list_form_types().await.unwrap().is_empty());

        let mut custom = builtin_form_types().remove(0);
        gateway.upsert_form_type(custom.clone());
        custom.name = "Certificat de Urbanism (nou)".into();
        gateway.upsert_form_type(custom);

        let listed = gateway.list_form_types().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Certificat de Urbanism (nou)");
    }
}
