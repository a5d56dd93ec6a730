//! Applicant identity rules
//!
//! Fixed checks for the applicant step, independent of the form schema.

use regex::Regex;

use crate::domain::value_objects::{Applicant, ApplicantField, ValidationErrors};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
/// Romanian mobile numbers: 07xxxxxxxx with optional +40 / 0040 prefix
const PHONE_PATTERN: &str = r"^(\+40|0040|0)7[0-9]{8}$";
const CNP_PATTERN: &str = r"^[0-9]{13}$";

pub const NAME_MIN_CHARS: usize = 2;

/// Compiled applicant identity rules
#[derive(Debug, Clone)]
pub struct ApplicantRules {
    email: Regex,
    phone: Regex,
    cnp: Regex,
}

impl ApplicantRules {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)?,
            phone: Regex::new(PHONE_PATTERN)?,
            cnp: Regex::new(CNP_PATTERN)?,
        })
    }

    /// Error map keyed by [`ApplicantField::key`]
    ///
    /// Values are checked trimmed, the way they go out in the payload.
    pub fn validate(&self, applicant: &Applicant) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        let name = applicant.name.trim();
        let email = applicant.email.trim();
        let cnp = applicant.cnp.trim();

        if name.chars().count() < NAME_MIN_CHARS {
            errors.insert(
                ApplicantField::Name.key(),
                format!("Name is required (minimum {} characters)", NAME_MIN_CHARS),
            );
        }

        if email.is_empty() {
            errors.insert(ApplicantField::Email.key(), "Email is required");
        } else if !self.email.is_match(email) {
            errors.insert(ApplicantField::Email.key(), "Email is not valid");
        }

        if !applicant.phone.is_empty() && !self.is_valid_phone(&applicant.phone) {
            errors.insert(
                ApplicantField::Phone.key(),
                "Phone number is not valid (format: 07xxxxxxxx)",
            );
        }

        if !cnp.is_empty() && !self.cnp.is_match(cnp) {
            errors.insert(ApplicantField::Cnp.key(), "CNP must have 13 digits");
        }

        errors
    }

    pub fn is_valid_phone(&self, raw: &str) -> bool {
        self.phone.is_match(&normalize_phone(raw))
    }
}

/// Strips the separators people type between digit groups.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '.')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ApplicantRules {
        ApplicantRules::new().unwrap()
    }

    fn valid_applicant() -> Applicant {
        Applicant {
            name: "Ion Popescu".into(),
            email: "ion.popescu@example.ro".into(),
            ..Applicant::default()
        }
    }

    #[test]
    fn test_minimal_applicant_passes() {
        assert!(rules().validate(&valid_applicant()).is_empty());
    }

    #[test]
    fn test_empty_applicant() {
        let errors = rules().validate(&Applicant::default());
        assert_eq!(errors.fields(), vec!["citizen_name", "citizen_email"]);
        assert_eq!(errors.get("citizen_email"), Some("Email is required"));
    }

    #[test]
    fn test_name_too_short() {
        let applicant = Applicant { name: "I".into(), ..valid_applicant() };
        assert!(rules().validate(&applicant).contains("citizen_name"));

        let applicant = Applicant { name: "Ăș".into(), ..valid_applicant() };
        assert!(rules().validate(&applicant).is_empty());
    }

    #[test]
    fn test_values_are_checked_trimmed() {
        let applicant = Applicant { name: " I ".into(), ..valid_applicant() };
        assert!(rules().validate(&applicant).contains("citizen_name"));

        let applicant = Applicant { name: "   ".into(), ..valid_applicant() };
        assert!(rules().validate(&applicant).contains("citizen_name"));

        let applicant = Applicant {
            email: " ion@example.ro ".into(),
            cnp: " 1900101123456 ".into(),
            ..valid_applicant()
        };
        assert!(rules().validate(&applicant).is_empty());

        let applicant = Applicant { email: "  ".into(), ..valid_applicant() };
        assert_eq!(rules().validate(&applicant).get("citizen_email"), Some("Email is required"));
    }

    #[test]
    fn test_email_pattern() {
        for bad in ["ion", "ion@", "ion@example", "ion pop@example.ro"] {
            let applicant = Applicant { email: bad.into(), ..valid_applicant() };
            assert_eq!(
                rules().validate(&applicant).get("citizen_email"),
                Some("Email is not valid"),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_phone_formats() {
        let rules = rules();
        assert!(rules.is_valid_phone("0722123456"));
        assert!(rules.is_valid_phone("0722 123 456"));
        assert!(rules.is_valid_phone("0722-123.456"));
        assert!(rules.is_valid_phone("+40722123456"));
        assert!(rules.is_valid_phone("0040722123456"));
        assert!(!rules.is_valid_phone("0622123456"));
        assert!(!rules.is_valid_phone("072212345"));

        let applicant = Applicant { phone: "12345".into(), ..valid_applicant() };
        assert!(rules.validate(&applicant).contains("citizen_phone"));
    }

    #[test]
    fn test_cnp() {
        let applicant = Applicant { cnp: "1800101123456".into(), ..valid_applicant() };
        assert!(rules().validate(&applicant).is_empty());

        let applicant = Applicant { cnp: "18001011234".into(), ..valid_applicant() };
        assert_eq!(
            rules().validate(&applicant).get("citizen_cnp"),
            Some("CNP must have 13 digits")
        );
    }

    #[test]
    fn test_address_is_free_text() {
        let applicant = Applicant { address: "x".into(), ..valid_applicant() };
        assert!(rules().validate(&applicant).is_empty());
    }
}
