//! Applicant identity
//!
//! The fixed fields every administrative request carries regardless of form
//! type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    #[serde(default, alias = "citizen_name")]
    pub name: String,
    #[serde(default, alias = "citizen_email")]
    pub email: String,
    #[serde(default, alias = "citizen_phone")]
    pub phone: String,
    /// Romanian personal numeric code (CNP)
    #[serde(default, alias = "citizen_cnp")]
    pub cnp: String,
    #[serde(default, alias = "citizen_address")]
    pub address: String,
}

impl Applicant {
    pub fn get(&self, field: ApplicantField) -> &str {
        match field {
            ApplicantField::Name => &self.name,
            ApplicantField::Email => &self.email,
            ApplicantField::Phone => &self.phone,
            ApplicantField::Cnp => &self.cnp,
            ApplicantField::Address => &self.address,
        }
    }

    pub fn set(&mut self, field: ApplicantField, value: impl Into<String>) {
        let slot = match field {
            ApplicantField::Name => &mut self.name,
            ApplicantField::Email => &mut self.email,
            ApplicantField::Phone => &mut self.phone,
            ApplicantField::Cnp => &mut self.cnp,
            ApplicantField::Address => &mut self.address,
        };
        *slot = value.into();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApplicantField {
    Name,
    Email,
    Phone,
    Cnp,
    Address,
}

impl ApplicantField {
    pub const ALL: [ApplicantField; 5] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Cnp,
        Self::Address,
    ];

    /// Key used in error maps and in the submission payload
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "citizen_name",
            Self::Email => "citizen_email",
            Self::Phone => "citizen_phone",
            Self::Cnp => "citizen_cnp",
            Self::Address => "citizen_address",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Full name",
            Self::Email => "Email address",
            Self::Phone => "Phone number",
            Self::Cnp => "CNP",
            Self::Address => "Home address",
        }
    }
}

impl fmt::Display for ApplicantField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for ApplicantField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.key() == s || f.key().trim_start_matches("citizen_") == s)
            .ok_or_else(|| format!("unknown applicant field: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut applicant = Applicant::default();
        applicant.set(ApplicantField::Name, "Ion Popescu");
        applicant.set(ApplicantField::Cnp, "1800101123456");
        assert_eq!(applicant.get(ApplicantField::Name), "Ion Popescu");
        assert_eq!(applicant.cnp, "1800101123456");
        assert_eq!(applicant.get(ApplicantField::Email), "");
    }

    #[test]
    fn test_parse_field_names() {
        assert_eq!("citizen_email".parse::<ApplicantField>(), Ok(ApplicantField::Email));
        assert_eq!("cnp".parse::<ApplicantField>(), Ok(ApplicantField::Cnp));
        assert!("nickname".parse::<ApplicantField>().is_err());
    }

    #[test]
    fn test_deserialize_payload_keys() {
        let applicant: Applicant =
            serde_json::from_str(r#"{"citizen_name": "Ana", "email": "ana@example.ro"}"#).unwrap();
        assert_eq!(applicant.name, "Ana");
        assert_eq!(applicant.email, "ana@example.ro");
        assert!(applicant.phone.is_empty());
    }
}
