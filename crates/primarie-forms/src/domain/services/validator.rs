//! Schema-driven submission validation

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::value_objects::{FieldKind, FieldValue, FormSchema, SubmissionData, ValidationErrors};

/// Field-level errors for `data` under `schema`.
///
/// Required names are checked first; type checks run only for schema fields
/// holding a non-blank value, so a field reports at most one message. Keys
/// the schema does not declare are never reported.
pub fn validate(data: &SubmissionData, schema: &FormSchema) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    let Some(properties) = schema.properties.as_ref() else {
        return errors;
    };

    for name in &schema.required {
        if !data.is_filled(name) {
            errors.insert(name.as_str(), format!("{} is required", schema.title_of(name)));
        }
    }

    for (name, field) in properties {
        let Some(value) = data.get(name).filter(|v| !v.is_blank()) else {
            continue;
        };
        if let Some(violation) = check(&field.kind(), value) {
            errors.insert(name.as_str(), violation.message(schema.title_of(name)));
        }
    }

    errors
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Violation {
    NotANumber,
    NotADate,
    NotAnOption,
}

impl Violation {
    fn message(self, title: &str) -> String {
        match self {
            Self::NotANumber => format!("{} must be a valid number", title),
            Self::NotADate => format!("{} must be a valid date", title),
            Self::NotAnOption => format!("{} has an invalid value", title),
        }
    }
}

fn check(kind: &FieldKind, value: &FieldValue) -> Option<Violation> {
    match kind {
        FieldKind::String | FieldKind::Boolean => None,
        FieldKind::Number => match value.as_f64() {
            Some(n) if n.is_finite() => None,
            _ => Some(Violation::NotANumber),
        },
        FieldKind::Date => match value.as_text() {
            Some(text) if is_calendar_date(text) => None,
            _ => Some(Violation::NotADate),
        },
        FieldKind::Enum(options) => match value.as_text() {
            Some(text) if options.iter().any(|o| o == text) => None,
            _ => Some(Violation::NotAnOption),
        },
    }
}

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Accepts `YYYY-MM-DD` (what date inputs produce) plus ISO date-times.
fn is_calendar_date(text: &str) -> bool {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(text).is_ok()
        || DATE_TIME_FORMATS
            .iter()
            .any(|f| NaiveDateTime::parse_from_str(text, f).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::FieldSchema;

    fn errors_of(pairs: &[(&str, &str)]) -> ValidationErrors {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_required_reports_only_missing_field() {
        let schema = FormSchema::new()
            .required_field("a", FieldSchema::text("Alpha"))
            .field("b", FieldSchema::number("Beta"));

        let errors = validate(&SubmissionData::new(), &schema);
        assert_eq!(errors, errors_of(&[("a", "Alpha is required")]));
    }

    #[test]
    fn test_required_title_falls_back_to_name() {
        let mut schema = FormSchema::new().field("a", FieldSchema::default());
        schema.required.insert("a".into());
        schema.required.insert("ghost".into());

        let errors = validate(&SubmissionData::new(), &schema);
        assert_eq!(
            errors,
            errors_of(&[("a", "a is required"), ("ghost", "ghost is required")])
        );
    }

    #[test]
    fn test_null_and_empty_string_count_as_missing() {
        let schema = FormSchema::new().required_field("a", FieldSchema::text("A"));

        let data: SubmissionData = [("a", FieldValue::Null)].into_iter().collect();
        assert!(validate(&data, &schema).contains("a"));

        let data: SubmissionData = [("a", "")].into_iter().collect();
        assert!(validate(&data, &schema).contains("a"));

        let data: SubmissionData = [("a", false)].into_iter().collect();
        assert!(validate(&data, &schema).is_empty());
    }

    #[test]
    fn test_number_field() {
        let schema = FormSchema::new().field("x", FieldSchema::number("Valoare"));

        let data: SubmissionData = [("x", "abc")].into_iter().collect();
        assert_eq!(
            validate(&data, &schema),
            errors_of(&[("x", "Valoare must be a valid number")])
        );

        let data: SubmissionData = [("x", "42")].into_iter().collect();
        assert!(validate(&data, &schema).is_empty());

        let data: SubmissionData = [("x", 42)].into_iter().collect();
        assert!(validate(&data, &schema).is_empty());

        let data: SubmissionData = [("x", "inf")].into_iter().collect();
        assert!(validate(&data, &schema).contains("x"));

        let data: SubmissionData = [("x", " ")].into_iter().collect();
        assert!(validate(&data, &schema).is_empty());
    }

    #[test]
    fn test_enum_field() {
        let schema = FormSchema::new().field("f", FieldSchema::choice("Tip", ["A", "B"]));

        let data: SubmissionData = [("f", "C")].into_iter().collect();
        assert_eq!(validate(&data, &schema), errors_of(&[("f", "Tip has an invalid value")]));

        let data: SubmissionData = [("f", "A")].into_iter().collect();
        assert!(validate(&data, &schema).is_empty());

        let data: SubmissionData = [("f", 1)].into_iter().collect();
        assert!(validate(&data, &schema).contains("f"));
    }

    #[test]
    fn test_date_field() {
        let schema = FormSchema::new().field("d", FieldSchema::date("Data"));

        for ok in ["2024-02-29", "2024-03-01T10:30:00Z", "2024-03-01T10:30"] {
            let data: SubmissionData = [("d", ok)].into_iter().collect();
            assert!(validate(&data, &schema).is_empty(), "{ok} should be a date");
        }

        for bad in ["2023-02-29", "not a date", "31.12.2024"] {
            let data: SubmissionData = [("d", bad)].into_iter().collect();
            assert_eq!(
                validate(&data, &schema),
                errors_of(&[("d", "Data must be a valid date")]),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_absent_optional_fields_never_error() {
        let schema = FormSchema::new()
            .field("n", FieldSchema::number("N"))
            .field("d", FieldSchema::date("D"))
            .field("e", FieldSchema::choice("E", ["x"]));

        let data: SubmissionData = [("n", ""), ("d", "")].into_iter().collect();
        assert!(validate(&data, &schema).is_empty());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let schema = FormSchema::new().field("n", FieldSchema::number("N"));
        let data: SubmissionData = [("extra", "abc")].into_iter().collect();
        assert!(validate(&data, &schema).is_empty());
    }

    #[test]
    fn test_one_message_per_field() {
        let schema = FormSchema::new().required_field("n", FieldSchema::number("N"));

        let data: SubmissionData = [("n", "")].into_iter().collect();
        assert_eq!(validate(&data, &schema), errors_of(&[("n", "N is required")]));

        let data: SubmissionData = [("n", "x")].into_iter().collect();
        assert_eq!(validate(&data, &schema), errors_of(&[("n", "N must be a valid number")]));
    }

    #[test]
    fn test_missing_schema_is_valid() {
        let data: SubmissionData = [("anything", "at all")].into_iter().collect();
        assert!(validate(&data, &FormSchema::default()).is_empty());
    }
}
