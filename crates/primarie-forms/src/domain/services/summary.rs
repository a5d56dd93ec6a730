//! Confirm-step review lines

use serde::Serialize;

use crate::domain::value_objects::{FieldDescriptor, FieldValue, SubmissionData};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub name: String,
    pub title: String,
    pub value: String,
}

/// Lines for every descriptor holding a meaningful value, in field order.
///
/// Blank values and unticked checkboxes are left out, as are data keys the
/// schema does not describe.
pub fn summarize(data: &SubmissionData, fields: &[FieldDescriptor]) -> Vec<SummaryLine> {
    fields
        .iter()
        .filter_map(|field| {
            let value = data.get(&field.name)?;
            if value.is_blank() || matches!(value, FieldValue::Bool(false)) {
                return None;
            }
            Some(SummaryLine {
                name: field.name.clone(),
                title: field.title.clone(),
                value: value.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::derive_fields;
    use crate::domain::value_objects::{FieldSchema, FormSchema};

    #[test]
    fn test_summary_lines() {
        let schema = FormSchema::new()
            .field("nume", FieldSchema::text("Nume"))
            .field("urgent", FieldSchema::boolean("Urgent"))
            .field("copie", FieldSchema::boolean("Copie"))
            .field("suma", FieldSchema::number("Suma"))
            .field("gol", FieldSchema::text("Gol"));
        let fields = derive_fields(&schema);

        let data: SubmissionData = [
            ("suma", FieldValue::from(250)),
            ("nume", FieldValue::from("Ion")),
            ("urgent", FieldValue::from(true)),
            ("copie", FieldValue::from(false)),
            ("gol", FieldValue::from("")),
            ("necunoscut", FieldValue::from("x")),
        ]
        .into_iter()
        .collect();

        let lines = summarize(&data, &fields);
        let rendered: Vec<_> = lines
            .iter()
            .map(|l| format!("{}: {}", l.title, l.value))
            .collect();
        assert_eq!(rendered, vec!["Nume: Ion", "Urgent: Yes", "Suma: 250"]);
    }
}
