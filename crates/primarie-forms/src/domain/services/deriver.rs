//! Schema → field descriptor derivation

use crate::domain::value_objects::{FieldDescriptor, FormSchema};

/// Ordered field descriptors for `schema`, one per property.
///
/// Follows the schema's own key order; a schema without properties yields
/// nothing.
pub fn derive_fields(schema: &FormSchema) -> Vec<FieldDescriptor> {
    let Some(properties) = schema.properties.as_ref() else {
        return Vec::new();
    };

    properties
        .iter()
        .map(|(name, field)| FieldDescriptor {
            name: name.clone(),
            title: field.title.clone().unwrap_or_else(|| name.clone()),
            field_type: field.field_type(),
            kind: field.kind(),
            required: schema.is_required(name),
            options: field.options.clone(),
            format: field.format.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{FieldKind, FieldSchema, FieldType};

    fn permit_schema() -> FormSchema {
        FormSchema::new()
            .required_field("nume_solicitant", FieldSchema::text("Nume complet solicitant"))
            .field("valoare_investitie", FieldSchema::number("Valoarea investitiei"))
            .required_field(
                "tip_lucrari",
                FieldSchema::choice("Tipul lucrarilor", ["construire", "extindere"]),
            )
            .field("data_inceperii", FieldSchema::date("Data inceperii"))
            .field("observatii_notes", FieldSchema::default())
    }

    #[test]
    fn test_descriptors_follow_schema_order() {
        let names: Vec<_> = derive_fields(&permit_schema())
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "nume_solicitant",
                "valoare_investitie",
                "tip_lucrari",
                "data_inceperii",
                "observatii_notes"
            ]
        );
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let schema = permit_schema();
        assert_eq!(derive_fields(&schema), derive_fields(&schema));
    }

    #[test]
    fn test_fallbacks_and_flags() {
        let fields = derive_fields(&permit_schema());

        assert!(fields[0].required);
        assert!(!fields[1].required);
        assert_eq!(fields[1].field_type, FieldType::Number);
        assert_eq!(fields[2].options.as_ref().map(Vec::len), Some(2));
        assert_eq!(fields[3].format.as_deref(), Some("date"));
        assert_eq!(fields[3].kind, FieldKind::Date);

        let untitled = &fields[4];
        assert_eq!(untitled.title, "observatii_notes");
        assert_eq!(untitled.field_type, FieldType::String);
        assert!(untitled.is_multiline());
    }

    #[test]
    fn test_option_labels() {
        let fields = derive_fields(&permit_schema());
        assert_eq!(
            fields[2].option_labels(),
            vec![
                ("construire".to_string(), "Construire".to_string()),
                ("extindere".to_string(), "Extindere".to_string())
            ]
        );
        assert!(fields[0].option_labels().is_empty());
    }

    #[test]
    fn test_no_properties() {
        assert!(derive_fields(&FormSchema::default()).is_empty());
        assert!(derive_fields(&FormSchema::new()).is_empty());
    }
}
