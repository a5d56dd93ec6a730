//! Built-in form catalogue
//!
//! The request types a Romanian city hall offers out of the box. Seeds the
//! in-memory gateway for offline use and tests.

use crate::domain::aggregates::FormType;
use crate::domain::value_objects::{FieldSchema, FormSchema};

pub fn builtin_form_types() -> Vec<FormType> {
    vec![
        urban_planning_certificate(),
        building_permit(),
        fiscal_certificate(),
        residence_certificate(),
        utility_connection(),
        operating_licence(),
    ]
}

fn applicant_block(schema: FormSchema) -> FormSchema {
    schema
        .required_field("nume_solicitant", FieldSchema::text("Nume complet solicitant"))
        .required_field("cnp", FieldSchema::text("CNP"))
        .required_field("adresa_solicitant", FieldSchema::text("Adresa solicitant"))
        .field("telefon", FieldSchema::text("Telefon contact"))
}

fn urban_planning_certificate() -> FormType {
    let schema = applicant_block(FormSchema::new())
        .field("email", FieldSchema::text("Email contact"))
        .required_field(
            "adresa_imobil",
            FieldSchema::text("Adresa imobilului pentru care se solicită certificatul"),
        )
        .field("destinatia_constructiei", FieldSchema::text("Destinația construcției"));

    FormType::new(1, "Certificat de Urbanism", "certificat-urbanism", schema)
        .with_description(
            "Certificat necesar pentru obținerea autorizației de construire sau pentru \
             verificarea regimului urbanistic al unui teren",
        )
        .with_processing_days(15)
        .with_documents(["Copie CI", "Extras cadastral", "Dovada proprietății"])
}

fn building_permit() -> FormType {
    let schema = applicant_block(FormSchema::new())
        .field("email", FieldSchema::text("Email contact"))
        .required_field("adresa_constructie", FieldSchema::text("Adresa construcției"))
        .required_field(
            "tip_lucrari",
            FieldSchema::choice(
                "Tipul lucrărilor",
                ["construire", "extindere", "modificare", "consolidare"],
            ),
        )
        .field(
            "valoare_investitie",
            FieldSchema::number("Valoarea estimată a investiției (lei)"),
        );

    FormType::new(2, "Autorizație de Construcție", "autorizatie-constructie", schema)
        .with_description(
            "Autorizație necesară pentru execuția lucrărilor de construcții, modificări sau \
             extinderi ale construcțiilor existente",
        )
        .with_processing_days(30)
        .with_documents([
            "Copie CI",
            "Certificat de urbanism",
            "Proiect tehnic",
            "Dovada proprietății",
            "Raport expertiza tehnică",
        ])
}

fn fiscal_certificate() -> FormType {
    let schema = applicant_block(FormSchema::new())
        .required_field(
            "tip_contribuabil",
            FieldSchema::choice("Tip contribuabil", ["persoana_fizica", "persoana_juridica"]),
        )
        .field(
            "scopul_solicitarii",
            FieldSchema::text("Scopul pentru care se solicită certificatul"),
        );

    FormType::new(3, "Certificat Fiscal", "certificat-fiscal", schema)
        .with_description("Document care certifică situația fiscală a contribuabilului la bugetul local")
        .with_processing_days(5)
        .with_documents(["Copie CI", "Dovada plății taxelor și impozitelor"])
}

fn residence_certificate() -> FormType {
    let schema = FormSchema::new()
        .required_field("nume_complet", FieldSchema::text("Nume complet"))
        .required_field("cnp", FieldSchema::text("CNP"))
        .required_field("adresa_domiciliu", FieldSchema::text("Adresa domiciliului"))
        .field("telefon", FieldSchema::text("Telefon contact"))
        .field(
            "scopul_solicitarii",
            FieldSchema::text("Scopul pentru care se solicită adeverința"),
        );

    FormType::new(4, "Adeverință de Domiciliu", "adeverinta-domiciliu", schema)
        .with_description("Adeverință care certifică domiciliul/reședința unei persoane în localitate")
        .with_processing_days(3)
        .with_documents([
            "Copie CI",
            "Copie extras rol (dacă este proprietar)",
            "Contract închiriere (dacă este chiriaș)",
        ])
}

fn utility_connection() -> FormType {
    let schema = applicant_block(FormSchema::new())
        .required_field("adresa_racordare", FieldSchema::text("Adresa pentru racordare"))
        .required_field(
            "tip_utilitate",
            FieldSchema::choice(
                "Tipul utilității",
                ["apa", "canalizare", "gaz", "energie_electrica"],
            ),
        )
        .field("putere_instalata", FieldSchema::text("Puterea instalată (pentru energie)"));

    FormType::new(5, "Cerere Racordare Utilități", "cerere-racordare", schema)
        .with_description(
            "Cerere pentru racordarea la rețelele publice de utilități (apă, canalizare, gaz)",
        )
        .with_processing_days(20)
        .with_documents(["Copie CI", "Dovada proprietății", "Proiect tehnic de racordare"])
}

fn operating_licence() -> FormType {
    let schema = FormSchema::new()
        .required_field("denumire_firma", FieldSchema::text("Denumirea firmei"))
        .required_field("cui", FieldSchema::text("CUI/CIF"))
        .required_field("reprezentant_legal", FieldSchema::text("Reprezentant legal"))
        .required_field("adresa_firma", FieldSchema::text("Adresa sediului social"))
        .field("telefon", FieldSchema::text("Telefon contact"))
        .field("email", FieldSchema::text("Email contact"))
        .required_field("tip_activitate", FieldSchema::text("Tipul activității"))
        .field("cod_caen", FieldSchema::text("Cod CAEN principal"));

    FormType::new(6, "Licență de Funcționare", "licenta-functionare", schema)
        .with_description(
            "Licență necesară pentru desfășurarea anumitor activități economice în localitate",
        )
        .with_processing_days(25)
        .with_documents([
            "Certificat constatator ONRC",
            "Copie CI reprezentant legal",
            "Dovada proprietății/închirierii spațiului",
        ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::derive_fields;
    use crate::domain::value_objects::FieldKind;
    use std::collections::HashSet;

    #[test]
    fn test_catalogue_is_consistent() {
        let form_types = builtin_form_types();
        assert_eq!(form_types.len(), 6);

        let ids: HashSet<_> = form_types.iter().map(|t| t.id).collect();
        let slugs: HashSet<_> = form_types.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(ids.len(), 6);
        assert_eq!(slugs.len(), 6);

        for form_type in &form_types {
            assert!(form_type.is_active);
            assert!(form_type.estimated_processing_days.is_some());
            assert!(!form_type.required_documents.is_empty());
            for name in &form_type.form_schema.required {
                assert!(
                    form_type.form_schema.property(name).is_some(),
                    "{} requires undeclared {}",
                    form_type.slug,
                    name
                );
            }
        }
    }

    #[test]
    fn test_building_permit_fields() {
        let permit = building_permit();
        let fields = derive_fields(&permit.form_schema);
        let kinds: Vec<_> = fields.iter().map(|f| (f.name.as_str(), f.kind.name())).collect();

        assert_eq!(kinds[0], ("nume_solicitant", "string"));
        assert!(kinds.contains(&("tip_lucrari", "enum")));
        assert!(kinds.contains(&("valoare_investitie", "number")));
        assert_eq!(
            fields.iter().filter(|f| f.required).count(),
            permit.form_schema.required.len()
        );
        assert!(matches!(
            &fields.iter().find(|f| f.name == "tip_lucrari").unwrap().kind,
            FieldKind::Enum(options) if options.len() == 4
        ));
    }
}
