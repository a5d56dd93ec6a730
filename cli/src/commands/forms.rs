//! Forms commands

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use primarie_forms::{
    derive_fields, validate, ApplicantField, FieldDescriptor, FieldKind, FormType, FormWizard,
    StepOutcome, SubmitOutcome, SummaryLine, ValidationErrors,
};

use super::{collect_data, Context};
use crate::error::{CliError, Result};
use crate::output::{table, ErrorRow, PropertyRow};
use crate::FormCommands;

#[derive(Tabled)]
struct FormTypeRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Days")]
    days: String,
    #[tabled(rename = "Fields")]
    fields: usize,
}

impl From<&FormType> for FormTypeRow {
    fn from(form_type: &FormType) -> Self {
        Self {
            id: form_type.id,
            slug: form_type.slug.clone(),
            name: form_type.name.clone(),
            days: form_type
                .estimated_processing_days
                .map_or_else(|| "-".to_string(), |d| d.to_string()),
            fields: form_type.form_schema.len(),
        }
    }
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    name: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Required")]
    required: &'static str,
    #[tabled(rename = "Allowed values")]
    options: String,
}

impl From<&FieldDescriptor> for FieldRow {
    fn from(field: &FieldDescriptor) -> Self {
        let kind = match &field.kind {
            FieldKind::String if field.is_multiline() => "text (multi-line)".to_string(),
            other => other.name().to_string(),
        };
        Self {
            name: field.name.clone(),
            title: field.title.clone(),
            kind,
            required: if field.required { "yes" } else { "" },
            options: field
                .option_labels()
                .into_iter()
                .map(|(value, label)| format!("{} ({})", value, label))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[derive(Serialize)]
struct FormTypeView<'a> {
    #[serde(flatten)]
    form_type: &'a FormType,
    fields: Vec<FieldDescriptor>,
}

#[derive(Serialize)]
struct ValidationReport<'a> {
    valid: bool,
    errors: &'a ValidationErrors,
}

#[derive(Serialize)]
struct DryRun<'a> {
    form_type: &'a str,
    summary: &'a [SummaryLine],
}

pub async fn handle(action: FormCommands, ctx: &Context) -> Result<()> {
    match action {
        FormCommands::List => {
            let form_types = ctx.portal.catalogue().await?;
            ctx.format
                .print(&form_types, || table(form_types.iter().map(FormTypeRow::from)))?;
        }
        FormCommands::Show { slug } => {
            let form_type = ctx.portal.form_type(&slug).await?;
            let view = FormTypeView {
                form_type: &form_type,
                fields: derive_fields(&form_type.form_schema),
            };
            ctx.format.print(&view, || render_form_type(&view))?;
        }
        FormCommands::Validate { slug, data, fields } => {
            let form_type = ctx.portal.form_type(&slug).await?;
            let data = collect_data(data.as_deref(), &fields)?;
            let errors = validate(&data, &form_type.form_schema);

            let report = ValidationReport {
                valid: errors.is_empty(),
                errors: &errors,
            };
            ctx.format.print(&report, || {
                if errors.is_empty() {
                    format!("{} data is valid for {}", "✓".green(), form_type.name)
                } else {
                    error_table(&errors)
                }
            })?;

            if !errors.is_empty() {
                return Err(CliError::Invalid { count: errors.len() });
            }
        }
        FormCommands::Submit {
            slug,
            data,
            fields,
            name,
            email,
            phone,
            cnp,
            address,
            consent,
            dry_run,
        } => {
            let data = collect_data(data.as_deref(), &fields)?;
            let wizard = ctx.portal.open_wizard(&slug).await?;

            // Form information
            advance(&wizard)?;

            wizard.set_applicant(ApplicantField::Name, name)?;
            wizard.set_applicant(ApplicantField::Email, email)?;
            let optional = [
                (ApplicantField::Phone, phone),
                (ApplicantField::Cnp, cnp),
                (ApplicantField::Address, address),
            ];
            for (field, value) in optional {
                if let Some(value) = value {
                    wizard.set_applicant(field, value)?;
                }
            }
            advance(&wizard)?;

            for (name, value) in data.iter() {
                wizard.set_field(name.clone(), value.clone())?;
            }
            advance(&wizard)?;

            let summary = wizard.summary();
            if dry_run {
                let report = DryRun {
                    form_type: &wizard.form_type().slug,
                    summary: &summary,
                };
                return ctx.format.print(&report, || {
                    table(summary.iter().map(|l| PropertyRow::new(&l.title, &l.value)))
                });
            }

            wizard.set_consent(consent)?;
            submit(&wizard, ctx).await?;
        }
    }
    Ok(())
}

/// `next()` that turns a rejected step into an error after printing why.
fn advance(wizard: &FormWizard) -> Result<()> {
    let step = wizard.step();
    match wizard.next() {
        StepOutcome::Advanced(_) | StepOutcome::ReadyToSubmit => Ok(()),
        StepOutcome::Rejected(errors) => {
            eprintln!("{}", error_table(&errors));
            Err(CliError::StepRejected { step })
        }
        StepOutcome::Closed => Err(CliError::StepRejected { step }),
    }
}

async fn submit(wizard: &FormWizard, ctx: &Context) -> Result<()> {
    match wizard.submit().await {
        SubmitOutcome::Submitted(receipt) => {
            ctx.format.print(&receipt, || {
                let rows = vec![
                    PropertyRow::new("Reference", receipt.reference_number.bold()),
                    PropertyRow::new("Status", receipt.status.label()),
                    PropertyRow::new("Submitted at", receipt.submitted_at.format("%Y-%m-%d %H:%M UTC")),
                ];
                format!("{} Request submitted\n{}", "✓".green(), table(rows))
            })?;
            if ctx.format.is_table() && !wizard.form_type().required_documents.is_empty() {
                println!("\nBring the following documents:");
                for document in &wizard.form_type().required_documents {
                    println!("  - {}", document);
                }
            }
            Ok(())
        }
        SubmitOutcome::Failed(err) => {
            let errors = wizard.errors();
            if !errors.is_empty() {
                eprintln!("{}", error_table(&errors));
            }
            if err.is_retryable() {
                eprintln!("{}", "The service is unavailable; the request can be sent again.".yellow());
            }
            Err(CliError::Submission(err))
        }
        SubmitOutcome::AlreadyPending | SubmitOutcome::NotReady(_) | SubmitOutcome::Discarded => {
            Err(CliError::StepRejected { step: wizard.step() })
        }
    }
}

fn error_table(errors: &ValidationErrors) -> String {
    table(errors.iter().map(|(field, message)| ErrorRow {
        field: field.clone(),
        message: message.clone(),
    }))
}

fn render_form_type(view: &FormTypeView<'_>) -> String {
    let form_type = view.form_type;
    let mut out = format!("{}\n", form_type.name.bold());
    if let Some(description) = &form_type.description {
        out.push_str(&format!("{}\n", description));
    }
    if let Some(days) = form_type.estimated_processing_days {
        out.push_str(&format!("Estimated processing: {} days\n", days));
    }
    if let Some(instructions) = &form_type.instructions {
        out.push_str(&format!("\n{}\n", instructions));
    }
    if !form_type.required_documents.is_empty() {
        out.push_str("\nRequired documents:\n");
        for document in &form_type.required_documents {
            out.push_str(&format!("  - {}\n", document));
        }
    }
    out.push('\n');
    out.push_str(&table(view.fields.iter().map(FieldRow::from)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use primarie_forms::builtin_form_types;

    fn residence() -> FormType {
        builtin_form_types()
            .into_iter()
            .find(|t| t.slug == "adeverinta-domiciliu")
            .unwrap()
    }

    #[test]
    fn test_field_rows() {
        let fields = derive_fields(&residence().form_schema);
        let rows: Vec<FieldRow> = fields.iter().map(FieldRow::from).collect();

        assert_eq!(rows[0].name, "nume_complet");
        assert_eq!(rows[0].required, "yes");
        assert_eq!(rows[3].required, "");
        assert!(rows.iter().all(|r| r.kind == "string" && r.options.is_empty()));
    }

    #[test]
    fn test_render_form_type() {
        let form_type = residence();
        let view = FormTypeView {
            form_type: &form_type,
            fields: derive_fields(&form_type.form_schema),
        };
        let rendered = render_form_type(&view);
        assert!(rendered.contains("Adeverință de Domiciliu"));
        assert!(rendered.contains("Estimated processing: 3 days"));
        assert!(rendered.contains("Copie CI"));
        assert!(rendered.contains("adresa_domiciliu"));
    }

    #[test]
    fn test_form_type_json_view() {
        let form_type = residence();
        let view = FormTypeView {
            form_type: &form_type,
            fields: derive_fields(&form_type.form_schema),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["slug"], "adeverinta-domiciliu");
        assert_eq!(json["fields"][0]["name"], "nume_complet");
    }
}
