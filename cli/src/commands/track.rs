//! Track command

use colored::Colorize;

use super::Context;
use crate::error::Result;
use crate::output::{table, PropertyRow};

pub async fn handle(reference: &str, ctx: &Context) -> Result<()> {
    let tracking = ctx.portal.track(reference.trim()).await?;

    ctx.format.print(&tracking, || {
        let days = match tracking.estimated_processing_days {
            Some(estimate) => format!("{} of {}", tracking.processing_days, estimate),
            None => tracking.processing_days.to_string(),
        };
        let days = if tracking.is_overdue {
            format!("{} (overdue)", days).red().to_string()
        } else {
            days
        };

        let mut rows = vec![
            PropertyRow::new("Reference", &tracking.reference_number),
            PropertyRow::new("Form", tracking.form_type_name.as_deref().unwrap_or("-")),
            PropertyRow::new("Status", tracking.status_label.bold()),
            PropertyRow::new("Submitted at", tracking.submitted_at.format("%Y-%m-%d %H:%M UTC")),
            PropertyRow::new("Processing days", days),
        ];
        if let Some(completed_at) = tracking.completed_at {
            rows.push(PropertyRow::new("Completed at", completed_at.format("%Y-%m-%d %H:%M UTC")));
        }
        if let Some(notes) = &tracking.processing_notes {
            rows.push(PropertyRow::new("Notes", notes));
        }
        table(rows)
    })?;

    tracing::debug!(reference, status = %tracking.status, "Tracked submission");
    Ok(())
}
