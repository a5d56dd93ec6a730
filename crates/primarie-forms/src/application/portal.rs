//! Forms portal service
//!
//! Entry point for a citizen session: browse the catalogue, open a wizard
//! for one form type, track a submitted request.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::application::dto::SubmissionTracking;
use crate::domain::aggregates::{FormType, FormWizard};
use crate::error::{FormsError, PortalError};
use crate::ports::{FormsGateway, GatewayError};

pub struct FormsPortal {
    gateway: Arc<dyn FormsGateway>,
}

impl FormsPortal {
    pub fn new(gateway: Arc<dyn FormsGateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> Arc<dyn FormsGateway> {
        self.gateway.clone()
    }

    /// Active form types
    pub async fn catalogue(&self) -> Result<Vec<FormType>, PortalError> {
        let form_types = self
            .gateway
            .list_form_types()
            .await
            .map_err(PortalError::Gateway)?;
        tracing::debug!(count = form_types.len(), "Loaded form catalogue");
        Ok(form_types)
    }

    /// Form type accepting requests under `slug`
    pub async fn form_type(&self, slug: &str) -> Result<FormType, PortalError> {
        let form_type = self
            .gateway
            .get_form_type_by_slug(slug)
            .await
            .map_err(|e| match e {
                GatewayError::NotFound(_) => PortalError::FormTypeNotFound(slug.to_string()),
                other => PortalError::Gateway(other),
            })?;

        if !form_type.is_active {
            return Err(PortalError::FormTypeInactive(slug.to_string()));
        }
        Ok(form_type)
    }

    pub async fn open_wizard(&self, slug: &str) -> Result<FormWizard, FormsError> {
        let form_type = self.form_type(slug).await?;
        tracing::info!(form_type = %form_type.slug, fields = form_type.form_schema.len(), "Opening wizard");
        FormWizard::new(form_type, self.gateway.clone())
    }

    pub async fn track(&self, reference: &str) -> Result<SubmissionTracking, PortalError> {
        self.track_at(reference, Utc::now()).await
    }

    /// [`FormsPortal::track`] against a fixed clock
    pub async fn track_at(
        &self,
        reference: &str,
        now: DateTime<Utc>,
    ) -> Result<SubmissionTracking, PortalError> {
        let submission = self
            .gateway
            .get_submission_by_reference(reference)
            .await
            .map_err(|e| match e {
                GatewayError::NotFound(_) => PortalError::SubmissionNotFound(reference.to_string()),
                other => PortalError::Gateway(other),
            })?;

        let form_type = match self.gateway.get_form_type(submission.form_type_id).await {
            Ok(form_type) => Some(form_type),
            Err(GatewayError::NotFound(_)) => {
                tracing::warn!(
                    form_type_id = submission.form_type_id,
                    reference,
                    "Form type of submission no longer exists"
                );
                None
            }
            Err(other) => return Err(PortalError::Gateway(other)),
        };

        Ok(SubmissionTracking::build(&submission, form_type.as_ref(), now))
    }
}
