//! CLI error type

use std::path::PathBuf;

use primarie_forms::{FormLevelError, FormsError, GatewayError, PortalError, WizardError, WizardStep};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Forms(#[from] FormsError),

    #[error(transparent)]
    Portal(#[from] PortalError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid data: {0}")]
    Data(String),

    #[error("{count} field(s) failed validation")]
    Invalid { count: usize },

    #[error("step '{step}' is incomplete")]
    StepRejected { step: WizardStep },

    #[error(transparent)]
    Submission(FormLevelError),

    #[error("output error: {0}")]
    Output(String),
}

pub type Result<T> = std::result::Result<T, CliError>;
