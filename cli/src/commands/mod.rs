//! CLI Commands

pub mod config;
pub mod forms;
pub mod track;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use primarie_forms::{
    FieldValue, FormsGateway, FormsPortal, HttpFormsGateway, HttpGatewayConfig,
    InMemoryFormsGateway, SubmissionData,
};

use crate::error::{CliError, Result};
use crate::output::OutputFormat;

/// Resolved connection settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
    pub offline: bool,
    pub format: OutputFormat,
}

/// What every command handler gets
pub struct Context {
    pub portal: FormsPortal,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(settings: &Settings) -> Result<Self> {
        let gateway: Arc<dyn FormsGateway> = if settings.offline {
            tracing::debug!("Using the built-in form catalogue");
            Arc::new(InMemoryFormsGateway::with_catalog())
        } else {
            let mut config = HttpGatewayConfig::new(settings.api_url.clone()).with_timeout(settings.timeout);
            if let Some(token) = &settings.api_token {
                config = config.with_token(token.clone());
            }
            Arc::new(HttpFormsGateway::new(config)?)
        };

        Ok(Self {
            portal: FormsPortal::new(gateway),
            format: settings.format,
        })
    }
}

/// Reads a JSON or YAML object of field values; YAML is picked by extension.
pub fn load_data(path: &Path) -> Result<SubmissionData> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| CliError::Data(format!("{}: {}", path.display(), e)))
    } else {
        serde_json::from_str(&content).map_err(|e| CliError::Data(format!("{}: {}", path.display(), e)))
    }
}

/// `name=value` from `--field`. `true`/`false` become booleans, anything
/// else stays text.
pub fn parse_assignment(raw: &str) -> Result<(String, FieldValue)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| CliError::Data(format!("expected name=value, got {}", raw)))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::Data(format!("missing field name in {}", raw)));
    }

    let value = match value {
        "true" => FieldValue::Bool(true),
        "false" => FieldValue::Bool(false),
        other => FieldValue::from(other),
    };
    Ok((name.to_string(), value))
}

/// File contents overlaid with `--field` assignments
pub fn collect_data(file: Option<&Path>, assignments: &[String]) -> Result<SubmissionData> {
    let mut data = match file {
        Some(path) => load_data(path)?,
        None => SubmissionData::new(),
    };
    for raw in assignments {
        let (name, value) = parse_assignment(raw)?;
        data.set(name, value);
    }
    Ok(data)
}
