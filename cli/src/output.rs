//! Output formatting

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::{CliError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Machine formats serialize `data`; table mode prints what `table` renders.
    pub fn print<T: Serialize>(&self, data: &T, table: impl FnOnce() -> String) -> Result<()> {
        match self {
            OutputFormat::Json => {
                let out = serde_json::to_string_pretty(data).map_err(|e| CliError::Output(e.to_string()))?;
                println!("{}", out);
            }
            OutputFormat::Yaml => {
                let out = serde_yaml::to_string(data).map_err(|e| CliError::Output(e.to_string()))?;
                print!("{}", out);
            }
            OutputFormat::Table => println!("{}", table()),
        }
        Ok(())
    }

    pub fn is_table(&self) -> bool {
        matches!(self, OutputFormat::Table)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        };
        f.write_str(name)
    }
}

pub fn table<R: Tabled>(rows: impl IntoIterator<Item = R>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Two-column key/value row for single-record views
#[derive(Tabled)]
pub struct PropertyRow {
    #[tabled(rename = "Property")]
    pub property: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl PropertyRow {
    pub fn new(property: &str, value: impl fmt::Display) -> Self {
        Self {
            property: property.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct ErrorRow {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Problem")]
    pub message: String,
}
