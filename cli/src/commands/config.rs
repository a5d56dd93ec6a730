//! Config commands

use colored::Colorize;
use primarie_forms::infrastructure::http::DEFAULT_BASE_URL;

use crate::config::{Config, KEYS};
use crate::error::Result;
use crate::output::OutputFormat;
use crate::ConfigCommands;

pub async fn handle(action: ConfigCommands, profile: Option<&str>) -> Result<()> {
    match action {
        ConfigCommands::Init => {
            let config = Config {
                api_url: Some(DEFAULT_BASE_URL.to_string()),
                default_format: Some(OutputFormat::Table),
                ..Config::default()
            };
            let path = config.save(profile)?;
            println!("{} Configuration initialized at {}", "✓".green(), path.display());
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load(profile)?;
            config.set(&key, &value)?;
            config.save(profile)?;
            println!("Set {} successfully", key);
        }
        ConfigCommands::Get { key } => {
            let config = Config::load(profile)?;
            println!("{}: {}", key, display(config.get(&key)?));
        }
        ConfigCommands::List => {
            let config = Config::load(profile)?;
            for key in KEYS {
                println!("{}: {}", key, display(config.get(key)?));
            }
        }
    }
    Ok(())
}

fn display(value: Option<String>) -> String {
    value.unwrap_or_else(|| "(not set)".dimmed().to_string())
}
