//! Primarie Digitala CLI
//!
//! Command-line access to the city hall's online administrative requests.
//!
//! # Usage
//!
//! ```bash
//! primarie forms list
//! primarie forms show certificat-fiscal
//! primarie forms validate certificat-fiscal --data cerere.json
//! primarie forms submit certificat-fiscal --data cerere.yaml \
//!     --name "Ion Popescu" --email ion@example.ro --consent
//! primarie track CERERE-20240301-K7Q2M9XA --format json
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use primarie_forms::infrastructure::http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

#[derive(Parser)]
#[command(name = "primarie")]
#[command(author = "Primarie Digitala")]
#[command(version)]
#[command(about = "Primarie Digitala Command Line Interface", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "PRIMARIE_API_URL")]
    api_url: Option<String>,

    /// Bearer token for the backend
    #[arg(long, env = "PRIMARIE_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Work against the built-in catalogue, without a backend
    #[arg(long)]
    offline: bool,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and submit forms
    Forms {
        #[command(subcommand)]
        action: FormCommands,
    },
    /// Show the progress of a submitted request
    Track {
        /// Reference number, e.g. CERERE-20240301-K7Q2M9XA
        reference: String,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub(crate) enum FormCommands {
    /// List the form types accepting requests
    List,
    /// Show a form type and its fields
    Show { slug: String },
    /// Check field values against a form's schema
    Validate {
        slug: String,
        /// JSON or YAML file with field values
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Field value as name=value (repeatable)
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
    /// Fill in and submit a request
    Submit {
        slug: String,
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
        /// Applicant full name
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        /// Personal numeric code
        #[arg(long)]
        cnp: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Consent to the processing of personal data
        #[arg(long)]
        consent: bool,
        /// Stop at the confirmation step and print the summary
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> error::Result<()> {
    let profile = cli.profile.as_deref();
    let command = match cli.command {
        Commands::Config { action } => return commands::config::handle(action, profile).await,
        other => other,
    };

    let config = config::Config::load(profile).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Config not loaded, using defaults");
        config::Config::default()
    });

    let settings = commands::Settings {
        api_url: cli
            .api_url
            .or(config.api_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        api_token: cli.api_token.or(config.api_token),
        timeout: cli
            .timeout_secs
            .or(config.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT),
        offline: cli.offline || config.offline.unwrap_or(false),
        format: cli
            .format
            .or(config.default_format)
            .unwrap_or(output::OutputFormat::Table),
    };
    let ctx = commands::Context::new(&settings)?;

    match command {
        Commands::Forms { action } => commands::forms::handle(action, &ctx).await,
        Commands::Track { reference } => commands::track::handle(&reference, &ctx).await,
        Commands::Config { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_flag_is_rejected() {
        assert!(Cli::try_parse_from(["primarie", "--timeout-secs", "0", "forms", "list"]).is_err());
        let cli = Cli::try_parse_from(["primarie", "--timeout-secs", "3", "forms", "list"]).unwrap();
        assert_eq!(cli.timeout_secs, Some(3));
    }
}
