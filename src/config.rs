//! CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rusty_money::{Findable, iso::Currency};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Command line or environment could not be parsed.
    #[error(transparent)]
    Cli(#[from] clap::Error),

    /// The configured currency is not a known ISO currency.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Discount stack test tooling
#[derive(Debug, Parser)]
#[command(name = "stackcheck", about = "Discount stack test tooling", long_about = None)]
pub struct CliConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// ISO currency code used to format amounts
    #[arg(long, env = "STACKCHECK_CURRENCY", default_value = "USD", global = true)]
    pub currency: String,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Edit an identifier set and print the result
    Ids(IdsArgs),

    /// Run a discount test against a recorded response and print the breakdown
    Simulate(SimulateArgs),
}

/// Arguments for `ids`.
#[derive(Debug, Args)]
pub struct IdsArgs {
    /// Current identifiers, comma or whitespace separated
    #[arg(long, default_value = "")]
    pub current: String,

    /// Raw text to add as a batch
    #[arg(long)]
    pub add: Option<String>,

    /// Identifiers to remove
    #[arg(long)]
    pub remove: Vec<String>,

    /// Clear every identifier after the other edits
    #[arg(long)]
    pub clear: bool,
}

/// Arguments for `simulate`.
#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// YAML file holding the simulation form fields
    #[arg(long)]
    pub form: PathBuf,

    /// JSON file holding the recorded service response
    #[arg(long)]
    pub response: PathBuf,

    /// Name of the discount stack under test
    #[arg(long, default_value = "Discount stack")]
    pub label: String,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Ok(Self::try_parse()?)
    }

    /// Resolve the configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] if the code is not a known ISO currency.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        resolve_currency(&self.currency)
    }
}

/// Look up an ISO currency by code, case-insensitively.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownCurrency`] if the code is not a known ISO currency.
pub fn resolve_currency(code: &str) -> Result<&'static Currency, ConfigError> {
    Currency::find(&code.trim().to_uppercase())
        .ok_or_else(|| ConfigError::UnknownCurrency(code.to_string()))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn resolves_known_currency_case_insensitively() -> TestResult {
        let currency = resolve_currency(" gbp ")?;

        assert_eq!(currency.iso_alpha_code, "GBP");

        Ok(())
    }

    #[test]
    fn log_level_defaults_to_warn() {
        let command = CliConfig::command();
        let default = command
            .get_arguments()
            .find(|arg| arg.get_id() == "log_level")
            .and_then(|arg| arg.get_default_values().first())
            .and_then(|value| value.to_str());

        assert_eq!(default, Some("warn"));
    }

    #[test]
    fn rejects_unknown_currency() {
        assert!(matches!(
            resolve_currency("ZZZ"),
            Err(ConfigError::UnknownCurrency(code)) if code == "ZZZ"
        ));
    }

    #[test]
    fn parses_simulate_command() -> TestResult {
        let config = CliConfig::try_parse_from([
            "stackcheck",
            "--currency",
            "EUR",
            "simulate",
            "--form",
            "form.yaml",
            "--response",
            "response.json",
        ])?;

        assert_eq!(config.currency, "EUR");

        let Command::Simulate(args) = config.command else {
            return Err("expected simulate command".into());
        };

        assert_eq!(args.label, "Discount stack");
        assert_eq!(args.response, PathBuf::from("response.json"));

        Ok(())
    }

    #[test]
    fn parses_repeated_removals() -> TestResult {
        let config = CliConfig::try_parse_from([
            "stackcheck", "ids", "--current", "a,b,c", "--remove", "a", "--remove", "c",
        ])?;

        let Command::Ids(args) = config.command else {
            return Err("expected ids command".into());
        };

        assert_eq!(args.remove, ["a", "c"]);
        assert!(!args.clear);

        Ok(())
    }
}
