//! Stackcheck CLI

use std::{
    io::{self, Write},
    process::ExitCode,
};

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, error};

use stackcheck::{
    config::{CliConfig, Command, ConfigError, IdsArgs, SimulateArgs},
    ids::{IdentifierEditor, IdentifierSet, parse_batch},
    modal::{SubmitError, TestModal},
    observability::{ObservabilityError, init_subscriber},
    render::write_summary,
    simulation::{FormField, ReplayTester, SimulationForm},
};

const FORM_FIELDS: [FormField; 7] = [
    FormField::CartTotal,
    FormField::Quantity,
    FormField::ProductIds,
    FormField::CollectionIds,
    FormField::CustomerSegment,
    FormField::ShippingCost,
    FormField::TaxRate,
];

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Observability(#[from] ObservabilityError),

    #[error("failed to read or write: {0}")]
    Io(#[from] io::Error),

    #[error("invalid simulation form file: {0}")]
    Form(#[from] serde_norway::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(ConfigError::Cli(error)) => {
            // clap renders help/version as errors too
            _ = error.print();

            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
        Err(other) => return report(&other.into()),
    };

    match run(config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => report(&error),
    }
}

fn report(error: &CliError) -> ExitCode {
    #[expect(
        clippy::print_stderr,
        reason = "logging may not be initialized, must use eprintln for startup errors"
    )]
    {
        eprintln!("stackcheck: {error}");
    }

    ExitCode::FAILURE
}

async fn run(config: CliConfig) -> Result<bool, CliError> {
    init_subscriber(&config.logging)?;

    let currency = config.currency()?;
    let mut out = io::stdout().lock();

    match config.command {
        Command::Ids(args) => {
            edit_ids(&args, &mut out)?;

            Ok(true)
        }
        Command::Simulate(args) => simulate(args, currency, &mut out).await,
    }
}

fn edit_ids(args: &IdsArgs, out: &mut impl Write) -> Result<(), CliError> {
    let mut latest = IdentifierSet::from_ids(parse_batch(&args.current));
    let mut changes = 0_usize;

    {
        let mut editor = IdentifierEditor::new(latest.clone(), |ids| {
            latest = ids.clone();
            changes += 1;
        });

        if let Some(raw) = &args.add {
            editor.submit_batch(raw);
        }

        for id in &args.remove {
            editor.remove(id);
        }

        if args.clear {
            editor.clear_all();
        }
    }

    debug!(changes, total = latest.len(), "edited identifier set");

    for id in &latest {
        writeln!(out, "{id}")?;
    }

    Ok(())
}

async fn simulate(
    args: SimulateArgs,
    currency: &'static Currency,
    out: &mut impl Write,
) -> Result<bool, CliError> {
    let raw = tokio::fs::read_to_string(&args.form).await?;
    let form: SimulationForm = serde_norway::from_str(&raw)?;

    let tester = ReplayTester::new(args.response);
    let mut modal = TestModal::new(args.label);

    modal.open();

    for field in FORM_FIELDS {
        modal.set_field(field, form.get(field));
    }

    match modal.submit(&tester).await {
        Ok(()) => {}
        Err(SubmitError::Invalid(errors)) => {
            for invalid in errors.iter() {
                writeln!(out, "{}: {invalid}", invalid.field())?;
            }

            return Ok(false);
        }
        Err(error @ (SubmitError::Busy | SubmitError::Closed)) => {
            error!(%error, "discount test not started");

            return Ok(false);
        }
    }

    if let Some(message) = modal.error_message() {
        writeln!(out, "✖ {message}")?;

        return Ok(false);
    }

    if let Some(summary) = modal.summary(currency) {
        writeln!(out, "{}", modal.label())?;
        write_summary(&mut *out, &summary)?;
    }

    Ok(true)
}
