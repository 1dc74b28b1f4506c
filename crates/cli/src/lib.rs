pub mod commands;

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use leadportal_core::config::{AppConfig, LoadOptions, LogFormat, LoggingConfig};
use tracing::Level;

use crate::commands::{
    deal::DealArgs, order::OrderArgs, rank::RankArgs, report::ReportArgs, status::StatusArgs,
};

#[derive(Debug, Parser)]
#[command(
    name = "leadportal",
    about = "Lead portal performance and fulfillment metrics",
    long_about = "Classify rep performance against targets, rank lead orders by urgency, and break deal revenue into cost lines.",
    after_help = "Examples:\n  leadportal status --actual 82 --target 100\n  leadportal order --purchased 100 --fulfilled 40 --target-date 2026-03-31\n  leadportal deal --revenue-inc-vat 1200 --leads-sold 10 --lead-sale-price 120 --setter-pct 10 --rep-pct 5"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Compare an actual value with its target and classify the result")]
    Status(StatusArgs),
    #[command(about = "Evaluate a rep's daily report against the configured targets")]
    Report(ReportArgs),
    #[command(about = "Show completion, deadline and priority details for one lead order")]
    Order(OrderArgs),
    #[command(about = "Rank lead orders from a JSON file, most urgent first")]
    Rank(RankArgs),
    #[command(about = "Break a deal's gross revenue into net revenue and cost lines")]
    Deal(DealArgs),
    #[command(about = "Inspect effective business rules and targets with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let logging = AppConfig::load(LoadOptions::default())
        .map(|config| config.logging)
        .unwrap_or_default();
    if let Err(error) = init_logging(&logging) {
        eprintln!("logging disabled: {error:#}");
    }

    let result = match cli.command {
        Command::Status(args) => commands::status::run(args),
        Command::Report(args) => commands::report::run(args),
        Command::Order(args) => commands::order::run(args),
        Command::Rank(args) => commands::rank::run(args),
        Command::Deal(args) => commands::deal::run(args),
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout carries only the JSON payload.
fn init_logging(logging: &LoggingConfig) -> anyhow::Result<()> {
    let log_level = logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(io::stderr);

    match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|error| anyhow::anyhow!(error))
}
