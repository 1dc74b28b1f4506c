use chrono::NaiveDate;
use clap::Args;
use leadportal_core::clock::{Clock, SystemClock};
use leadportal_core::metrics::{
    evaluate_daily_report, format_minutes, DailyPerformance, DailyReport, TargetEvaluator,
};
use serde::Serialize;

use crate::commands::{load_config, CommandResult, EXIT_INPUT};

#[derive(Debug, Clone, Default, Args)]
pub struct ReportArgs {
    #[arg(long, help = "Outbound calls made")]
    pub calls: Option<u32>,
    #[arg(long, help = "Minutes spent on the dialer")]
    pub dialer_minutes: Option<u32>,
    #[arg(long, help = "Meetings booked")]
    pub bookings: Option<u32>,
    #[arg(long, help = "Pipeline value attributable to booked meetings")]
    pub pipeline: Option<f64>,
    #[arg(
        long,
        help = "Evaluate a day with no submitted report",
        conflicts_with_all = ["calls", "dialer_minutes", "bookings", "pipeline"]
    )]
    pub missing: bool,
    #[arg(long, help = "Report date (YYYY-MM-DD); defaults to today")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct ReportOutput {
    date: NaiveDate,
    dialer_time: Option<String>,
    #[serde(flatten)]
    performance: DailyPerformance,
}

pub fn run(args: ReportArgs) -> CommandResult {
    let config = match load_config("report") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let date = args.date.unwrap_or_else(|| SystemClock.today());
    let report = if args.missing {
        None
    } else {
        match (args.calls, args.dialer_minutes, args.bookings) {
            (Some(calls_made), Some(dialer_minutes), Some(bookings_made)) => Some(DailyReport {
                date,
                calls_made,
                dialer_minutes,
                bookings_made,
                pipeline_value: args.pipeline.unwrap_or(0.0),
            }),
            _ => {
                return CommandResult::failure(
                    "report",
                    "input_validation",
                    "--calls, --dialer-minutes and --bookings are required unless --missing is set",
                    EXIT_INPUT,
                );
            }
        }
    };

    let evaluator = TargetEvaluator::with_thresholds(config.business.thresholds);
    let performance = evaluate_daily_report(&evaluator, report.as_ref(), &config.targets);
    let output = ReportOutput {
        date,
        dialer_time: report.as_ref().map(|report| format_minutes(report.dialer_minutes)),
        performance,
    };
    let message = format!("overall status: {}", output.performance.overall.as_str());

    CommandResult::success("report", message, output)
}
