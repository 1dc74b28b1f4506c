use chrono::NaiveDate;
use clap::Args;
use leadportal_core::clock::{Clock, SystemClock};
use leadportal_core::domain::fulfillment::FulfillmentRecord;
use leadportal_core::errors::{ApplicationError, InterfaceError};
use leadportal_core::metrics::{calculate_leads_per_day, FulfillmentRanker, OrderProgress};
use serde::Serialize;

use crate::commands::{load_config, CommandResult, EXIT_INPUT};

#[derive(Debug, Clone, Default, Args)]
pub struct OrderArgs {
    #[arg(long, help = "Leads the client purchased")]
    pub purchased: u32,
    #[arg(long, help = "Leads delivered so far")]
    pub fulfilled: u32,
    #[arg(long, help = "Delivery deadline (YYYY-MM-DD)")]
    pub target_date: Option<NaiveDate>,
    #[arg(long, help = "Date the client was onboarded (YYYY-MM-DD)")]
    pub onboarding_date: Option<NaiveDate>,
    #[arg(long, help = "Evaluate as of this date instead of the current UTC date")]
    pub today: Option<NaiveDate>,
    #[arg(long, help = "Reject orders with more leads fulfilled than purchased")]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
struct OrderOutput {
    today: NaiveDate,
    record: FulfillmentRecord,
    progress: OrderProgress,
    /// Planned even delivery rate from onboarding to deadline.
    leads_per_day: Option<f64>,
}

pub fn run(args: OrderArgs) -> CommandResult {
    let config = match load_config("order") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let record = if args.strict {
        match FulfillmentRecord::validated(args.purchased, args.fulfilled, args.target_date) {
            Ok(record) => record,
            Err(error) => {
                let interface = InterfaceError::from(ApplicationError::from(error));
                return CommandResult::failure(
                    "order",
                    "input_validation",
                    interface.to_string(),
                    EXIT_INPUT,
                );
            }
        }
    } else {
        FulfillmentRecord::new(args.purchased, args.fulfilled, args.target_date)
    };

    let today = args.today.unwrap_or_else(|| SystemClock.today());
    let progress = FulfillmentRanker::from_rules(&config.business).progress(&record, today);
    let leads_per_day = match (args.onboarding_date, args.target_date) {
        (Some(onboarding), Some(target)) => {
            calculate_leads_per_day(args.purchased, onboarding, target)
        }
        _ => None,
    };

    let message = format!(
        "{}% fulfilled, priority score {}",
        progress.completion_percent, progress.priority_score
    );

    CommandResult::success("order", message, OrderOutput { today, record, progress, leads_per_day })
}
