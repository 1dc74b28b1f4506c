use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use leadportal_core::clock::{Clock, SystemClock};
use leadportal_core::domain::fulfillment::FulfillmentRecord;
use leadportal_core::metrics::FulfillmentRanker;

use crate::commands::{load_config, CommandResult, EXIT_INPUT};

#[derive(Debug, Clone, Args)]
pub struct RankArgs {
    #[arg(long, help = "JSON file holding an array of fulfillment records")]
    pub orders: PathBuf,
    #[arg(long, help = "Rank as of this date instead of the current UTC date")]
    pub today: Option<NaiveDate>,
}

pub fn run(args: RankArgs) -> CommandResult {
    let config = match load_config("rank") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let records = match read_records(&args.orders) {
        Ok(records) => records,
        Err(error) => {
            return CommandResult::failure(
                "rank",
                "input_validation",
                format!("{error:#}"),
                EXIT_INPUT,
            );
        }
    };

    let today = args.today.unwrap_or_else(|| SystemClock.today());
    let ranked = FulfillmentRanker::from_rules(&config.business).rank(&records, today);
    let message = format!("ranked {} orders", ranked.len());

    CommandResult::success("rank", message, ranked)
}

fn read_records(path: &Path) -> anyhow::Result<Vec<FulfillmentRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read orders file `{}`", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("could not parse orders file `{}`", path.display()))
}
