use clap::Args;
use leadportal_core::metrics::TargetEvaluator;

use crate::commands::{load_config, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct StatusArgs {
    #[arg(long, help = "Value achieved so far")]
    pub actual: f64,
    #[arg(long, help = "Goal for the same period; 0 means no target set")]
    pub target: f64,
}

pub fn run(args: StatusArgs) -> CommandResult {
    let config = match load_config("status") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let evaluator = TargetEvaluator::with_thresholds(config.business.thresholds);
    let comparison = evaluator.compare(args.actual, args.target);
    let message = format!("{}% of target ({})", comparison.percent, comparison.status.as_str());

    CommandResult::success("status", message, comparison)
}
