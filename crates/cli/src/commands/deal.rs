use clap::Args;
use leadportal_core::domain::deal::{DealFinancials, DealInputs};
use leadportal_core::errors::{ApplicationError, InterfaceError};
use leadportal_core::metrics::DealCalculator;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::commands::{load_config, CommandResult, EXIT_INPUT};

#[derive(Debug, Clone, Args)]
pub struct DealArgs {
    #[arg(long, help = "Gross deal revenue including VAT")]
    pub revenue_inc_vat: Decimal,
    #[arg(long, help = "Number of leads sold in the deal")]
    pub leads_sold: u32,
    #[arg(long, help = "Price charged per lead")]
    pub lead_sale_price: Decimal,
    #[arg(
        long,
        default_value_t = Decimal::ZERO,
        help = "Setter commission, percent of net revenue"
    )]
    pub setter_pct: Decimal,
    #[arg(
        long,
        default_value_t = Decimal::ZERO,
        help = "Sales rep commission, percent of net revenue"
    )]
    pub rep_pct: Decimal,
}

#[derive(Debug, Serialize)]
struct DealOutput {
    inputs: DealInputs,
    financials: DealFinancials,
    total_costs: Decimal,
    net_profit: Decimal,
}

pub fn run(args: DealArgs) -> CommandResult {
    let config = match load_config("deal") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let inputs = DealInputs {
        revenue_inc_vat: args.revenue_inc_vat,
        leads_sold: args.leads_sold,
        lead_sale_price: args.lead_sale_price,
        setter_pct: args.setter_pct,
        rep_pct: args.rep_pct,
    };

    let exact = match DealCalculator::from_rules(&config.business).create(&inputs) {
        Ok(financials) => financials,
        Err(error) => {
            let interface = InterfaceError::from(ApplicationError::from(error));
            return CommandResult::failure(
                "deal",
                "input_validation",
                interface.to_string(),
                EXIT_INPUT,
            );
        }
    };

    // Totals are rounded from the exact lines, not summed from rounded ones.
    let output = DealOutput {
        total_costs: round_money(exact.total_costs()),
        net_profit: round_money(exact.net_profit()),
        financials: exact.rounded(2),
        inputs,
    };
    let message = format!("net revenue {}", output.financials.revenue_net);

    CommandResult::success("deal", message, output)
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
