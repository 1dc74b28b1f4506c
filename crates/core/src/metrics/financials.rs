use rust_decimal::Decimal;
use tracing::debug;

use crate::config::BusinessRules;
use crate::domain::deal::{DealFinancials, DealInputs, DealUpdate};
use crate::errors::DomainError;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Splits a deal's gross revenue into net revenue and cost lines.
#[derive(Clone, Debug, PartialEq)]
pub struct DealCalculator {
    vat_rate: Decimal,
    operating_expense_rate: Decimal,
    lead_fulfillment_unit_cost: Decimal,
}

impl Default for DealCalculator {
    fn default() -> Self {
        Self::from_rules(&BusinessRules::default())
    }
}

impl DealCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: &BusinessRules) -> Self {
        Self {
            vat_rate: rules.vat_rate,
            operating_expense_rate: rules.operating_expense_rate,
            lead_fulfillment_unit_cost: rules.lead_fulfillment_unit_cost,
        }
    }

    /// Inputs are assumed validated; see [`DealInputs::validate`].
    pub fn financials(
        &self,
        revenue_inc_vat: Decimal,
        leads_sold: u32,
        setter_pct: Decimal,
        rep_pct: Decimal,
    ) -> DealFinancials {
        let revenue_net = revenue_inc_vat / (Decimal::ONE + self.vat_rate);

        DealFinancials {
            revenue_inc_vat,
            revenue_net,
            operating_expense: revenue_net * self.operating_expense_rate,
            setter_cost: revenue_net * setter_pct / HUNDRED,
            sales_rep_cost: revenue_net * rep_pct / HUNDRED,
            lead_fulfillment_cost: Decimal::from(leads_sold) * self.lead_fulfillment_unit_cost,
        }
    }

    pub fn compute(&self, inputs: &DealInputs) -> DealFinancials {
        self.financials(
            inputs.revenue_inc_vat,
            inputs.leads_sold,
            inputs.setter_pct,
            inputs.rep_pct,
        )
    }

    /// Same lines as [`DealCalculator::compute`], but amounts that exceed the
    /// `Decimal` range come back as an input error instead of panicking.
    pub fn checked_compute(&self, inputs: &DealInputs) -> Result<DealFinancials, DomainError> {
        let revenue_net = inputs
            .revenue_inc_vat
            .checked_div(Decimal::ONE + self.vat_rate)
            .ok_or_else(|| out_of_range("revenue_inc_vat"))?;
        let operating_expense = revenue_net
            .checked_mul(self.operating_expense_rate)
            .ok_or_else(|| out_of_range("revenue_inc_vat"))?;
        let commission = |pct: Decimal, field: &str| {
            revenue_net
                .checked_mul(pct)
                .and_then(|amount| amount.checked_div(HUNDRED))
                .ok_or_else(|| out_of_range(field))
        };
        let setter_cost = commission(inputs.setter_pct, "setter_pct")?;
        let sales_rep_cost = commission(inputs.rep_pct, "rep_pct")?;
        let lead_fulfillment_cost = Decimal::from(inputs.leads_sold)
            .checked_mul(self.lead_fulfillment_unit_cost)
            .ok_or_else(|| out_of_range("leads_sold"))?;

        // total_costs() and net_profit() must stay representable too.
        operating_expense
            .checked_add(setter_cost)
            .and_then(|sum| sum.checked_add(sales_rep_cost))
            .and_then(|sum| sum.checked_add(lead_fulfillment_cost))
            .ok_or_else(|| out_of_range("revenue_inc_vat"))?;

        Ok(DealFinancials {
            revenue_inc_vat: inputs.revenue_inc_vat,
            revenue_net,
            operating_expense,
            setter_cost,
            sales_rep_cost,
            lead_fulfillment_cost,
        })
    }

    /// Validates and computes a new deal.
    pub fn create(&self, inputs: &DealInputs) -> Result<DealFinancials, DomainError> {
        inputs.validate()?;
        self.checked_compute(inputs)
    }

    /// Applies `update` on top of `existing` and derives every field again
    /// from the merged inputs. Derived values are never patched in place.
    pub fn recompute(
        &self,
        existing: &DealInputs,
        update: &DealUpdate,
    ) -> Result<(DealInputs, DealFinancials), DomainError> {
        let merged = existing.merged(update);
        merged.validate()?;
        let financials = self.checked_compute(&merged)?;

        debug!(
            event_name = "metrics.deal.recomputed",
            update_empty = update.is_empty(),
            revenue_net = %financials.revenue_net,
            "deal financials recomputed"
        );

        Ok((merged, financials))
    }
}

fn out_of_range(field: &str) -> DomainError {
    DomainError::InvalidDealInput {
        field: field.to_owned(),
        reason: "amount is too large to compute".to_owned(),
    }
}

pub fn compute_deal_financials(
    revenue_inc_vat: Decimal,
    leads_sold: u32,
    setter_pct: Decimal,
    rep_pct: Decimal,
) -> DealFinancials {
    DealCalculator::new().financials(revenue_inc_vat, leads_sold, setter_pct, rep_pct)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{compute_deal_financials, DealCalculator};
    use crate::config::BusinessRules;
    use crate::domain::deal::{DealInputs, DealUpdate};
    use crate::errors::DomainError;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn inputs() -> DealInputs {
        DealInputs {
            revenue_inc_vat: dec(1200),
            leads_sold: 10,
            lead_sale_price: dec(120),
            setter_pct: dec(10),
            rep_pct: dec(5),
        }
    }

    #[test]
    fn decomposes_gross_revenue_into_cost_lines() {
        let financials = compute_deal_financials(dec(1200), 10, dec(10), dec(5));

        assert_eq!(financials.revenue_inc_vat, dec(1200));
        assert_eq!(financials.revenue_net, dec(1000));
        assert_eq!(financials.operating_expense, dec(200));
        assert_eq!(financials.setter_cost, dec(100));
        assert_eq!(financials.sales_rep_cost, dec(50));
        assert_eq!(financials.lead_fulfillment_cost, dec(200));
        assert_eq!(financials.net_profit(), dec(450));
    }

    #[test]
    fn jurisdiction_rules_override_vat_and_unit_cost() {
        let rules = BusinessRules {
            vat_rate: Decimal::new(25, 2),
            operating_expense_rate: Decimal::new(10, 2),
            lead_fulfillment_unit_cost: dec(15),
            ..BusinessRules::default()
        };
        let financials =
            DealCalculator::from_rules(&rules).financials(dec(1250), 4, dec(0), dec(20));

        assert_eq!(financials.revenue_net, dec(1000));
        assert_eq!(financials.operating_expense, dec(100));
        assert_eq!(financials.setter_cost, dec(0));
        assert_eq!(financials.sales_rep_cost, dec(200));
        assert_eq!(financials.lead_fulfillment_cost, dec(60));
    }

    #[test]
    fn create_rejects_invalid_inputs_before_computing() {
        let mut deal = inputs();
        deal.leads_sold = 0;

        let error = DealCalculator::new().create(&deal).expect_err("zero leads sold");
        assert!(matches!(
            error,
            DomainError::InvalidDealInput { ref field, .. } if field == "leads_sold"
        ));
    }

    #[test]
    fn recompute_derives_every_field_from_merged_inputs() {
        let calculator = DealCalculator::new();
        let update = DealUpdate { revenue_inc_vat: Some(dec(2400)), ..DealUpdate::default() };

        let (merged, financials) =
            calculator.recompute(&inputs(), &update).expect("valid update");

        assert_eq!(merged.revenue_inc_vat, dec(2400));
        assert_eq!(merged.setter_pct, dec(10));
        assert_eq!(financials, calculator.compute(&merged));
        assert_eq!(financials.revenue_net, dec(2000));
        assert_eq!(financials.operating_expense, dec(400));
        assert_eq!(financials.setter_cost, dec(200));
        assert_eq!(financials.sales_rep_cost, dec(100));
        assert_eq!(financials.lead_fulfillment_cost, dec(200));
    }

    #[test]
    fn recompute_rejects_update_that_breaks_validation() {
        let update = DealUpdate { revenue_inc_vat: Some(Decimal::ZERO), ..DealUpdate::default() };
        assert!(DealCalculator::new().recompute(&inputs(), &update).is_err());
    }

    #[test]
    fn oversized_amounts_are_rejected_instead_of_overflowing() {
        let mut deal = inputs();
        deal.revenue_inc_vat = Decimal::from_i128_with_scale(10_i128.pow(28), 0);
        deal.setter_pct = dec(100);

        let error = DealCalculator::new().create(&deal).expect_err("commission overflows");
        assert!(matches!(
            error,
            DomainError::InvalidDealInput { ref field, .. } if field == "setter_pct"
        ));

        let update = DealUpdate { revenue_inc_vat: Some(Decimal::MAX), ..DealUpdate::default() };
        assert!(DealCalculator::new().recompute(&inputs(), &update).is_err());
    }

    #[test]
    fn checked_compute_matches_compute_for_ordinary_deals() {
        let calculator = DealCalculator::new();
        assert_eq!(calculator.checked_compute(&inputs()), Ok(calculator.compute(&inputs())));
    }

    #[test]
    fn net_revenue_keeps_full_precision_for_uneven_amounts() {
        let financials = compute_deal_financials(dec(1000), 1, dec(0), dec(0));
        assert_eq!(financials.rounded(2).revenue_net, Decimal::new(83_333, 2));
        assert!(financials.revenue_net > Decimal::new(83_333, 2));
    }
}
