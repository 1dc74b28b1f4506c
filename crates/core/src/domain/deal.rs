use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealInputs {
    pub revenue_inc_vat: Decimal,
    pub leads_sold: u32,
    pub lead_sale_price: Decimal,
    pub setter_pct: Decimal,
    pub rep_pct: Decimal,
}

/// Partial edit of a deal. `None` keeps the existing value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealUpdate {
    pub revenue_inc_vat: Option<Decimal>,
    pub leads_sold: Option<u32>,
    pub lead_sale_price: Option<Decimal>,
    pub setter_pct: Option<Decimal>,
    pub rep_pct: Option<Decimal>,
}

impl DealUpdate {
    pub fn is_empty(&self) -> bool {
        self.revenue_inc_vat.is_none()
            && self.leads_sold.is_none()
            && self.lead_sale_price.is_none()
            && self.setter_pct.is_none()
            && self.rep_pct.is_none()
    }
}

impl DealInputs {
    pub fn merged(&self, update: &DealUpdate) -> Self {
        Self {
            revenue_inc_vat: update.revenue_inc_vat.unwrap_or(self.revenue_inc_vat),
            leads_sold: update.leads_sold.unwrap_or(self.leads_sold),
            lead_sale_price: update.lead_sale_price.unwrap_or(self.lead_sale_price),
            setter_pct: update.setter_pct.unwrap_or(self.setter_pct),
            rep_pct: update.rep_pct.unwrap_or(self.rep_pct),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.revenue_inc_vat <= Decimal::ZERO {
            return Err(invalid("revenue_inc_vat", "must be greater than zero"));
        }
        if self.leads_sold == 0 {
            return Err(invalid("leads_sold", "must be greater than zero"));
        }
        if self.lead_sale_price <= Decimal::ZERO {
            return Err(invalid("lead_sale_price", "must be greater than zero"));
        }
        if self.setter_pct < Decimal::ZERO {
            return Err(invalid("setter_pct", "must not be negative"));
        }
        if self.rep_pct < Decimal::ZERO {
            return Err(invalid("rep_pct", "must not be negative"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> DomainError {
    DomainError::InvalidDealInput { field: field.to_string(), reason: reason.to_string() }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealFinancials {
    pub revenue_inc_vat: Decimal,
    pub revenue_net: Decimal,
    pub operating_expense: Decimal,
    pub setter_cost: Decimal,
    pub sales_rep_cost: Decimal,
    pub lead_fulfillment_cost: Decimal,
}

impl DealFinancials {
    pub fn total_costs(&self) -> Decimal {
        self.operating_expense + self.setter_cost + self.sales_rep_cost + self.lead_fulfillment_cost
    }

    /// Net revenue left after every cost line. Negative for loss-making deals.
    pub fn net_profit(&self) -> Decimal {
        self.revenue_net - self.total_costs()
    }

    /// Presentation copy rounded to `dp` places, midpoint away from zero.
    pub fn rounded(&self, dp: u32) -> Self {
        let strategy = RoundingStrategy::MidpointAwayFromZero;
        let round = |value: Decimal| value.round_dp_with_strategy(dp, strategy);
        Self {
            revenue_inc_vat: round(self.revenue_inc_vat),
            revenue_net: round(self.revenue_net),
            operating_expense: round(self.operating_expense),
            setter_cost: round(self.setter_cost),
            sales_rep_cost: round(self.sales_rep_cost),
            lead_fulfillment_cost: round(self.lead_fulfillment_cost),
        }
    }
}
