use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Snapshot of an order's lead delivery progress.
///
/// `leads_fulfilled` may exceed `leads_purchased`; use [`FulfillmentRecord::validated`]
/// where that must be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentRecord {
    pub leads_purchased: u32,
    pub leads_fulfilled: u32,
    pub target_date: Option<NaiveDate>,
}

impl FulfillmentRecord {
    pub fn new(leads_purchased: u32, leads_fulfilled: u32, target_date: Option<NaiveDate>) -> Self {
        Self { leads_purchased, leads_fulfilled, target_date }
    }

    pub fn validated(
        leads_purchased: u32,
        leads_fulfilled: u32,
        target_date: Option<NaiveDate>,
    ) -> Result<Self, DomainError> {
        if leads_fulfilled > leads_purchased {
            return Err(DomainError::OverFulfilled {
                fulfilled: leads_fulfilled,
                purchased: leads_purchased,
            });
        }

        Ok(Self::new(leads_purchased, leads_fulfilled, target_date))
    }

    pub fn leads_remaining(&self) -> u32 {
        self.leads_purchased.saturating_sub(self.leads_fulfilled)
    }

    pub fn is_complete(&self) -> bool {
        self.leads_purchased > 0 && self.leads_fulfilled >= self.leads_purchased
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::FulfillmentRecord;
    use crate::errors::DomainError;

    #[test]
    fn plain_constructor_accepts_over_fulfillment() {
        let record = FulfillmentRecord::new(100, 150, None);
        assert_eq!(record.leads_remaining(), 0);
        assert!(record.is_complete());
    }

    #[test]
    fn validated_constructor_rejects_over_fulfillment() {
        let error = FulfillmentRecord::validated(100, 101, None).expect_err("101 > 100");
        assert_eq!(error, DomainError::OverFulfilled { fulfilled: 101, purchased: 100 });
    }

    #[test]
    fn validated_constructor_keeps_deadline() {
        let deadline = NaiveDate::from_ymd_opt(2026, 3, 31).expect("valid date");
        let record = FulfillmentRecord::validated(40, 10, Some(deadline)).expect("valid record");
        assert_eq!(record.target_date, Some(deadline));
        assert_eq!(record.leads_remaining(), 30);
        assert!(!record.is_complete());
    }

    #[test]
    fn empty_order_is_never_complete() {
        assert!(!FulfillmentRecord::new(0, 0, None).is_complete());
    }
}
