pub mod deal;
pub mod fulfillment;
pub mod performance;
