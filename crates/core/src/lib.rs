pub mod clock;
pub mod config;
pub mod domain;
pub mod errors;
pub mod metrics;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, BusinessRules};
pub use domain::deal::{DealFinancials, DealInputs, DealUpdate};
pub use domain::fulfillment::FulfillmentRecord;
pub use domain::performance::{PerformanceStatus, RepTargets, TargetComparison};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use metrics::{
    DealCalculator, FulfillmentRanker, OrderProgress, PerformanceThresholds, RankedOrder,
    TargetEvaluator,
};
