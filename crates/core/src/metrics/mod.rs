//! Pure performance and fulfillment metrics.
//!
//! Nothing here performs I/O or reads the clock; callers pass `today`.

pub mod dates;
pub mod financials;
pub mod fulfillment;
pub mod reporting;
pub mod targets;

pub use dates::{
    calculate_work_days, days_remaining, format_date_for_input, format_minutes,
    hours_minutes_to_minutes, minutes_to_hours_minutes, HoursMinutes,
};
pub use financials::{compute_deal_financials, DealCalculator};
pub use fulfillment::{
    calculate_leads_per_day, priority_score, FulfillmentRanker, OrderProgress, RankedOrder,
};
pub use reporting::{
    evaluate_daily_report, evaluate_period, DailyPerformance, DailyReport, MetricComparisons,
    PeriodPerformance,
};
pub use targets::{
    calculate_target_comparison, completion_percentage, performance_status, progress_width,
    PerformanceThresholds, TargetEvaluator,
};
