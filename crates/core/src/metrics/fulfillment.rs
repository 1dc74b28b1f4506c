//! Urgency ranking for lead orders.
//!
//! Score = completion deficit * weight + days remaining. Lower is more urgent.
//! The weight dwarfs any realistic day count so completion dominates and days
//! remaining only separates orders within the same completion bracket.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dates::{calculate_work_days, days_remaining, round2};
use super::targets::{completion_percentage, progress_width};
use crate::config::BusinessRules;
use crate::domain::fulfillment::FulfillmentRecord;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderProgress {
    pub completion_percent: i64,
    pub progress_width: f64,
    pub leads_remaining: u32,
    pub days_remaining: Option<i64>,
    pub priority_score: f64,
    pub is_complete: bool,
    pub is_overdue: bool,
    /// Leads per work day still needed to hit the deadline from today.
    pub leads_per_day_needed: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedOrder {
    /// Position of the record in the slice passed to [`FulfillmentRanker::rank`].
    pub index: usize,
    pub record: FulfillmentRecord,
    pub progress: OrderProgress,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FulfillmentRanker {
    completion_weight: f64,
    no_deadline_days: i64,
}

impl Default for FulfillmentRanker {
    fn default() -> Self {
        Self::from_rules(&BusinessRules::default())
    }
}

impl FulfillmentRanker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: &BusinessRules) -> Self {
        Self {
            completion_weight: rules.completion_weight,
            no_deadline_days: rules.no_deadline_days,
        }
    }

    pub fn priority_score(
        &self,
        fulfilled: u32,
        purchased: u32,
        target_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> f64 {
        let completion_rate =
            if purchased > 0 { f64::from(fulfilled) / f64::from(purchased) } else { 0.0 };
        let days =
            target_date.map_or(self.no_deadline_days, |target| days_remaining(target, today));

        (1.0 - completion_rate) * self.completion_weight + days as f64
    }

    pub fn progress(&self, record: &FulfillmentRecord, today: NaiveDate) -> OrderProgress {
        let completion_percent =
            completion_percentage(record.leads_fulfilled, record.leads_purchased);
        let days = record.target_date.map(|target| days_remaining(target, today));
        let is_complete = record.is_complete();
        let leads_remaining = record.leads_remaining();

        OrderProgress {
            completion_percent,
            progress_width: progress_width(completion_percent as f64),
            leads_remaining,
            days_remaining: days,
            priority_score: self.priority_score(
                record.leads_fulfilled,
                record.leads_purchased,
                record.target_date,
                today,
            ),
            is_complete,
            is_overdue: !is_complete && days.is_some_and(|days| days < 0),
            leads_per_day_needed: record
                .target_date
                .and_then(|target| leads_per_day_needed(leads_remaining, today, target)),
        }
    }

    /// Most urgent first. Orders with equal scores keep their input order.
    pub fn rank(&self, records: &[FulfillmentRecord], today: NaiveDate) -> Vec<RankedOrder> {
        let mut ranked: Vec<RankedOrder> = records
            .iter()
            .enumerate()
            .map(|(index, record)| RankedOrder {
                index,
                record: record.clone(),
                progress: self.progress(record, today),
            })
            .collect();

        ranked.sort_by(|left, right| {
            left.progress.priority_score.total_cmp(&right.progress.priority_score)
        });

        debug!(
            event_name = "metrics.fulfillment.ranked",
            order_count = ranked.len(),
            overdue_count = ranked.iter().filter(|order| order.progress.is_overdue).count(),
            today = %today,
            "fulfillment orders ranked"
        );

        ranked
    }
}

pub fn priority_score(
    fulfilled: u32,
    purchased: u32,
    target_date: Option<NaiveDate>,
    today: NaiveDate,
) -> f64 {
    FulfillmentRanker::new().priority_score(fulfilled, purchased, target_date, today)
}

/// Even daily delivery rate over the work days between onboarding and the
/// deadline. `None` means no daily target can be derived; it is not zero.
pub fn calculate_leads_per_day(
    purchased: u32,
    onboarding_date: NaiveDate,
    target_date: NaiveDate,
) -> Option<f64> {
    if purchased == 0 || onboarding_date >= target_date {
        return None;
    }

    let work_days = calculate_work_days(onboarding_date, target_date);
    if work_days == 0 {
        return None;
    }

    Some(round2(f64::from(purchased) / f64::from(work_days)))
}

/// Catch-up rate over the work days left in `[today, target]`, deadline day
/// included, so an order due today still needs everything outstanding.
fn leads_per_day_needed(remaining: u32, today: NaiveDate, target: NaiveDate) -> Option<f64> {
    if remaining == 0 || today > target {
        return None;
    }

    match calculate_work_days(today, target) {
        0 => None,
        work_days => Some(round2(f64::from(remaining) / f64::from(work_days))),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{calculate_leads_per_day, priority_score, FulfillmentRanker};
    use crate::config::BusinessRules;
    use crate::domain::fulfillment::FulfillmentRecord;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).expect("valid date")
    }

    // 2026-01-05 is a Monday.
    fn today() -> NaiveDate {
        date(1, 5)
    }

    #[test]
    fn half_complete_order_without_deadline_scores_1499() {
        assert_eq!(priority_score(50, 100, None, today()), 1499.0);
    }

    #[test]
    fn overdue_orders_score_lower_than_on_time_ones() {
        let overdue = priority_score(50, 100, Some(date(1, 1)), today());
        let due_later = priority_score(50, 100, Some(date(1, 15)), today());
        assert_eq!(overdue, 496.0);
        assert_eq!(due_later, 510.0);
        assert!(overdue < due_later);
    }

    #[test]
    fn completion_deficit_dominates_days_remaining() {
        let nearly_done_due_in_a_month = priority_score(90, 100, Some(date(2, 4)), today());
        let barely_started_due_tomorrow = priority_score(10, 100, Some(date(1, 6)), today());
        assert!(nearly_done_due_in_a_month < barely_started_due_tomorrow);
    }

    #[test]
    fn empty_order_counts_as_zero_complete() {
        assert_eq!(priority_score(0, 0, None, today()), 1999.0);
    }

    #[test]
    fn custom_rules_change_weight_and_sentinel() {
        let rules = BusinessRules {
            completion_weight: 100.0,
            no_deadline_days: 30,
            ..BusinessRules::default()
        };
        let ranker = FulfillmentRanker::from_rules(&rules);
        assert_eq!(ranker.priority_score(50, 100, None, today()), 80.0);
    }

    #[test]
    fn leads_per_day_rejects_degenerate_inputs() {
        assert_eq!(calculate_leads_per_day(100, today(), today()), None);
        assert_eq!(calculate_leads_per_day(0, today(), date(1, 9)), None);
        assert_eq!(calculate_leads_per_day(100, date(1, 9), today()), None);
        assert_eq!(calculate_leads_per_day(10, date(1, 10), date(1, 11)), None);
    }

    #[test]
    fn leads_per_day_spreads_over_work_days() {
        assert_eq!(calculate_leads_per_day(100, today(), date(1, 9)), Some(20.0));
        assert_eq!(calculate_leads_per_day(100, today(), date(1, 7)), Some(33.33));
    }

    #[test]
    fn progress_flags_overdue_and_complete_orders() {
        let ranker = FulfillmentRanker::new();

        let overdue = ranker.progress(&FulfillmentRecord::new(100, 40, Some(date(1, 2))), today());
        assert!(overdue.is_overdue);
        assert!(!overdue.is_complete);
        assert_eq!(overdue.days_remaining, Some(-3));
        assert_eq!(overdue.leads_remaining, 60);
        assert_eq!(overdue.leads_per_day_needed, None);

        let over_delivered =
            ranker.progress(&FulfillmentRecord::new(100, 150, Some(date(1, 2))), today());
        assert!(over_delivered.is_complete);
        assert!(!over_delivered.is_overdue);
        assert_eq!(over_delivered.completion_percent, 150);
        assert_eq!(over_delivered.progress_width, 100.0);

        let on_schedule =
            ranker.progress(&FulfillmentRecord::new(100, 0, Some(date(1, 9))), today());
        assert_eq!(on_schedule.leads_per_day_needed, Some(20.0));
        assert_eq!(on_schedule.priority_score, 1004.0);
    }

    #[test]
    fn order_due_today_needs_every_outstanding_lead_today() {
        let ranker = FulfillmentRanker::new();

        let due_today = ranker.progress(&FulfillmentRecord::new(100, 90, Some(today())), today());
        assert_eq!(due_today.days_remaining, Some(0));
        assert!(!due_today.is_overdue);
        assert_eq!(due_today.leads_per_day_needed, Some(10.0));

        let delivered = ranker.progress(&FulfillmentRecord::new(100, 100, Some(today())), today());
        assert_eq!(delivered.leads_per_day_needed, None);

        // Deadline on a Saturday with no work day left before it.
        let saturday = date(1, 10);
        let weekend = ranker.progress(&FulfillmentRecord::new(10, 0, Some(saturday)), saturday);
        assert_eq!(weekend.leads_per_day_needed, None);
    }

    #[test]
    fn rank_orders_most_urgent_first_and_is_stable() {
        let records = vec![
            FulfillmentRecord::new(100, 100, Some(date(1, 20))),
            FulfillmentRecord::new(100, 50, None),
            FulfillmentRecord::new(100, 20, Some(date(1, 15))),
            FulfillmentRecord::new(100, 50, None),
        ];

        let ranked = FulfillmentRanker::new().rank(&records, today());
        let order: Vec<usize> = ranked.iter().map(|order| order.index).collect();

        assert_eq!(order, vec![0, 2, 1, 3]);
        assert_eq!(ranked[0].progress.priority_score, 15.0);
    }
}
