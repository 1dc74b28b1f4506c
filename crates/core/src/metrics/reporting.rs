//! Daily and period performance of a sales rep against their targets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dates::calculate_work_days;
use super::targets::TargetEvaluator;
use crate::domain::performance::{PerformanceStatus, RepTargets, TargetComparison};

/// Raw counters a rep submits at the end of a working day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub calls_made: u32,
    pub dialer_minutes: u32,
    pub bookings_made: u32,
    pub pipeline_value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricComparisons {
    pub calls: TargetComparison,
    pub hours: TargetComparison,
    pub bookings: TargetComparison,
    pub pipeline: TargetComparison,
}

impl MetricComparisons {
    /// Lowest tier across the four metrics.
    pub fn overall(&self) -> PerformanceStatus {
        self.calls
            .status
            .worst(self.hours.status)
            .worst(self.bookings.status)
            .worst(self.pipeline.status)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyPerformance {
    pub metrics: Option<MetricComparisons>,
    pub overall: PerformanceStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodPerformance {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub work_days: u32,
    pub reports_submitted: usize,
    pub metrics: MetricComparisons,
    pub overall: PerformanceStatus,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Totals {
    calls: f64,
    minutes: f64,
    bookings: f64,
    pipeline: f64,
}

impl Totals {
    fn add(&mut self, report: &DailyReport) {
        self.calls += f64::from(report.calls_made);
        self.minutes += f64::from(report.dialer_minutes);
        self.bookings += f64::from(report.bookings_made);
        self.pipeline += report.pipeline_value;
    }

    fn compare(&self, evaluator: &TargetEvaluator, targets: &RepTargets) -> MetricComparisons {
        MetricComparisons {
            calls: evaluator.compare(self.calls, targets.daily_calls),
            hours: evaluator.compare(self.minutes / 60.0, targets.daily_hours),
            bookings: evaluator.compare(self.bookings, targets.daily_bookings),
            pipeline: evaluator.compare(self.pipeline, targets.daily_pipeline),
        }
    }
}

/// A missing report yields `NoReport` rather than four critical metrics.
pub fn evaluate_daily_report(
    evaluator: &TargetEvaluator,
    report: Option<&DailyReport>,
    targets: &RepTargets,
) -> DailyPerformance {
    let Some(report) = report else {
        return DailyPerformance { metrics: None, overall: PerformanceStatus::NoReport };
    };

    let mut totals = Totals::default();
    totals.add(report);
    let metrics = totals.compare(evaluator, targets);
    let overall = metrics.overall();

    debug!(
        event_name = "metrics.report.evaluated",
        report_date = %report.date,
        overall = overall.as_str(),
        "daily report evaluated"
    );

    DailyPerformance { metrics: Some(metrics), overall }
}

/// Sums the reports dated within `[start, end]` and compares them with the
/// daily targets scaled by the number of work days in the window.
pub fn evaluate_period(
    evaluator: &TargetEvaluator,
    reports: &[DailyReport],
    targets: &RepTargets,
    start: NaiveDate,
    end: NaiveDate,
) -> PeriodPerformance {
    let work_days = calculate_work_days(start, end);

    let mut totals = Totals::default();
    let mut reports_submitted = 0;
    for report in reports.iter().filter(|report| report.date >= start && report.date <= end) {
        totals.add(report);
        reports_submitted += 1;
    }

    let metrics = totals.compare(evaluator, &targets.scaled(work_days));
    let overall =
        if reports_submitted == 0 { PerformanceStatus::NoReport } else { metrics.overall() };

    debug!(
        event_name = "metrics.report.evaluated",
        period_start = %start,
        period_end = %end,
        work_days,
        reports_submitted,
        overall = overall.as_str(),
        "period performance evaluated"
    );

    PeriodPerformance { start, end, work_days, reports_submitted, metrics, overall }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{evaluate_daily_report, evaluate_period, DailyReport};
    use crate::domain::performance::{PerformanceStatus, RepTargets};
    use crate::metrics::targets::TargetEvaluator;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).expect("valid date")
    }

    fn report(day: u32, calls: u32, minutes: u32, bookings: u32, pipeline: f64) -> DailyReport {
        DailyReport {
            date: date(day),
            calls_made: calls,
            dialer_minutes: minutes,
            bookings_made: bookings,
            pipeline_value: pipeline,
        }
    }

    #[test]
    fn missing_report_is_flagged_as_no_report() {
        let performance =
            evaluate_daily_report(&TargetEvaluator::new(), None, &RepTargets::default());
        assert_eq!(performance.overall, PerformanceStatus::NoReport);
        assert!(performance.metrics.is_none());
    }

    #[test]
    fn daily_report_compares_each_metric() {
        let day = report(5, 110, 210, 1, 4_500.0);
        let performance =
            evaluate_daily_report(&TargetEvaluator::new(), Some(&day), &RepTargets::default());

        let metrics = performance.metrics.expect("metrics for submitted report");
        assert_eq!(metrics.calls.status, PerformanceStatus::Ahead);
        assert_eq!(metrics.calls.percent, 110);
        assert_eq!(metrics.hours.actual, 3.5);
        assert_eq!(metrics.hours.percent, 88);
        assert_eq!(metrics.hours.status, PerformanceStatus::OnTrack);
        assert_eq!(metrics.bookings.status, PerformanceStatus::Behind);
        assert_eq!(metrics.pipeline.status, PerformanceStatus::OnTrack);
        assert_eq!(performance.overall, PerformanceStatus::Behind);
    }

    #[test]
    fn zero_targets_do_not_drag_overall_down() {
        let targets = RepTargets {
            daily_calls: 50.0,
            daily_hours: 0.0,
            daily_bookings: 0.0,
            daily_pipeline: 0.0,
        };
        let day = report(5, 60, 0, 0, 0.0);
        let performance = evaluate_daily_report(&TargetEvaluator::new(), Some(&day), &targets);
        assert_eq!(performance.overall, PerformanceStatus::OnTrack);
    }

    #[test]
    fn period_scales_targets_by_work_days_and_ignores_outside_reports() {
        let reports = vec![
            report(2, 500, 600, 10, 9_000.0),
            report(5, 100, 240, 2, 5_000.0),
            report(6, 100, 240, 2, 5_000.0),
            report(7, 40, 60, 0, 0.0),
            report(12, 500, 600, 10, 9_000.0),
        ];

        let period = evaluate_period(
            &TargetEvaluator::new(),
            &reports,
            &RepTargets::default(),
            date(5),
            date(11),
        );

        assert_eq!(period.work_days, 5);
        assert_eq!(period.reports_submitted, 3);
        assert_eq!(period.metrics.calls.actual, 240.0);
        assert_eq!(period.metrics.calls.target, 500.0);
        assert_eq!(period.metrics.calls.percent, 48);
        assert_eq!(period.metrics.calls.status, PerformanceStatus::Critical);
        assert_eq!(period.overall, PerformanceStatus::Critical);
    }

    #[test]
    fn empty_window_has_no_work_days_and_no_report() {
        let period = evaluate_period(
            &TargetEvaluator::new(),
            &[report(5, 100, 240, 2, 5_000.0)],
            &RepTargets::default(),
            date(9),
            date(5),
        );

        assert_eq!(period.work_days, 0);
        assert_eq!(period.reports_submitted, 0);
        assert_eq!(period.metrics.calls.percent, 0);
        assert_eq!(period.metrics.calls.status, PerformanceStatus::OnTrack);
        assert_eq!(period.overall, PerformanceStatus::NoReport);
    }
}
