use serde::{Deserialize, Serialize};

use super::dates::round_half_up;
use crate::domain::performance::{PerformanceStatus, TargetComparison};

/// Lower bounds (inclusive, in percent of target) for each status tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceThresholds {
    pub ahead_pct: f64,
    pub on_track_pct: f64,
    pub behind_pct: f64,
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        DEFAULT_THRESHOLDS
    }
}

pub const DEFAULT_THRESHOLDS: PerformanceThresholds =
    PerformanceThresholds { ahead_pct: 100.0, on_track_pct: 80.0, behind_pct: 50.0 };

/// Classifies actual-versus-target pairs against a set of thresholds.
#[derive(Clone, Debug, Default)]
pub struct TargetEvaluator {
    thresholds: PerformanceThresholds,
}

impl TargetEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: PerformanceThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> PerformanceThresholds {
        self.thresholds
    }

    /// A zero target means nothing was asked of the rep, so it is never a miss.
    pub fn status(&self, actual: f64, target: f64) -> PerformanceStatus {
        if target == 0.0 {
            return PerformanceStatus::OnTrack;
        }

        let percent = actual / target * 100.0;
        if percent >= self.thresholds.ahead_pct {
            PerformanceStatus::Ahead
        } else if percent >= self.thresholds.on_track_pct {
            PerformanceStatus::OnTrack
        } else if percent >= self.thresholds.behind_pct {
            PerformanceStatus::Behind
        } else {
            PerformanceStatus::Critical
        }
    }

    /// `percent` is 0 for a zero target even though the status is `OnTrack`.
    /// The two are intentionally not unified.
    pub fn compare(&self, actual: f64, target: f64) -> TargetComparison {
        let percent = if target > 0.0 { round_half_up(actual / target * 100.0) as i64 } else { 0 };

        TargetComparison { actual, target, percent, status: self.status(actual, target) }
    }
}

pub fn performance_status(actual: f64, target: f64) -> PerformanceStatus {
    TargetEvaluator::new().status(actual, target)
}

pub fn calculate_target_comparison(actual: f64, target: f64) -> TargetComparison {
    TargetEvaluator::new().compare(actual, target)
}

/// Unclamped: over-delivery reports more than 100.
pub fn completion_percentage(fulfilled: u32, purchased: u32) -> i64 {
    if purchased == 0 {
        return 0;
    }

    round_half_up(f64::from(fulfilled) / f64::from(purchased) * 100.0) as i64
}

/// Bar width for rendering, clamped to `[0, 100]`.
pub fn progress_width(percent: f64) -> f64 {
    percent.clamp(0.0, 100.0)
}
