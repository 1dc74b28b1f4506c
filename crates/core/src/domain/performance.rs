use serde::{Deserialize, Serialize};

/// Four-tier classification of an actual value against its target, plus a
/// sentinel for days where nothing was reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceStatus {
    Ahead,
    OnTrack,
    Behind,
    Critical,
    NoReport,
}

impl PerformanceStatus {
    /// Position in the total order `ahead > on_track > behind > critical`.
    /// `NoReport` is not a ratio and has no rank.
    pub fn rank(self) -> Option<u8> {
        match self {
            Self::Ahead => Some(3),
            Self::OnTrack => Some(2),
            Self::Behind => Some(1),
            Self::Critical => Some(0),
            Self::NoReport => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ahead => "ahead",
            Self::OnTrack => "on_track",
            Self::Behind => "behind",
            Self::Critical => "critical",
            Self::NoReport => "no_report",
        }
    }

    /// The lower-ranked of two statuses. `NoReport` only wins when both sides
    /// are `NoReport`.
    pub fn worst(self, other: Self) -> Self {
        match (self.rank(), other.rank()) {
            (Some(left), Some(right)) => {
                if right < left {
                    other
                } else {
                    self
                }
            }
            (Some(_), None) => self,
            (None, _) => other,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetComparison {
    pub actual: f64,
    pub target: f64,
    pub percent: i64,
    pub status: PerformanceStatus,
}

/// Per-rep daily goals. Supplied from configuration, never derived.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepTargets {
    pub daily_calls: f64,
    pub daily_hours: f64,
    pub daily_bookings: f64,
    pub daily_pipeline: f64,
}

impl Default for RepTargets {
    fn default() -> Self {
        Self { daily_calls: 100.0, daily_hours: 4.0, daily_bookings: 2.0, daily_pipeline: 5000.0 }
    }
}

impl RepTargets {
    /// Targets for a span of `work_days` days.
    pub fn scaled(&self, work_days: u32) -> Self {
        let factor = f64::from(work_days);
        Self {
            daily_calls: self.daily_calls * factor,
            daily_hours: self.daily_hours * factor,
            daily_bookings: self.daily_bookings * factor,
            daily_pipeline: self.daily_pipeline * factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PerformanceStatus, RepTargets};

    #[test]
    fn rank_orders_tiers_and_leaves_no_report_unranked() {
        assert!(PerformanceStatus::Ahead.rank() > PerformanceStatus::OnTrack.rank());
        assert!(PerformanceStatus::OnTrack.rank() > PerformanceStatus::Behind.rank());
        assert!(PerformanceStatus::Behind.rank() > PerformanceStatus::Critical.rank());
        assert_eq!(PerformanceStatus::NoReport.rank(), None);
    }

    #[test]
    fn worst_prefers_ranked_status_over_no_report() {
        assert_eq!(
            PerformanceStatus::Ahead.worst(PerformanceStatus::Behind),
            PerformanceStatus::Behind
        );
        assert_eq!(
            PerformanceStatus::NoReport.worst(PerformanceStatus::Critical),
            PerformanceStatus::Critical
        );
        assert_eq!(
            PerformanceStatus::OnTrack.worst(PerformanceStatus::NoReport),
            PerformanceStatus::OnTrack
        );
    }

    #[test]
    fn statuses_serialize_as_snake_case() {
        let value = serde_json::to_value(PerformanceStatus::OnTrack).expect("serialize status");
        assert_eq!(value, serde_json::json!("on_track"));
        assert_eq!(PerformanceStatus::NoReport.as_str(), "no_report");
    }

    #[test]
    fn scaled_targets_multiply_every_goal() {
        let week = RepTargets::default().scaled(5);
        assert_eq!(week.daily_calls, 500.0);
        assert_eq!(week.daily_hours, 20.0);
        assert_eq!(week.daily_bookings, 10.0);
        assert_eq!(week.daily_pipeline, 25_000.0);
    }
}
