/// Watch-mode scheduler
/// Re-checks the catalog at every interval boundary of the local wall clock
/// (every minute on the minute by default) until cancelled.

use chrono::{Local, Timelike};
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Calculate duration until the next interval boundary
pub fn time_until_next_tick(interval_secs: u64) -> Duration {
    let now = Local::now();
    time_until_next_tick_at(now.num_seconds_from_midnight(), interval_secs)
}

/// Testable version: boundaries are multiples of the interval counted from
/// midnight. Exactly on a boundary waits a full interval.
pub fn time_until_next_tick_at(seconds_from_midnight: u32, interval_secs: u64) -> Duration {
    let interval = interval_secs.max(1);
    let elapsed = seconds_from_midnight as u64 % interval;
    Duration::from_secs(interval - elapsed)
}

/// Format duration for logging
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let rest = secs % 60;

    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else if mins > 0 {
        format!("{}m {}s", mins, rest)
    } else {
        format!("{}s", rest)
    }
}

/// Remembers the last reported open set so watch mode only prints changes
#[derive(Debug, Default)]
pub struct OpenSetTracker {
    last: Option<Vec<String>>,
}

impl OpenSetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `names` differs from the previous observation
    /// (always true the first time).
    pub fn observe(&mut self, names: &[String]) -> bool {
        if self.last.as_deref() == Some(names) {
            return false;
        }
        self.last = Some(names.to_vec());
        true
    }
}

/// Run `check_fn` now, then at every interval boundary until `cancel` fires.
pub async fn run_scheduler<F>(interval_secs: u64, cancel: CancellationToken, mut check_fn: F)
where
    F: FnMut(),
{
    info!("Watch started (every {})", format_duration(Duration::from_secs(interval_secs.max(1))));

    loop {
        check_fn();

        let wait = time_until_next_tick(interval_secs);
        debug!("Next check in {}", format_duration(wait));

        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Watch stopped");
                return;
            }
            _ = sleep(wait) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === format_duration tests ===

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h 0m");
        assert_eq!(format_duration(Duration::from_secs(3660)), "1h 1m");
        assert_eq!(format_duration(Duration::from_secs(1800)), "30m 0s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
    }

    #[test]
    fn test_format_duration_edge_cases() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0s");
        assert_eq!(format_duration(Duration::from_secs(59)), "59s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m 0s");
        assert_eq!(format_duration(Duration::from_secs(7200)), "2h 0m");
    }

    // === time_until_next_tick_at tests ===

    #[test]
    fn test_next_tick_every_minute() {
        // 10:15:20 -> 40s until 10:16:00
        assert_eq!(time_until_next_tick_at(10 * 3600 + 15 * 60 + 20, 60), Duration::from_secs(40));
        // 23:59:59 -> 1s until midnight
        assert_eq!(time_until_next_tick_at(86_399, 60), Duration::from_secs(1));
    }

    #[test]
    fn test_next_tick_on_boundary_waits_full_interval() {
        assert_eq!(time_until_next_tick_at(0, 60), Duration::from_secs(60));
        assert_eq!(time_until_next_tick_at(12 * 3600, 900), Duration::from_secs(900));
    }

    #[test]
    fn test_next_tick_zero_interval_treated_as_one_second() {
        assert_eq!(time_until_next_tick_at(1234, 0), Duration::from_secs(1));
    }

    #[test]
    fn test_time_until_next_tick_reasonable() {
        let wait = time_until_next_tick(60);
        assert!(wait.as_secs() >= 1 && wait.as_secs() <= 60);
    }

    // === OpenSetTracker tests ===

    #[test]
    fn test_tracker_reports_first_and_changes_only() {
        let mut tracker = OpenSetTracker::new();
        let lunch = vec!["Cafe".to_string()];
        let dinner = vec!["Bistro".to_string(), "Cafe".to_string()];

        assert!(tracker.observe(&lunch));
        assert!(!tracker.observe(&lunch));
        assert!(tracker.observe(&dinner));
        assert!(tracker.observe(&[]));
        assert!(!tracker.observe(&[]));
    }

    #[tokio::test]
    async fn test_run_scheduler_stops_when_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut calls = 0;
        run_scheduler(60, cancel, || calls += 1).await;
        assert_eq!(calls, 1);
    }
}


/// Kani formal verification proofs
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    #[kani::proof]
    fn tick_wait_bounded() {
        let seconds: u32 = kani::any();
        kani::assume(seconds < 86_400);
        let interval: u64 = kani::any();
        kani::assume(interval >= 1 && interval <= 3600);

        let wait = time_until_next_tick_at(seconds, interval).as_secs();
        kani::assert(wait >= 1 && wait <= interval, "wait must be within one interval");
    }
}
