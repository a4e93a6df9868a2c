//! Request frequency tracking.
//!
//! Every request appends a timestamp for its title. A title that was
//! requested at least `threshold` times inside the trailing `window` is
//! considered stale and its cached streams are evicted.

mod sqlite;
mod store;

pub use sqlite::SqliteRequestLog;
pub use store::{RequestLog, RequestLogError};

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Default sliding window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(3600);

/// Default request count that triggers eviction.
pub const DEFAULT_THRESHOLD: u32 = 5;

/// Eviction gate parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyPolicy {
    pub window: Duration,
    pub threshold: u32,
}

impl Default for FrequencyPolicy {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Records requests per title and answers whether a title should be evicted.
///
/// Holds no memory of previous evictions: once the log is purged the count
/// starts from zero again.
pub struct FrequencyTracker {
    log: Arc<dyn RequestLog>,
    policy: FrequencyPolicy,
}

impl FrequencyTracker {
    pub fn new(log: Arc<dyn RequestLog>, policy: FrequencyPolicy) -> Self {
        Self { log, policy }
    }

    pub fn policy(&self) -> FrequencyPolicy {
        self.policy
    }

    /// Record a request for `title_id` now.
    pub fn record(&self, title_id: &str) -> Result<(), RequestLogError> {
        self.record_at(title_id, Utc::now())
    }

    pub fn record_at(&self, title_id: &str, at: DateTime<Utc>) -> Result<(), RequestLogError> {
        self.log.append(title_id, at)
    }

    /// Requests for `title_id` inside `[now - window, now]`.
    pub fn count_recent(&self, title_id: &str) -> Result<u64, RequestLogError> {
        self.count_recent_at(title_id, Utc::now())
    }

    pub fn count_recent_at(
        &self,
        title_id: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, RequestLogError> {
        let out_of_range = || RequestLogError::WindowOutOfRange(self.policy.window);
        let window = chrono::Duration::from_std(self.policy.window).map_err(|_| out_of_range())?;
        let since = now.checked_sub_signed(window).ok_or_else(out_of_range)?;
        self.log.count_between(title_id, since, now)
    }

    pub fn should_evict(&self, title_id: &str) -> Result<bool, RequestLogError> {
        self.should_evict_at(title_id, Utc::now())
    }

    pub fn should_evict_at(
        &self,
        title_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, RequestLogError> {
        let count = self.count_recent_at(title_id, now)?;
        Ok(count >= u64::from(self.policy.threshold))
    }

    /// Forget every recorded request for `title_id`.
    pub fn purge(&self, title_id: &str) -> Result<u64, RequestLogError> {
        self.log.purge(title_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn create_tracker() -> FrequencyTracker {
        let log = Arc::new(SqliteRequestLog::in_memory().unwrap());
        FrequencyTracker::new(log, FrequencyPolicy::default())
    }

    #[test]
    fn test_policy_defaults() {
        let policy = FrequencyPolicy::default();
        assert_eq!(policy.window, Duration::from_secs(3600));
        assert_eq!(policy.threshold, 5);
    }

    #[test]
    fn test_below_threshold_does_not_evict() {
        let tracker = create_tracker();
        let now = Utc::now();

        for i in 0..4 {
            tracker
                .record_at("tt1", now - ChronoDuration::minutes(i))
                .unwrap();
        }

        assert_eq!(tracker.count_recent_at("tt1", now).unwrap(), 4);
        assert!(!tracker.should_evict_at("tt1", now).unwrap());
    }

    #[test]
    fn test_threshold_within_window_evicts() {
        let tracker = create_tracker();
        let now = Utc::now();

        for i in 0..5 {
            tracker
                .record_at("tt1", now - ChronoDuration::minutes(i * 10))
                .unwrap();
        }

        assert!(tracker.should_evict_at("tt1", now).unwrap());
    }

    #[test]
    fn test_requests_outside_window_are_ignored() {
        let tracker = create_tracker();
        let start = Utc::now() - ChronoDuration::hours(2);

        for i in 0..4 {
            tracker
                .record_at("tt1", start + ChronoDuration::minutes(i))
                .unwrap();
        }

        let fifth = start + ChronoDuration::minutes(61 + 3);
        tracker.record_at("tt1", fifth).unwrap();

        assert_eq!(tracker.count_recent_at("tt1", fifth).unwrap(), 1);
        assert!(!tracker.should_evict_at("tt1", fifth).unwrap());
    }

    #[test]
    fn test_custom_threshold() {
        let log = Arc::new(SqliteRequestLog::in_memory().unwrap());
        let tracker = FrequencyTracker::new(
            log,
            FrequencyPolicy {
                window: Duration::from_secs(60),
                threshold: 1,
            },
        );

        assert!(!tracker.should_evict("tt1").unwrap());
        tracker.record("tt1").unwrap();
        assert!(tracker.should_evict("tt1").unwrap());
    }

    #[test]
    fn test_oversized_window_is_an_error() {
        let log = Arc::new(SqliteRequestLog::in_memory().unwrap());
        let tracker = FrequencyTracker::new(
            log,
            FrequencyPolicy {
                window: Duration::from_secs(100_000_000_000_000),
                threshold: 5,
            },
        );
        tracker.record("tt1").unwrap();

        assert!(matches!(
            tracker.should_evict("tt1"),
            Err(RequestLogError::WindowOutOfRange(_))
        ));
    }

    #[test]
    fn test_purge_resets_count() {
        let tracker = create_tracker();
        for _ in 0..5 {
            tracker.record("tt1").unwrap();
        }
        assert!(tracker.should_evict("tt1").unwrap());

        assert_eq!(tracker.purge("tt1").unwrap(), 5);
        assert_eq!(tracker.count_recent("tt1").unwrap(), 0);
        assert!(!tracker.should_evict("tt1").unwrap());
    }
}
