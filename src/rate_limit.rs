//! Fixed-window submission limiter for the public forms, keyed by client address.

use crate::config::{RateLimitSettings, MAX_RATE_LIMIT_WINDOW_SECS};
use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Clone, Copy, Debug)]
struct Window {
    started: DateTime<Utc>,
    count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Blocked { retry_after: Duration },
}

#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    entries: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(settings: RateLimitSettings) -> Self {
        RateLimiter {
            max_requests: settings.max_requests,
            window: Duration::seconds(settings.window_secs.min(MAX_RATE_LIMIT_WINDOW_SECS) as i64),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn check(&self, key: &str) -> Decision {
        self.check_at(key, Utc::now())
    }

    /// Count one submission for `key` at `now`, unless the window is already full.
    pub fn check_at(&self, key: &str, now: DateTime<Utc>) -> Decision {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let window = self.window;
        entries.retain(|_, w| now - w.started < window);

        let entry = entries.entry(key.to_string()).or_insert(Window { started: now, count: 0 });
        if entry.count >= self.max_requests {
            return Decision::Blocked {
                retry_after: entry.started + window - now,
            };
        }
        entry.count += 1;
        Decision::Allowed {
            remaining: self.max_requests - entry.count,
        }
    }

    /// Like `check`, but a blocked submission becomes a 429 with a countdown message.
    pub fn enforce(&self, key: &str) -> Result<u32, AppError> {
        match self.check(key) {
            Decision::Allowed { remaining } => Ok(remaining),
            Decision::Blocked { retry_after } => {
                tracing::warn!(client = %key, retry_after_secs = retry_after.num_seconds(), "form submission rate limited");
                Err(AppError::TooManyRequests {
                    message: format!(
                        "Превышен лимит отправки заявок. Повторите попытку через {}",
                        countdown(retry_after)
                    ),
                    retry_after_secs: retry_after.num_seconds().max(1) as u64,
                })
            }
        }
    }
}

/// Human countdown rounded up to the minute: `23 ч 59 мин`, `5 мин`.
pub fn countdown(remaining: Duration) -> String {
    let total_minutes = ((remaining.num_seconds().max(0) + 59) / 60).max(1);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    match (hours, minutes) {
        (0, m) => format!("{} мин", m),
        (h, 0) => format!("{} ч", h),
        (h, m) => format!("{} ч {} мин", h, m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn limiter() -> RateLimiter {
        RateLimiter::new(RateLimitSettings::default())
    }

    #[test]
    fn fourth_submission_within_a_day_is_blocked() {
        let rl = limiter();
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(rl.check_at("1.2.3.4", t0), Decision::Allowed { remaining: 2 });
        assert_eq!(rl.check_at("1.2.3.4", t0 + Duration::hours(1)), Decision::Allowed { remaining: 1 });
        assert_eq!(rl.check_at("1.2.3.4", t0 + Duration::hours(2)), Decision::Allowed { remaining: 0 });
        assert_eq!(
            rl.check_at("1.2.3.4", t0 + Duration::hours(3)),
            Decision::Blocked { retry_after: Duration::hours(21) }
        );
    }

    #[test]
    fn oversized_window_is_capped() {
        let rl = RateLimiter::new(RateLimitSettings {
            max_requests: 1,
            window_secs: u64::MAX,
        });
        assert_eq!(rl.window, Duration::seconds(MAX_RATE_LIMIT_WINDOW_SECS as i64));
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(rl.check_at("k", t0), Decision::Allowed { remaining: 0 });
        assert!(matches!(rl.check_at("k", t0), Decision::Blocked { .. }));
    }

    #[test]
    fn window_expiry_resets_counter() {
        let rl = limiter();
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        for _ in 0..3 {
            rl.check_at("k", t0);
        }
        assert!(matches!(rl.check_at("k", t0 + Duration::hours(23)), Decision::Blocked { .. }));
        assert_eq!(rl.check_at("k", t0 + Duration::hours(24)), Decision::Allowed { remaining: 2 });
    }

    #[test]
    fn keys_are_independent() {
        let rl = RateLimiter::new(RateLimitSettings { max_requests: 1, window_secs: 60 });
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert!(matches!(rl.check_at("a", t0), Decision::Allowed { .. }));
        assert!(matches!(rl.check_at("a", t0), Decision::Blocked { .. }));
        assert!(matches!(rl.check_at("b", t0), Decision::Allowed { .. }));
    }

    #[test]
    fn enforce_reports_countdown() {
        let rl = RateLimiter::new(RateLimitSettings { max_requests: 1, window_secs: 3600 });
        assert_eq!(rl.enforce("x").unwrap(), 0);
        match rl.enforce("x") {
            Err(AppError::TooManyRequests { message, retry_after_secs }) => {
                assert!(message.contains("Повторите попытку через"));
                assert!(retry_after_secs > 0 && retry_after_secs <= 3600);
            }
            other => panic!("expected rate limit error, got {:?}", other),
        }
    }

    #[test]
    fn countdown_formatting() {
        assert_eq!(countdown(Duration::seconds(0)), "1 мин");
        assert_eq!(countdown(Duration::seconds(61)), "2 мин");
        assert_eq!(countdown(Duration::hours(2)), "2 ч");
        assert_eq!(countdown(Duration::hours(24) - Duration::seconds(30)), "24 ч");
        assert_eq!(countdown(Duration::minutes(23 * 60 + 59)), "23 ч 59 мин");
    }
}
