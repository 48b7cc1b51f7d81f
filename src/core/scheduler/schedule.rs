//! Wall-clock schedule helpers

use chrono::{DateTime, Duration, NaiveTime, Utc};

/// First occurrence of `at` (UTC) strictly after `now`
pub fn next_daily_run(now: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
    let today = now.date_naive().and_time(at).and_utc();
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Time left until `then`, zero if it already passed
pub fn duration_until(now: DateTime<Utc>, then: DateTime<Utc>) -> std::time::Duration {
    (then - now).to_std().unwrap_or(std::time::Duration::ZERO)
}
