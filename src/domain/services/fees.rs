use chrono::{DateTime, Utc};

/// Parking is billed per started hour with a one-hour minimum: a stay of
/// 0-60 minutes costs one hour, 61-120 minutes two, and so on. A clock
/// skew that puts the exit before the entry still bills the minimum.
pub fn parking_fee(entered_at: DateTime<Utc>, exited_at: DateTime<Utc>, rate_per_hour: i64) -> i64 {
    let minutes = (exited_at - entered_at).num_minutes().max(0);
    let hours = (minutes / 60) + if minutes % 60 > 0 { 1 } else { 0 };
    hours.max(1) * rate_per_hour
}
