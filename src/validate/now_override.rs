use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::foundation::diag::Diagnostics;

/// Determine the offset between the system clock and an optional `now`
/// override on the input record.
///
/// Absent override is fine and yields a zero offset. A present but
/// unparseable value is a warning (not fatal) and also yields zero, so the
/// caller proceeds as if no override were given.
pub fn parse_now_offset(record: &Value, system_now: DateTime<Utc>, diag: &mut Diagnostics) -> Duration {
    let raw = match record.get("now") {
        None | Some(Value::Null) => return Duration::zero(),
        Some(v) => v,
    };

    if let Some(target) = raw.as_str().and_then(parse_timestamp) {
        return target - system_now;
    }

    diag.warn(
        format!("invalid format provided for now {raw}; use ISO-8601 or RFC-2822"),
        "now invalid!",
    );
    Duration::zero()
}

/// Parse an ISO-8601 (RFC 3339) or RFC-2822 timestamp into UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .or_else(|| DateTime::parse_from_rfc2822(raw).ok())
        .map(|t| t.with_timezone(&Utc))
}
