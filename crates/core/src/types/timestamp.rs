//! Timestamp display in shop-local time (UTC+7).

use chrono::{DateTime, FixedOffset, Utc};

const VIETNAM_OFFSET_SECS: i32 = 7 * 3600;

fn local(at: &DateTime<Utc>) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(VIETNAM_OFFSET_SECS)
        .map_or_else(|| at.fixed_offset(), |offset| at.with_timezone(&offset))
}

/// `18/10/2026 14:05`, or `-` when unknown.
#[must_use]
pub fn display_datetime(at: Option<&DateTime<Utc>>) -> String {
    at.map_or_else(|| "-".to_owned(), |at| local(at).format("%d/%m/%Y %H:%M").to_string())
}

/// `18/10/2026`, or `-` when unknown.
#[must_use]
pub fn display_date(at: Option<&DateTime<Utc>>) -> String {
    at.map_or_else(|| "-".to_owned(), |at| local(at).format("%d/%m/%Y").to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_shifts_to_local_time() {
        let at: DateTime<Utc> = "2026-10-18T20:30:00Z".parse().unwrap();
        assert_eq!(display_datetime(Some(&at)), "19/10/2026 03:30");
        assert_eq!(display_date(Some(&at)), "19/10/2026");
        assert_eq!(display_datetime(None), "-");
    }
}
