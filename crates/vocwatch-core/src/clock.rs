//! Reporting-timezone timestamps.
//!
//! All displayed and stamped times use a fixed UTC+9 offset regardless of the
//! host clock, so datasets collected from different machines line up.

use chrono::{DateTime, FixedOffset, Utc};

const REPORTING_OFFSET_SECS: i32 = 9 * 3600;

fn now_reporting() -> DateTime<FixedOffset> {
    // 9 hours is well inside FixedOffset's ±24h range.
    let offset = FixedOffset::east_opt(REPORTING_OFFSET_SECS).expect("valid UTC+9 offset");
    Utc::now().with_timezone(&offset)
}

/// Today's date in the reporting timezone, formatted `YYYY-MM-DD`.
#[must_use]
pub fn today_stamp() -> String {
    now_reporting().format("%Y-%m-%d").to_string()
}

/// Current reporting-timezone time, formatted `YYYY-MM-DD HH:MM`.
#[must_use]
pub fn now_stamp() -> String {
    now_reporting().format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn today_stamp_shape() {
        let s = today_stamp();
        assert_eq!(s.len(), 10);
        assert_eq!(s.as_bytes()[4], b'-');
        assert_eq!(s.as_bytes()[7], b'-');
    }

    #[test]
    fn now_stamp_shape() {
        let s = now_stamp();
        assert_eq!(s.len(), 16);
        assert_eq!(&s[10..11], " ");
        assert_eq!(s.as_bytes()[13], b':');
    }

    #[test]
    fn now_stamp_starts_with_today() {
        // Could flake exactly at midnight KST; acceptable for a wall-clock helper.
        assert!(now_stamp().starts_with(&today_stamp()));
    }
}
