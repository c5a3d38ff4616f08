//! Human-readable "time ago" strings for tweet timestamps.

use crate::error::RenderError;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// `created_at` layout used by the search API, e.g. `Wed Jan 03 12:00:00 +0000 2024`.
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Parse a `created_at` value. The RFC 2822 form served by the older search
/// endpoint (`Thu, 06 Oct 2011 19:36:17 +0000`) is accepted as well.
pub fn parse_created_at(created_at: &str) -> Result<DateTime<FixedOffset>, RenderError> {
    let trimmed = created_at.trim();
    DateTime::parse_from_str(trimmed, CREATED_AT_FORMAT)
        .or_else(|err| DateTime::parse_from_rfc2822(trimmed).map_err(|_| err))
        .map_err(|source| RenderError::Parse {
            value: created_at.to_string(),
            source,
        })
}

/// Format an elapsed number of seconds. Negative values (clock skew) read as
/// "less than a minute ago".
pub fn format_elapsed(secs: i64) -> String {
    if secs < MINUTE {
        "less than a minute ago".to_string()
    } else if secs < 2 * MINUTE {
        "about a minute ago".to_string()
    } else if secs < HOUR {
        format!("{} minutes ago", secs / MINUTE)
    } else if secs < 2 * HOUR {
        "about an hour ago".to_string()
    } else if secs < DAY {
        format!("about {} hours ago", secs / HOUR)
    } else if secs < 2 * DAY {
        "1 day ago".to_string()
    } else {
        format!("{} days ago", secs / DAY)
    }
}

/// Relative time of `created_at` as seen from `now`. Both sides are compared
/// as absolute instants, so the offsets of the timestamp and of the reference
/// clock are accounted for.
pub fn relative_time<Tz: TimeZone>(
    created_at: &str,
    now: &DateTime<Tz>,
) -> Result<String, RenderError> {
    let created = parse_created_at(created_at)?;
    Ok(format_elapsed(now.timestamp() - created.timestamp()))
}

/// [`relative_time`] against the system clock.
pub fn relative_time_now(created_at: &str) -> Result<String, RenderError> {
    relative_time(created_at, &Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::Duration;

    fn reference() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-02T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn ago(secs: i64) -> String {
        (reference() - Duration::seconds(secs))
            .format(CREATED_AT_FORMAT)
            .to_string()
    }

    #[test]
    fn test_parse_search_api_format() {
        let parsed = parse_created_at("Mon Jan 01 23:59:30 +0000 2024").unwrap();
        assert_eq!(parsed.timestamp(), reference().timestamp() - 30);
    }

    #[test]
    fn test_parse_rfc2822_fallback() {
        let parsed = parse_created_at("Thu, 06 Oct 2011 19:36:17 +0000").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2011-10-06T19:36:17+00:00");
    }

    #[test]
    fn test_parse_failure_is_parse_error() {
        let err = parse_created_at("yesterday-ish").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(relative_time("", &reference()).is_err());
    }

    #[test]
    fn test_reference_table() {
        let now = reference();
        assert_eq!(relative_time(&ago(30), &now).unwrap(), "less than a minute ago");
        assert_eq!(relative_time(&ago(90), &now).unwrap(), "about a minute ago");
        assert_eq!(relative_time(&ago(5 * 60), &now).unwrap(), "5 minutes ago");
        assert_eq!(relative_time(&ago(90 * 60), &now).unwrap(), "about an hour ago");
        assert_eq!(relative_time(&ago(25 * 3600), &now).unwrap(), "1 day ago");
        assert_eq!(relative_time(&ago(3 * 86400), &now).unwrap(), "3 days ago");
    }

    #[test]
    fn test_literal_timestamp() {
        assert_eq!(
            relative_time("Sat Dec 30 00:00:00 +0000 2023", &reference()).unwrap(),
            "3 days ago"
        );
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(format_elapsed(59), "less than a minute ago");
        assert_eq!(format_elapsed(60), "about a minute ago");
        assert_eq!(format_elapsed(119), "about a minute ago");
        assert_eq!(format_elapsed(120), "2 minutes ago");
        assert_eq!(format_elapsed(3599), "59 minutes ago");
        assert_eq!(format_elapsed(3600), "about an hour ago");
        assert_eq!(format_elapsed(7199), "about an hour ago");
        assert_eq!(format_elapsed(7200), "about 2 hours ago");
        assert_eq!(format_elapsed(86399), "about 23 hours ago");
        assert_eq!(format_elapsed(86400), "1 day ago");
        assert_eq!(format_elapsed(172799), "1 day ago");
        assert_eq!(format_elapsed(172800), "2 days ago");
    }

    #[test]
    fn test_future_timestamp() {
        assert_eq!(format_elapsed(-3600), "less than a minute ago");
        assert_eq!(
            relative_time(&ago(-600), &reference()).unwrap(),
            "less than a minute ago"
        );
    }

    #[test]
    fn test_offsets_are_honored() {
        // 02:00 at +0200 is midnight UTC.
        assert_eq!(
            relative_time("Tue Jan 02 02:00:00 +0200 2024", &(reference() + Duration::minutes(5)))
                .unwrap(),
            "5 minutes ago"
        );

        let local_now = reference().with_timezone(&FixedOffset::west_opt(5 * 3600).unwrap());
        assert_eq!(relative_time(&ago(2 * 3600), &local_now).unwrap(), "about 2 hours ago");
    }

    #[test]
    fn test_relative_time_now_recent() {
        let created = (Utc::now() - Duration::seconds(5))
            .format(CREATED_AT_FORMAT)
            .to_string();
        assert_eq!(relative_time_now(&created).unwrap(), "less than a minute ago");
    }
}
