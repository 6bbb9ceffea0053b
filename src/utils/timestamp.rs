//! Rendering of Slack `ts` values as human-readable dates.
//!
//! Slack identifies messages by a fractional seconds-since-epoch string such as
//! `"1704471850.123456"`. The formatter turns that into
//! `"Jan 5, 2024, 04:24:10 PM"` in either the process-local timezone or a named
//! IANA zone. Malformed input never fails; it renders as [`INVALID_DATE`].

use std::fmt::Display;
use std::sync::LazyLock;

use chrono::{DateTime, Local, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;

/// Rendered in place of a date when the input has no numeric value.
pub const INVALID_DATE: &str = "Invalid Date";

/// Year, abbreviated month, day, 12-hour time with seconds and AM/PM.
///
/// The year is unpadded, so year 500 prints as `500` rather than `0500`.
pub const DISPLAY_FORMAT: &str = "%b %-d, %-Y, %I:%M:%S %p";

/// Largest representable offset from the epoch in either direction (100M days).
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*(?:[eE][+-]?\d+)?|\.\d+(?:[eE][+-]?\d+)?)")
        .expect("static regex compile")
});

/// Timezone used when rendering timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayZone {
    /// Whatever the host process is configured with.
    #[default]
    Local,
    Named(Tz),
}

/// Parses the longest leading decimal number, ignoring leading whitespace and
/// any trailing characters (`"12.5abc"` is `12.5`).
#[must_use]
pub fn parse_epoch_seconds(raw: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(raw.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Whole milliseconds since the epoch, truncated toward zero.
#[must_use]
pub fn epoch_millis(seconds: f64) -> Option<i64> {
    let millis = (seconds * 1000.0).trunc();
    if !millis.is_finite() || millis.abs() > MAX_EPOCH_MILLIS {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let millis = millis as i64;
    Some(millis)
}

fn render<Z>(utc: DateTime<Utc>, zone: &Z) -> String
where
    Z: TimeZone,
    Z::Offset: Display,
{
    utc.with_timezone(zone).format(DISPLAY_FORMAT).to_string()
}

/// Formats a Slack timestamp in the given zone.
///
/// A missing value, a value with no leading number, or one outside the
/// representable range yields [`INVALID_DATE`].
#[must_use]
pub fn format_slack_timestamp_in(raw: Option<&str>, zone: DisplayZone) -> String {
    let Some(utc) = raw
        .and_then(parse_epoch_seconds)
        .and_then(epoch_millis)
        .and_then(DateTime::<Utc>::from_timestamp_millis)
    else {
        return INVALID_DATE.to_string();
    };

    match zone {
        DisplayZone::Local => render(utc, &Local),
        DisplayZone::Named(tz) => render(utc, &tz),
    }
}

/// Formats a Slack timestamp in the process-local timezone.
///
/// # Examples
///
/// ```
/// use slack_relay::utils::timestamp::{format_slack_timestamp, INVALID_DATE};
///
/// assert_eq!(format_slack_timestamp("not-a-number"), INVALID_DATE);
/// assert!(format_slack_timestamp("1704471850").contains("2024"));
/// ```
#[must_use]
pub fn format_slack_timestamp(raw: &str) -> String {
    format_slack_timestamp_in(Some(raw), DisplayZone::Local)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UTC: DisplayZone = DisplayZone::Named(chrono_tz::UTC);

    #[test]
    fn test_parse_epoch_seconds_prefixes() {
        assert_eq!(parse_epoch_seconds("1704471850"), Some(1_704_471_850.0));
        assert_eq!(parse_epoch_seconds("  12.5abc"), Some(12.5));
        assert_eq!(parse_epoch_seconds(".5"), Some(0.5));
        assert_eq!(parse_epoch_seconds("-3"), Some(-3.0));
        assert_eq!(parse_epoch_seconds("1e3"), Some(1000.0));
        assert_eq!(parse_epoch_seconds("1e"), Some(1.0));
        assert_eq!(parse_epoch_seconds(""), None);
        assert_eq!(parse_epoch_seconds("abc"), None);
        assert_eq!(parse_epoch_seconds("Infinity"), None);
    }

    #[test]
    fn test_epoch_millis_truncates() {
        assert_eq!(epoch_millis(1.0009), Some(1000));
        assert_eq!(epoch_millis(-1.0009), Some(-1000));
        assert_eq!(epoch_millis(8.64e12), Some(8_640_000_000_000_000));
        assert_eq!(epoch_millis(8.64e12 + 1.0), None);
        assert_eq!(epoch_millis(f64::NAN), None);
    }

    #[test]
    fn test_fraction_below_one_second_is_dropped() {
        let formatted = format_slack_timestamp_in(Some("1704471850.999999"), UTC);
        assert_eq!(formatted, "Jan 5, 2024, 04:24:10 PM");
    }

    #[test]
    fn test_morning_and_midnight() {
        assert_eq!(
            format_slack_timestamp_in(Some("0"), UTC),
            "Jan 1, 1970, 12:00:00 AM"
        );
        assert_eq!(
            format_slack_timestamp_in(Some("1700000000"), UTC),
            "Nov 14, 2023, 10:13:20 PM"
        );
        assert_eq!(
            format_slack_timestamp_in(Some("1717228800.000100"), UTC),
            "Jun 1, 2024, 08:00:00 AM"
        );
    }

    #[test]
    fn test_named_zone_shifts_wall_clock() {
        let ny = DisplayZone::Named(chrono_tz::America::New_York);
        assert_eq!(
            format_slack_timestamp_in(Some("1704471850"), ny),
            "Jan 5, 2024, 11:24:10 AM"
        );
    }

    #[test]
    fn test_years_before_1000_are_not_padded() {
        assert_eq!(
            format_slack_timestamp_in(Some("-46388635200"), UTC),
            "Jan 1, 500, 12:00:00 PM"
        );
    }

    #[test]
    fn test_missing_and_out_of_range() {
        assert_eq!(format_slack_timestamp_in(None, UTC), INVALID_DATE);
        assert_eq!(format_slack_timestamp_in(Some("9e20"), UTC), INVALID_DATE);
    }
}
