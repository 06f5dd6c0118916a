use chrono::NaiveDateTime;

use crate::common::types::parse_timestamp;

/// Relative display time for a message: `now`, `{m}m ago`, `{h}h ago`,
/// then the plain date.
pub fn format_relative(timestamp: &str, now: NaiveDateTime) -> String {
    let Some(then) = parse_timestamp(timestamp) else {
        return "now".to_string();
    };
    let minutes = now.signed_duration_since(then).num_minutes();
    if minutes < 1 {
        "now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        then.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 5)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn fresh_messages_say_now() {
        assert_eq!(format_relative("2026-08-05T12:00:30", at(12, 1)), "now");
        // unparseable timestamps degrade to "now" rather than failing
        assert_eq!(format_relative("", at(12, 0)), "now");
    }

    #[test]
    fn minute_and_hour_buckets() {
        assert_eq!(format_relative("2026-08-05T11:55:00", at(12, 0)), "5m ago");
        assert_eq!(format_relative("2026-08-05T09:00:00", at(12, 0)), "3h ago");
    }

    #[test]
    fn old_messages_show_the_date() {
        assert_eq!(
            format_relative("2026-08-01T09:00:00", at(12, 0)),
            "2026-08-01"
        );
    }
}
