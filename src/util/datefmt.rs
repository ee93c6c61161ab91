use std::fmt::Display;

use chrono::{DateTime, Datelike, Local, TimeZone, Utc};

/// Format a seconds-since-epoch stamp relative to `now`:
/// `Today 9:05 AM`, `Yesterday 11:59 PM`, `Mar 5 2:00 PM`, `Dec 31, 2024 8:15 AM`.
pub fn format_timestamp<Tz>(ts: i64, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(utc) = DateTime::<Utc>::from_timestamp(ts, 0) else {
        return String::new();
    };
    let at = utc.with_timezone(&now.timezone());
    let today = now.date_naive();
    let date = at.date_naive();

    let day = if date == today {
        "Today".to_string()
    } else if today.pred_opt() == Some(date) {
        "Yesterday".to_string()
    } else if date.year() == today.year() {
        at.format("%b %-d").to_string()
    } else {
        at.format("%b %-d, %Y").to_string()
    };
    format!("{} {}", day, at.format("%-I:%M %p"))
}

/// [`format_timestamp`] against the local clock.
pub fn format_local(ts: i64) -> String {
    format_timestamp(ts, &Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn today_and_yesterday() {
        let now = utc(2026, 10, 19, 15, 30);
        assert_eq!(format_timestamp(utc(2026, 10, 19, 9, 5).timestamp(), &now), "Today 9:05 AM");
        assert_eq!(
            format_timestamp(utc(2026, 10, 18, 23, 59).timestamp(), &now),
            "Yesterday 11:59 PM"
        );
    }

    #[test]
    fn same_year_omits_year() {
        let now = utc(2026, 10, 19, 15, 30);
        assert_eq!(format_timestamp(utc(2026, 3, 5, 14, 0).timestamp(), &now), "Mar 5 2:00 PM");
        assert_eq!(
            format_timestamp(utc(2026, 10, 17, 12, 0).timestamp(), &now),
            "Oct 17 12:00 PM"
        );
    }

    #[test]
    fn other_year_includes_year() {
        let now = utc(2026, 1, 1, 10, 0);
        assert_eq!(
            format_timestamp(utc(2025, 12, 31, 0, 0).timestamp(), &now),
            "Yesterday 12:00 AM"
        );
        assert_eq!(
            format_timestamp(utc(2024, 12, 31, 8, 15).timestamp(), &now),
            "Dec 31, 2024 8:15 AM"
        );
    }

    #[test]
    fn uses_the_clock_timezone() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = plus_two.with_ymd_and_hms(2026, 10, 20, 10, 0, 0).unwrap();
        assert_eq!(
            format_timestamp(utc(2026, 10, 19, 23, 30).timestamp(), &now),
            "Today 1:30 AM"
        );
    }
}
