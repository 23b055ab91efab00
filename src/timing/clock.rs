use chrono::{Local, NaiveDateTime};
use chrono_tz::Tz;

/// Current wall-clock time in `timezone`, or in the host's zone when none is configured.
///
/// This is the only place the system clock is read. Everything downstream takes the
/// returned value as a parameter.
pub fn local_now(timezone: Option<Tz>) -> NaiveDateTime {
    let local_datetime = Local::now();
    match timezone {
        Some(timezone) => local_datetime.with_timezone(&timezone).naive_local(),
        None => local_datetime.naive_local(),
    }
}

/// Parses an `at` override such as `2024-05-13T09:30` or `2024-05-13T09:30:00`.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, crate::ISO_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, crate::ISO_FORMAT_MINUTES))
        .ok()
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike, Utc};

    use super::*;

    #[test]
    fn parses_both_precisions() {
        let with_seconds = parse_timestamp("2024-05-13T09:30:15").unwrap();
        assert_eq!((with_seconds.hour(), with_seconds.minute()), (9, 30));
        let without = parse_timestamp("2024-05-13T09:30").unwrap();
        assert_eq!(without.day(), 13);
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-05-13").is_none());
    }

    #[test]
    fn converts_into_configured_zone() {
        let tokyo: Tz = "Asia/Tokyo".parse().unwrap();
        let now = local_now(Some(tokyo));
        let expected = Utc::now().with_timezone(&tokyo).naive_local();
        assert!((expected - now).num_seconds().abs() < 5);
    }
}
