use chrono::{Datelike, Timelike, Weekday};
use serde::{ser::SerializeMap, Serialize, Serializer};
use tracing::debug;

use super::{daily::Daily, status::OpenStatus};

/// Weekday keys as they appear in `open_hours`, Sunday first.
pub const DAY_NAMES: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// A week of open hours, indexed Sunday first.
///
/// `None` means the upstream record had no key for that day.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    timings: [Option<Daily>; 7],
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schedule from the `open_hours` object of a POI record.
    ///
    /// Returns `None` when the value is not an object at all. Unknown keys are skipped
    /// and only exact lowercase weekday names are recognised.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let entries = value.as_object()?;
        let mut schedule = Self::new();
        for (key, entry) in entries {
            match day_from_key(key) {
                Some(weekday) => {
                    schedule.set(weekday, Daily::from_json(entry));
                }
                None => debug!("Ignoring unknown open_hours key '{}'", key),
            }
        }
        Some(schedule)
    }

    pub fn set(&mut self, weekday: Weekday, timing: Daily) -> &mut Self {
        self.timings[weekday.num_days_from_sunday() as usize] = Some(timing);
        self
    }

    pub fn get(&self, weekday: Weekday) -> Option<&Daily> {
        self.timings[weekday.num_days_from_sunday() as usize].as_ref()
    }

    /// True when no weekday has an entry, even a closed one.
    pub fn is_empty(&self) -> bool {
        self.timings.iter().all(Option::is_none)
    }

    pub fn is_open<T: Datelike + Timelike>(&self, timestamp: &T) -> bool {
        OpenStatus::resolve(Some(self), timestamp).is_open
    }
}

/// chrono's parser is case-insensitive, so exact lowercase is checked first.
fn day_from_key(key: &str) -> Option<Weekday> {
    if !DAY_NAMES.contains(&key) {
        return None;
    }
    key.parse().ok()
}

/// Lowercase key for a weekday, the form used by `open_hours`.
pub fn day_name(weekday: Weekday) -> &'static str {
    DAY_NAMES[weekday.num_days_from_sunday() as usize]
}

/// "Monday", "Tuesday", ... for status lines.
pub fn display_day_name(weekday: Weekday) -> String {
    let name = day_name(weekday);
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present = self.timings.iter().filter(|t| t.is_some()).count();
        let mut map = serializer.serialize_map(Some(present))?;
        for (name, timing) in DAY_NAMES.iter().zip(self.timings.iter()) {
            if let Some(timing) = timing {
                map.serialize_entry(name, timing)?;
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::timing::daily::TimeOfDay;

    #[test]
    fn reads_lowercase_keys_only() {
        let value = json!({
            "monday": { "open": "09:00", "close": "17:00" },
            "Tuesday": { "open": "09:00", "close": "17:00" },
            "holiday": { "open": "10:00", "close": "12:00" },
            "sunday": null
        });
        let schedule = Schedule::from_json(&value).unwrap();
        assert!(schedule.get(Weekday::Mon).unwrap().window().is_some());
        assert!(schedule.get(Weekday::Tue).is_none());
        assert_eq!(schedule.get(Weekday::Sun), Some(&Daily::new_closed()));
        assert!(!schedule.is_empty());
    }

    #[test]
    fn every_weekday_key_lands_on_its_day() {
        let mut value = serde_json::Map::new();
        for name in DAY_NAMES {
            value.insert(name.to_string(), json!({ "open": "09:00", "close": "17:00" }));
        }
        let schedule = Schedule::from_json(&serde_json::Value::Object(value)).unwrap();
        for weekday in [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ] {
            assert!(schedule.get(weekday).unwrap().window().is_some(), "{}", weekday);
        }
        assert_eq!(day_from_key("friday"), Some(Weekday::Fri));
        assert_eq!(day_from_key("Friday"), None);
        assert_eq!(day_from_key("fri"), None);
    }

    #[test]
    fn non_object_is_absent() {
        assert!(Schedule::from_json(&json!("9-5")).is_none());
        assert!(Schedule::from_json(&serde_json::Value::Null).is_none());
        assert!(Schedule::from_json(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn serializes_present_days_in_week_order() {
        let mut schedule = Schedule::new();
        schedule
            .set(
                Weekday::Sat,
                Daily::new_open(
                    TimeOfDay::from_hm(10, 0).unwrap(),
                    TimeOfDay::from_hm(14, 30).unwrap(),
                ),
            )
            .set(Weekday::Sun, Daily::new_closed());
        let text = serde_json::to_string(&schedule).unwrap();
        assert_eq!(
            text,
            r#"{"sunday":{},"saturday":{"open":"10:00","close":"14:30"}}"#
        );
    }

    #[test]
    fn display_names_are_capitalized() {
        assert_eq!(display_day_name(Weekday::Mon), "Monday");
        assert_eq!(display_day_name(Weekday::Sun), "Sunday");
        assert_eq!(day_name(Weekday::Sat), "saturday");
    }

    #[test]
    fn is_open_matches_resolver() {
        let schedule = Schedule::from_json(&json!({
            "wednesday": { "open": "08:00", "close": "12:00" }
        }))
        .unwrap();
        let wednesday = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        assert!(schedule.is_open(&wednesday.and_hms_opt(8, 0, 0).unwrap()));
        assert!(!schedule.is_open(&wednesday.and_hms_opt(12, 0, 0).unwrap()));
    }
}
