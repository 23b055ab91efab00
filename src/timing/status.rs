use chrono::{Datelike, Timelike, Weekday};
use serde::Serialize;

use super::{
    daily::{TimeOfDay, Window},
    schedule::{display_day_name, Schedule},
};

/// Warn that a place is closing once it is this close to its closing time.
pub const CLOSING_SOON_MINUTES: u16 = 60;

/// The answer to "is this place open right now".
///
/// `closes_at` is only filled while open, `opens_at` only while closed and the next
/// opening is known. Both are 12 hour labels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenStatus {
    pub is_open: bool,
    pub status_text: String,
    pub closes_at: Option<String>,
    pub opens_at: Option<String>,
}

impl OpenStatus {
    /// Resolves the status of `schedule` at the wall-clock time `now`.
    ///
    /// No timezone conversion happens here. `now` has to be in the same local frame as
    /// the schedule. Missing or malformed hours never fail, they resolve to one of the
    /// closed outcomes.
    pub fn resolve<T: Datelike + Timelike>(schedule: Option<&Schedule>, now: &T) -> Self {
        let schedule = match schedule {
            Some(schedule) if !schedule.is_empty() => schedule,
            _ => return Self::closed("Hours unavailable", None),
        };

        let today = now.weekday();
        let minutes = (now.hour() * 60 + now.minute()) as u16;

        let status = Self::resolve_today(schedule, today, minutes);
        if status.is_open {
            return status;
        }
        Self::overnight_spill(schedule, today, minutes).unwrap_or(status)
    }

    fn resolve_today(schedule: &Schedule, today: Weekday, minutes: u16) -> Self {
        let Some(window) = schedule.get(today).and_then(|daily| daily.window()) else {
            return Self::next_open_day(schedule, today);
        };

        if window.contains(minutes) {
            return Self::open(window, minutes);
        }

        if minutes < window.open.minutes() {
            let opens_at = window.open.to_12_hour();
            return Self::closed(&format!("Closed · Opens {}", opens_at), Some(opens_at));
        }

        match Self::opening(schedule, today.succ()) {
            Some(open) => {
                let opens_at = open.to_12_hour();
                Self::closed(
                    &format!("Closed · Opens tomorrow {}", opens_at),
                    Some(opens_at),
                )
            }
            None => Self::closed("Closed", None),
        }
    }

    /// Walks forward from tomorrow, at most a full week, which lands on today again
    /// on the last step.
    fn next_open_day(schedule: &Schedule, today: Weekday) -> Self {
        let mut day = today;
        for _ in 0..7 {
            day = day.succ();
            if let Some(open) = Self::opening(schedule, day) {
                return Self::closed(
                    &format!("Closed · Opens {}", display_day_name(day)),
                    Some(open.to_12_hour()),
                );
            }
        }
        Self::closed("Closed", None)
    }

    /// Yesterday's overnight window can still be running after midnight.
    fn overnight_spill(schedule: &Schedule, today: Weekday, minutes: u16) -> Option<Self> {
        let window = schedule.get(today.pred())?.window()?;
        if window.is_overnight() && minutes < window.close.minutes() {
            return Some(Self::open(window, minutes));
        }
        None
    }

    fn opening(schedule: &Schedule, weekday: Weekday) -> Option<TimeOfDay> {
        schedule.get(weekday)?.opening()
    }

    fn open(window: Window, minutes: u16) -> Self {
        let closes_at = window.close.to_12_hour();
        let remaining = window.minutes_until_close(minutes);
        let status_text = if remaining <= CLOSING_SOON_MINUTES {
            format!("Closes in {} min", remaining)
        } else {
            format!("Open · Closes {}", closes_at)
        };
        Self {
            is_open: true,
            status_text,
            closes_at: Some(closes_at),
            opens_at: None,
        }
    }

    fn closed(status_text: &str, opens_at: Option<String>) -> Self {
        Self {
            is_open: false,
            status_text: status_text.to_string(),
            closes_at: None,
            opens_at,
        }
    }
}
