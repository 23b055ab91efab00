use chrono::{NaiveTime, Timelike};
use serde::{Serialize, Serializer};

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time of day, stored as minutes since midnight (0..1440).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            minutes: hour * 60 + minute,
        })
    }

    /// Parses `H:MM`, `HH:MM` or `HH:MM:SS`. Seconds are dropped.
    ///
    /// Returns `None` for anything chrono refuses, which covers non-numeric parts and
    /// out of range values such as `24:00`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let time = NaiveTime::parse_from_str(text, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
            .ok()?;
        Self::from_hm(time.hour() as u16, time.minute() as u16)
    }

    pub fn minutes(&self) -> u16 {
        self.minutes
    }

    pub fn hour(&self) -> u16 {
        self.minutes / 60
    }

    pub fn minute(&self) -> u16 {
        self.minutes % 60
    }

    /// 12 hour label used in status lines: "9 PM", "9:30 PM", "12 AM".
    pub fn to_12_hour(&self) -> String {
        let (hour, period) = match self.hour() {
            0 => (12, "AM"),
            h @ 1..=11 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        match self.minute() {
            0 => format!("{} {}", hour, period),
            m => format!("{}:{:02} {}", hour, m, period),
        }
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:02}:{:02}", self.hour(), self.minute()))
    }
}

/// Open hours for a single day. Either side may be missing when the upstream record
/// was incomplete or malformed, in which case the day counts as closed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Daily {
    #[serde(skip_serializing_if = "Option::is_none")]
    open: Option<TimeOfDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    close: Option<TimeOfDay>,
}

impl Daily {
    #[cfg(test)]
    pub fn new_open(open: TimeOfDay, close: TimeOfDay) -> Self {
        Self {
            open: Some(open),
            close: Some(close),
        }
    }

    pub fn new_closed() -> Self {
        Self::default()
    }

    /// Builds an entry from a JSON value, ignoring fields that are not valid times.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(serde_json::Value::as_str)
                .and_then(TimeOfDay::parse)
        };
        Self {
            open: field("open"),
            close: field("close"),
        }
    }

    pub fn opening(&self) -> Option<TimeOfDay> {
        self.open
    }

    pub fn closing(&self) -> Option<TimeOfDay> {
        self.close
    }

    /// The open/close pair, only when both sides are present.
    pub fn window(&self) -> Option<Window> {
        Some(Window {
            open: self.opening()?,
            close: self.closing()?,
        })
    }
}

/// A complete open/close pair for one day.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Window {
    pub open: TimeOfDay,
    pub close: TimeOfDay,
}

impl Window {
    /// Closing earlier than opening means the window runs past midnight.
    pub fn is_overnight(&self) -> bool {
        self.close < self.open
    }

    pub fn contains(&self, minutes: u16) -> bool {
        let open = self.open.minutes();
        let close = self.close.minutes();
        if self.is_overnight() {
            minutes >= open || minutes < close
        } else {
            open <= minutes && minutes < close
        }
    }

    /// Minutes left until closing, assuming `minutes` is inside the window.
    pub fn minutes_until_close(&self, minutes: u16) -> u16 {
        let close = self.close.minutes();
        if self.is_overnight() && minutes >= close {
            (MINUTES_PER_DAY - minutes) + close
        } else {
            close - minutes
        }
    }
}
