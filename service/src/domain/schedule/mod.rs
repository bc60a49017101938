//! Weekly schedule definitions.

pub mod block;
pub mod revision;

use std::{str::FromStr, sync::LazyLock};

use derive_more::{AsRef, Display, Into};
use regex::Regex;
use serde::{Serialize, Serializer};

pub use self::{block::Block, revision::Slot as RevisionSlot};

/// Day of a week, `0` being Sunday and `6` Saturday.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    /// Creates a new [`DayOfWeek`] if the given `day` is in the `0..=6`
    /// range.
    #[must_use]
    pub fn new(day: u8) -> Option<Self> {
        (day <= 6).then_some(Self(day))
    }
}

impl Serialize for DayOfWeek {
    fn serialize<S: Serializer>(&self, se: S) -> Result<S::Ok, S::Error> {
        se.serialize_u8(self.0)
    }
}

/// Wall-clock time in `HH:MM` form.
#[derive(
    AsRef, Clone, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd,
    Serialize,
)]
#[as_ref(str, String)]
pub struct ClockTime(String);

impl ClockTime {
    /// Creates a new [`ClockTime`] if the given `time` is a valid `HH:MM`
    /// 24-hour time.
    #[must_use]
    pub fn new(time: impl AsRef<str>) -> Option<Self> {
        /// Regular expression checking [`ClockTime`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$")
                .expect("valid regex")
        });

        let time = time.as_ref();
        REGEX.is_match(time).then(|| Self(time.to_owned()))
    }
}

impl FromStr for ClockTime {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ClockTime`")
    }
}

/// Display color of a schedule entry.
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq, Serialize)]
#[as_ref(str, String)]
pub struct Color(String);

impl Color {
    /// Creates a new [`Color`] if the given `color` is valid.
    ///
    /// The `color` is sanitized before validation.
    #[must_use]
    pub fn new(color: impl AsRef<str>) -> Option<Self> {
        let color = crate::sanitize::text(color.as_ref());
        (!color.is_empty() && color.chars().count() <= 32)
            .then_some(Self(color))
    }
}

#[cfg(test)]
mod clock_time_spec {
    use super::ClockTime;

    #[test]
    fn accepts_24_hour_times() {
        assert!(ClockTime::new("00:00").is_some());
        assert!(ClockTime::new("09:30").is_some());
        assert!(ClockTime::new("23:59").is_some());
    }

    #[test]
    fn rejects_out_of_range_and_malformed_times() {
        assert!(ClockTime::new("24:00").is_none());
        assert!(ClockTime::new("12:60").is_none());
        assert!(ClockTime::new("9:30").is_none());
        assert!(ClockTime::new("0930").is_none());
        assert!(ClockTime::new("midnight").is_none());
    }
}
