//! Pure calendar-coordinate helpers: bookable time labels, Monday-anchored
//! week dates, and the past-slot predicate.
//!
//! The string forms are load-bearing: `DateKey` renders as `YYYY-MM-DD` and
//! `TimeLabel` as `HH:MM`, and both are used as lookup keys between the grid
//! builder and its consumers. They are newtypes so the formats cannot drift.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Bookable day runs 06:00–22:00 at 30-minute steps (33 labels).
pub const DAY_START_HOUR: u32 = 6;
pub const DAY_END_HOUR: u32 = 22;
pub const STEP_MINUTES: u32 = 30;

/// A time-of-day cell label on the calendar, always rendered `HH:MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeLabel(NaiveTime);

impl TimeLabel {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(TimeLabel)
    }

    pub fn from_time(t: NaiveTime) -> Self {
        // Seconds are not part of the grid; truncate them.
        TimeLabel(t - Duration::seconds(i64::from(t.second())))
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for TimeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for TimeLabel {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s, "%H:%M").map(TimeLabel)
    }
}

impl Serialize for TimeLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Calendar-date map key, always rendered `YYYY-MM-DD`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DateKey {
    fn from(d: NaiveDate) -> Self {
        DateKey(d)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(DateKey)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Ordered time labels from 06:00 to 22:00 inclusive at 30-minute steps.
pub fn generate_time_slots() -> Vec<TimeLabel> {
    let mut out = Vec::with_capacity(((DAY_END_HOUR - DAY_START_HOUR) * 2 + 1) as usize);
    for hour in DAY_START_HOUR..=DAY_END_HOUR {
        for minute in [0, STEP_MINUTES] {
            if hour == DAY_END_HOUR && minute != 0 {
                break;
            }
            if let Some(label) = TimeLabel::new(hour, minute) {
                out.push(label);
            }
        }
    }
    out
}

/// The 7 dates of the Monday-starting week containing `reference`.
/// A Sunday reference wraps 6 days back to the preceding Monday, never
/// forward to the upcoming one.
pub fn get_week_dates(reference: NaiveDate) -> [NaiveDate; 7] {
    let back = i64::from(reference.weekday().num_days_from_monday());
    let monday = reference - Duration::days(back);
    let mut week = [monday; 7];
    for (i, d) in week.iter_mut().enumerate() {
        *d = monday + Duration::days(i as i64);
    }
    week
}

/// The concrete UTC instant a grid cell refers to.
pub fn slot_instant(date: NaiveDate, time: TimeLabel) -> DateTime<Utc> {
    date.and_time(time.time()).and_utc()
}

/// True iff the cell's instant is strictly before `now`. Callers pass a
/// fresh `now` from the injected clock on every check.
pub fn is_past_slot(date: NaiveDate, time: TimeLabel, now: DateTime<Utc>) -> bool {
    slot_instant(date, time) < now
}

pub fn day_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Short per-column header, e.g. "Jan 1".
pub fn day_date(date: NaiveDate) -> String {
    format!("{}", date.format("%b %-d"))
}

/// Header label for the visible week, e.g. "Jan 1 – Jan 7, 2024".
pub fn format_week_range(week: &[NaiveDate; 7]) -> String {
    let (start, end) = (week[0], week[6]);
    if start.year() == end.year() {
        format!("{} – {}, {}", day_date(start), day_date(end), start.year())
    } else {
        format!(
            "{}, {} – {}, {}",
            day_date(start),
            start.year(),
            day_date(end),
            end.year()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn grid_has_33_labels_from_0600_to_2200() {
        let labels = generate_time_slots();
        assert_eq!(labels.len(), 33);
        assert_eq!(labels[0].to_string(), "06:00");
        assert_eq!(labels[1].to_string(), "06:30");
        assert_eq!(labels[32].to_string(), "22:00");
        // Strictly increasing, 30 minutes apart.
        for pair in labels.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn week_starts_on_monday_for_every_weekday() {
        // 2024-01-01 is a Monday.
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for offset in 0..7 {
            let reference = monday + Duration::days(offset);
            let week = get_week_dates(reference);
            assert_eq!(week[0], monday, "offset {offset}");
            assert_eq!(week[6], monday + Duration::days(6));
        }
    }

    #[test]
    fn sunday_wraps_back_six_days_not_forward() {
        // 2024-01-07 is a Sunday; its week must start 2024-01-01.
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let week = get_week_dates(sunday);
        assert_eq!(week[0], NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(week[6], sunday);
    }

    #[test]
    fn past_slot_is_strict_and_monotonic() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let time: TimeLabel = "09:00".parse().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();

        assert!(!is_past_slot(date, time, at), "boundary is not past");
        assert!(is_past_slot(date, time, at + Duration::seconds(1)));
        // Advancing the clock never un-pasts a slot.
        assert!(is_past_slot(date, time, at + Duration::days(30)));
    }

    #[test]
    fn date_key_format_is_stable() {
        let key = DateKey::from(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(key.to_string(), "2024-03-05");
        assert_eq!("2024-03-05".parse::<DateKey>().unwrap(), key);
    }

    #[test]
    fn week_range_label_handles_year_boundary() {
        let week = get_week_dates(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(format_week_range(&week), "Dec 30, 2024 – Jan 5, 2025");
    }
}
