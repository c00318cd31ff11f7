//! Batch slot writer expansion logic.
//!
//! Two modes turn a selection into concrete slot-creation requests:
//! one-time (exactly the selected cells of the visible week) and
//! weekly-recurring (the selection generalized to "this weekday at this
//! time" and projected forward N weeks from the anchor Monday).
//!
//! The recurring preview contract: `|selection| × number_of_weeks` requests,
//! stated to the teacher before anything is written.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate};

use crate::schedule::timegrid::{DateKey, TimeLabel};

/// One concrete slot-creation request produced by either mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotRequest {
    pub date: NaiveDate,
    pub time: TimeLabel,
}

/// One-time mode: the exact selected `(date, time)` pair set, ordered.
///
/// Deliberately not the distinct-dates × distinct-times cross-product: a
/// non-rectangular selection (Mon 09:00 + Tue 10:00) must not create
/// Mon 10:00 or Tue 09:00.
pub fn one_time_requests<'a, I>(selection: I) -> Vec<SlotRequest>
where
    I: IntoIterator<Item = &'a (DateKey, TimeLabel)>,
{
    let mut out: Vec<SlotRequest> = selection
        .into_iter()
        .map(|(key, time)| SlotRequest {
            date: key.date(),
            time: *time,
        })
        .collect();
    out.sort();
    out.dedup();
    out
}

/// Pre-submission preview: how many requests recurring mode will produce.
pub fn preview_count(selected: usize, number_of_weeks: u32) -> usize {
    selected * number_of_weeks as usize
}

/// Weekly-recurring mode: group the visible week's selection into a
/// weekday → times map (deduplicating repeated times per weekday), then for
/// each of `number_of_weeks` weeks project every bucket forward by
/// `7 × week_index` days from the anchor week's Monday.
pub fn expand_recurring<'a, I>(
    selection: I,
    anchor_monday: NaiveDate,
    number_of_weeks: u32,
) -> Vec<SlotRequest>
where
    I: IntoIterator<Item = &'a (DateKey, TimeLabel)>,
{
    let mut by_weekday: BTreeMap<u32, BTreeSet<TimeLabel>> = BTreeMap::new();
    for (key, time) in selection {
        let weekday = key.date().weekday().num_days_from_monday();
        by_weekday.entry(weekday).or_default().insert(*time);
    }

    let mut out = Vec::new();
    for week_index in 0..number_of_weeks {
        for (weekday, times) in &by_weekday {
            let date =
                anchor_monday + Duration::days(i64::from(week_index) * 7 + i64::from(*weekday));
            for time in times {
                out.push(SlotRequest { date, time: *time });
            }
        }
    }
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn key(y: i32, m: u32, d: u32) -> DateKey {
        DateKey::from(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn t(s: &str) -> TimeLabel {
        s.parse().unwrap()
    }

    #[test]
    fn one_time_mode_submits_exact_pairs_only() {
        // Non-rectangular: Mon 09:00 and Tue 10:00.
        let selection = vec![
            (key(2024, 1, 1), t("09:00")),
            (key(2024, 1, 2), t("10:00")),
        ];
        let requests = one_time_requests(&selection);
        assert_eq!(requests.len(), 2);
        assert!(!requests.contains(&SlotRequest {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            time: t("10:00"),
        }));
        assert!(!requests.contains(&SlotRequest {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            time: t("09:00"),
        }));
    }

    #[test]
    fn recurring_count_is_selection_times_weeks() {
        let selection = vec![
            (key(2024, 1, 1), t("09:00")),
            (key(2024, 1, 1), t("09:30")),
            (key(2024, 1, 4), t("18:00")),
        ];
        let anchor = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for weeks in [1u32, 3, 6] {
            let requests = expand_recurring(&selection, anchor, weeks);
            assert_eq!(requests.len(), preview_count(selection.len(), weeks));
        }
    }

    #[test]
    fn recurring_requests_keep_weekday_and_seven_day_spacing() {
        let selection = vec![(key(2024, 1, 4), t("18:00"))]; // a Thursday
        let anchor = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let requests = expand_recurring(&selection, anchor, 5);

        let mut dates: Vec<NaiveDate> = requests.iter().map(|r| r.date).collect();
        dates.sort();
        for (i, date) in dates.iter().enumerate() {
            assert_eq!(date.weekday(), Weekday::Thu);
            assert_eq!(*date, dates[0] + Duration::days(7 * i as i64));
        }
    }

    #[test]
    fn monday_and_wednesday_over_four_weeks_land_on_expected_dates() {
        // 2024-01-01 is a Monday. Mon 18:00 + Wed 19:00, 4 weeks → 8 requests
        // on Jan 1/8/15/22 (Mondays) and Jan 3/10/17/24 (Wednesdays).
        let selection = vec![
            (key(2024, 1, 1), t("18:00")),
            (key(2024, 1, 3), t("19:00")),
        ];
        let anchor = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let requests = expand_recurring(&selection, anchor, 4);
        assert_eq!(requests.len(), 8);

        let expect = |d: u32, time: &str| SlotRequest {
            date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            time: t(time),
        };
        for day in [1, 8, 15, 22] {
            assert!(requests.contains(&expect(day, "18:00")), "Jan {day} 18:00");
        }
        for day in [3, 10, 17, 24] {
            assert!(requests.contains(&expect(day, "19:00")), "Jan {day} 19:00");
        }
    }

    #[test]
    fn duplicate_times_per_weekday_are_deduplicated() {
        // The same weekday+time appearing twice must not double requests.
        let selection = vec![
            (key(2024, 1, 1), t("09:00")),
            (key(2024, 1, 1), t("09:00")),
        ];
        let anchor = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(expand_recurring(&selection, anchor, 2).len(), 2);
    }
}
