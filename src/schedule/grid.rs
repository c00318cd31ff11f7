//! Week-grid reducer: buckets raw slot rows into a per-day, per-time lookup
//! structure with derived display states.
//!
//! Guarantee: every date of the visible week has a defined (possibly empty)
//! entry, so `(DateKey, TimeLabel)` lookups only distinguish "no slot" from
//! "slot exists" and never need map-existence checks.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::domain::SlotRow;
use crate::schedule::timegrid::{is_past_slot, DateKey, TimeLabel};

/// Mutually exclusive display state of an existing slot, derived at read
/// time. Booked wins over past, past wins over open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Open,
    Booked,
    Past,
}

/// One existing slot placed on the grid, with denormalized student display
/// fields when booked.
#[derive(Clone, Debug)]
pub struct GridSlot {
    pub id: Uuid,
    pub time: TimeLabel,
    pub duration_minutes: u32,
    pub status: SlotStatus,
    pub student_name: Option<String>,
    pub lesson_title: Option<String>,
}

/// State of an arbitrary `(date, time)` cell, existing or not. This is what
/// the selection machine consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    /// No row exists and the instant is still in the future: selectable.
    Empty,
    Open,
    Booked,
    Past,
}

#[derive(Clone, Debug)]
pub struct WeekGrid {
    days: BTreeMap<DateKey, Vec<GridSlot>>,
}

impl WeekGrid {
    pub fn days(&self) -> &BTreeMap<DateKey, Vec<GridSlot>> {
        &self.days
    }

    pub fn slot_at(&self, key: DateKey, time: TimeLabel) -> Option<&GridSlot> {
        self.days
            .get(&key)
            .and_then(|slots| slots.iter().find(|s| s.time == time))
    }

    /// Derived state of any cell on the visible grid. Cells outside the
    /// grid's 7 days are treated as past so nothing can select them.
    pub fn cell_state(&self, key: DateKey, time: TimeLabel, now: DateTime<Utc>) -> CellState {
        if !self.days.contains_key(&key) {
            return CellState::Past;
        }
        match self.slot_at(key, time).map(|s| s.status) {
            Some(SlotStatus::Booked) => CellState::Booked,
            Some(SlotStatus::Past) => CellState::Past,
            Some(SlotStatus::Open) => CellState::Open,
            None if is_past_slot(key.date(), time, now) => CellState::Past,
            None => CellState::Empty,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}

/// Build the grid for one visible week.
///
/// All 7 dates are initialized up front so days with zero rows still render
/// as fully selectable. Rows whose date falls outside the week (the query
/// bounds should make that impossible) are dropped with a warning rather
/// than silently, so query/grid misalignment is observable.
pub fn build_week_grid(week: &[NaiveDate; 7], rows: &[SlotRow], now: DateTime<Utc>) -> WeekGrid {
    let mut days: BTreeMap<DateKey, Vec<GridSlot>> = BTreeMap::new();
    for date in week {
        days.insert(DateKey::from(*date), Vec::new());
    }

    for row in rows {
        let naive = row.start_time.naive_utc();
        let key = DateKey::from(naive.date());
        let time = TimeLabel::from_time(naive.time());

        let Some(bucket) = days.get_mut(&key) else {
            warn!(target: "schedule", slot = %row.id, date = %key,
                  "Dropping slot outside the requested week; query and grid bounds disagree");
            continue;
        };

        let status = if row.is_booked {
            SlotStatus::Booked
        } else if is_past_slot(key.date(), time, now) {
            SlotStatus::Past
        } else {
            SlotStatus::Open
        };

        bucket.push(GridSlot {
            id: row.id,
            time,
            duration_minutes: row.duration_minutes,
            status,
            student_name: row.student_name.clone(),
            lesson_title: row.lesson_title.clone(),
        });
    }

    for slots in days.values_mut() {
        slots.sort_by_key(|s| s.time);
    }

    WeekGrid { days }
}
