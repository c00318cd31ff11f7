//! Cell selection state machine for the availability calendar.
//!
//! Per-cell lifecycle: empty → selected → (submitted, removed). Booked,
//! past, and already-open cells are absorbing: no click, drag-enter, or
//! band shortcut ever adds them. Switching weeks or slot-type modes must
//! clear the selection entirely; callers do that via `clear`.
//!
//! The same machine validates batch requests server-side: cells are only
//! accepted against the authoritative grid, so a stale client cannot sneak
//! a booked or past cell into a write.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::schedule::grid::{CellState, WeekGrid};
use crate::schedule::timegrid::{DateKey, TimeLabel};

/// Named hour band for the bulk-select shortcut.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeBand {
    Morning,
    Afternoon,
    Evening,
}

impl TimeBand {
    /// Half-open hour range `[start, end)` covered by the band.
    fn hours(&self) -> (u32, u32) {
        match self {
            TimeBand::Morning => (6, 12),
            TimeBand::Afternoon => (12, 17),
            TimeBand::Evening => (17, 23),
        }
    }

    pub fn contains(&self, time: TimeLabel) -> bool {
        let (start, end) = self.hours();
        (start..end).contains(&time.hour())
    }
}

/// The ephemeral set of cells a teacher has marked for creation. Never
/// persisted; it is the input to the batch writer.
#[derive(Debug, Default)]
pub struct Selection {
    cells: BTreeSet<(DateKey, TimeLabel)>,
    dragging: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, key: DateKey, time: TimeLabel) -> bool {
        self.cells.contains(&(key, time))
    }

    pub fn iter(&self) -> impl Iterator<Item = &(DateKey, TimeLabel)> {
        self.cells.iter()
    }

    /// Single-click entry mode: toggles one cell. Only empty future cells
    /// can enter the selection; toggling a selected cell removes it.
    /// Returns whether the cell is selected afterwards.
    pub fn toggle(
        &mut self,
        grid: &WeekGrid,
        now: DateTime<Utc>,
        key: DateKey,
        time: TimeLabel,
    ) -> bool {
        if self.cells.remove(&(key, time)) {
            return false;
        }
        if grid.cell_state(key, time, now) == CellState::Empty {
            self.cells.insert((key, time));
            return true;
        }
        false
    }

    /// Multi-select entry mode: mouse-down starts a drag on the given cell.
    pub fn drag_begin(&mut self, grid: &WeekGrid, now: DateTime<Utc>, key: DateKey, time: TimeLabel) {
        self.dragging = true;
        self.drag_enter(grid, now, key, time);
    }

    /// Mouse-enter during a drag adds empty cells, never removes, and never
    /// touches booked/past/already-open cells. Ignored outside a drag.
    pub fn drag_enter(&mut self, grid: &WeekGrid, now: DateTime<Utc>, key: DateKey, time: TimeLabel) {
        if !self.dragging {
            return;
        }
        if grid.cell_state(key, time, now) == CellState::Empty {
            self.cells.insert((key, time));
        }
    }

    pub fn drag_end(&mut self) {
        self.dragging = false;
    }

    /// Bulk-add every empty cell of the visible week whose hour falls in the
    /// named band. Cells outside the band are left untouched.
    pub fn select_band(
        &mut self,
        grid: &WeekGrid,
        now: DateTime<Utc>,
        labels: &[TimeLabel],
        band: TimeBand,
    ) {
        let keys: Vec<DateKey> = grid.days().keys().copied().collect();
        for key in keys {
            for &time in labels.iter().filter(|t| band.contains(**t)) {
                if grid.cell_state(key, time, now) == CellState::Empty {
                    self.cells.insert((key, time));
                }
            }
        }
    }

    /// Drop everything, including an in-flight drag. Required on week
    /// switches and slot-type changes so no stale cross-week cells survive.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.dragging = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SlotRow;
    use crate::schedule::grid::build_week_grid;
    use crate::schedule::timegrid::{generate_time_slots, get_week_dates};
    use chrono::{NaiveDate, TimeZone};
    use uuid::Uuid;

    fn fixture() -> (WeekGrid, DateTime<Utc>) {
        let week = get_week_dates(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        // Wednesday 12:00 — Monday and Tuesday are fully past.
        let now = Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap();
        let rows = vec![
            SlotRow {
                id: Uuid::new_v4(),
                teacher_id: "t1".into(),
                start_time: Utc.with_ymd_and_hms(2024, 1, 5, 18, 0, 0).unwrap(),
                duration_minutes: 60,
                is_available: true,
                is_booked: true,
                student_id: Some("s1".into()),
                student_name: Some("Ana".into()),
                lesson_title: Some("Unit 3".into()),
            },
            SlotRow {
                id: Uuid::new_v4(),
                teacher_id: "t1".into(),
                start_time: Utc.with_ymd_and_hms(2024, 1, 5, 19, 0, 0).unwrap(),
                duration_minutes: 60,
                is_available: true,
                is_booked: false,
                student_id: None,
                student_name: None,
                lesson_title: None,
            },
        ];
        (build_week_grid(&week, &rows, now), now)
    }

    fn key(d: u32) -> DateKey {
        DateKey::from(NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
    }

    fn t(s: &str) -> TimeLabel {
        s.parse().unwrap()
    }

    #[test]
    fn booked_past_and_open_cells_never_enter_the_selection() {
        let (grid, now) = fixture();
        let mut sel = Selection::new();

        assert!(!sel.toggle(&grid, now, key(5), t("18:00")), "booked");
        assert!(!sel.toggle(&grid, now, key(1), t("09:00")), "past");
        assert!(!sel.toggle(&grid, now, key(5), t("19:00")), "already open");

        sel.drag_begin(&grid, now, key(5), t("18:00"));
        sel.drag_enter(&grid, now, key(1), t("09:00"));
        sel.drag_end();
        assert!(sel.is_empty());
    }

    #[test]
    fn toggle_adds_and_removes_empty_cells() {
        let (grid, now) = fixture();
        let mut sel = Selection::new();

        assert!(sel.toggle(&grid, now, key(4), t("10:00")));
        assert_eq!(sel.len(), 1);
        assert!(!sel.toggle(&grid, now, key(4), t("10:00")));
        assert!(sel.is_empty());
    }

    #[test]
    fn drag_adds_but_never_removes() {
        let (grid, now) = fixture();
        let mut sel = Selection::new();

        sel.drag_begin(&grid, now, key(4), t("10:00"));
        sel.drag_enter(&grid, now, key(4), t("10:30"));
        sel.drag_enter(&grid, now, key(4), t("10:00")); // re-enter: no toggle-off
        sel.drag_end();
        assert_eq!(sel.len(), 2);

        // Enter outside a drag is ignored.
        sel.drag_enter(&grid, now, key(4), t("11:00"));
        assert_eq!(sel.len(), 2);
    }

    #[test]
    fn band_select_only_touches_its_hours() {
        let (grid, now) = fixture();
        let labels = generate_time_slots();
        let mut sel = Selection::new();

        sel.select_band(&grid, now, &labels, TimeBand::Evening);
        for (k, time) in sel.iter() {
            assert!(TimeBand::Evening.contains(*time));
            assert_eq!(grid.cell_state(*k, *time, now), CellState::Empty);
        }
        // 11 evening labels (17:00..22:00) × 5 non-past days (Wed..Sun),
        // minus the booked 18:00 and open 19:00 on Friday.
        assert_eq!(sel.len(), 53);
        assert!(!sel.contains(key(5), t("18:00")));
        assert!(!sel.contains(key(5), t("19:00")));
    }

    #[test]
    fn clear_resets_cells_and_drag_state() {
        let (grid, now) = fixture();
        let mut sel = Selection::new();
        sel.drag_begin(&grid, now, key(4), t("10:00"));
        sel.clear();
        assert!(sel.is_empty());
        // Drag was reset too: enter without a new begin does nothing.
        sel.drag_enter(&grid, now, key(4), t("10:30"));
        assert!(sel.is_empty());
    }
}
