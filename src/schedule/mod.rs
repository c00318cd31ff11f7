//! Teacher availability scheduling: the calendar time grid, the week-grid
//! reducer over stored slot rows, the cell selection state machine, and the
//! batch slot writer (one-time and weekly-recurring).

pub mod batch;
pub mod grid;
pub mod selection;
pub mod timegrid;
