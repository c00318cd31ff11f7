//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - Loading and rebuilding the visible week grid
//!   - Validating batch requests through the selection machine
//!   - One-time and weekly-recurring slot creation (write, wait, reload)
//!   - Running curriculum exports end to end (render, zip, deliver, log)

use chrono::{Duration, NaiveDate};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::{ExportLog, ExportOptions};
use crate::error::AppError;
use crate::export::{build_package, deliver, zip_package, Delivery, ExportError};
use crate::protocol::{
  week_grid_out, BatchCreateIn, BatchCreateOut, CellIn, ExportIn, ExportOut, RecurringCreateIn,
  WeekGridOut,
};
use crate::schedule::batch::{expand_recurring, one_time_requests, preview_count, SlotRequest};
use crate::schedule::grid::{build_week_grid, CellState, WeekGrid};
use crate::schedule::selection::Selection;
use crate::schedule::timegrid::{get_week_dates, slot_instant, DateKey, TimeLabel};
use crate::state::AppState;

/// Tolerance for storage read-after-write latency: the post-write reload
/// waits this long so the returned grid reflects the write.
const READ_AFTER_WRITE_DELAY_MS: u64 = 150;

/// Query the store for one teacher's visible week and reduce it to a grid.
pub async fn load_week_grid(
  state: &AppState,
  teacher_id: &str,
  week_of: Option<DateKey>,
) -> ([NaiveDate; 7], WeekGrid) {
  let now = state.clock.now();
  let reference = week_of
    .map(|k| k.date())
    .unwrap_or_else(|| now.date_naive());
  let week = get_week_dates(reference);

  // Query bounds equal grid bounds; the grid builder warns if they drift.
  let from = week[0].and_hms_opt(0, 0, 0).map(|t| t.and_utc());
  let to = (week[6] + Duration::days(1))
    .and_hms_opt(0, 0, 0)
    .map(|t| t.and_utc());
  let rows = match (from, to) {
    (Some(from), Some(to)) => state.slots.query_range(teacher_id, from, to).await,
    _ => Vec::new(),
  };

  let grid = build_week_grid(&week, &rows, now);
  (week, grid)
}

/// Run the requested cells through the selection machine against the
/// authoritative grid. Booked/past cells are a hard conflict. Already-open
/// cells are returned separately: they never enter the selection, but
/// recurring mode still projects them into future weeks.
fn validate_cells(
  grid: &WeekGrid,
  now: chrono::DateTime<chrono::Utc>,
  cells: &[CellIn],
) -> Result<(Selection, Vec<(DateKey, TimeLabel)>), AppError> {
  let mut selection = Selection::new();
  let mut already_open = Vec::new();
  for cell in cells {
    match grid.cell_state(cell.date, cell.time, now) {
      CellState::Booked => {
        return Err(AppError::Conflict(format!(
          "slot {} {} is already booked",
          cell.date, cell.time
        )));
      }
      CellState::Past => {
        return Err(AppError::Conflict(format!(
          "slot {} {} is in the past",
          cell.date, cell.time
        )));
      }
      CellState::Open => already_open.push((cell.date, cell.time)),
      CellState::Empty => {
        selection.toggle(grid, now, cell.date, cell.time);
      }
    }
  }
  Ok((selection, already_open))
}

async fn write_and_reload(
  state: &AppState,
  acting_teacher_id: &str,
  teacher_id: &str,
  requests: &[SlotRequest],
  duration_minutes: u32,
  planned: usize,
  pre_skipped: usize,
  reload_week_of: DateKey,
) -> Result<BatchCreateOut, AppError> {
  let outcome = state
    .slots
    .batch_insert(acting_teacher_id, teacher_id, requests, duration_minutes)
    .await?;

  // Re-derive booked/open/past from the authoritative store instead of
  // patching local state; the short wait tolerates read-after-write lag.
  tokio::time::sleep(std::time::Duration::from_millis(READ_AFTER_WRITE_DELAY_MS)).await;
  let (week, grid) = load_week_grid(state, teacher_id, Some(reload_week_of)).await;

  let skipped = outcome.skipped_existing + pre_skipped;
  let message = if skipped > 0 {
    format!(
      "{} slots created; {} already existed and were skipped",
      outcome.created, skipped
    )
  } else {
    format!("{} slots created", outcome.created)
  };

  Ok(BatchCreateOut {
    created: outcome.created,
    skipped_existing: skipped,
    planned,
    message,
    grid: week_grid_out(teacher_id, &week, &grid),
  })
}

/// One-time mode: create exactly the selected cells of the visible week.
#[instrument(level = "info", skip(state, body), fields(%body.teacher_id, cells = body.slots.len()))]
pub async fn create_slots_one_time(
  state: &AppState,
  body: BatchCreateIn,
) -> Result<BatchCreateOut, AppError> {
  if body.slots.is_empty() {
    return Err(AppError::BadRequest("no slots selected".into()));
  }
  let first = body.slots[0].date;
  let (_, grid) = load_week_grid(state, &body.teacher_id, Some(first)).await;
  let now = state.clock.now();
  let (selection, already_open) = validate_cells(&grid, now, &body.slots)?;

  let cells: Vec<(DateKey, TimeLabel)> = selection.iter().copied().collect();
  let requests = one_time_requests(&cells);
  let planned = requests.len() + already_open.len();
  info!(target: "schedule", teacher = %body.teacher_id, planned, "One-time batch prepared");

  write_and_reload(
    state,
    &body.acting_teacher_id,
    &body.teacher_id,
    &requests,
    body.duration_minutes,
    planned,
    already_open.len(),
    first,
  )
  .await
}

/// Weekly-recurring mode: project the visible week's selection forward.
#[instrument(level = "info", skip(state, body), fields(%body.teacher_id, cells = body.slots.len(), weeks = body.number_of_weeks))]
pub async fn create_slots_recurring(
  state: &AppState,
  body: RecurringCreateIn,
) -> Result<BatchCreateOut, AppError> {
  if body.slots.is_empty() {
    return Err(AppError::BadRequest("no slots selected".into()));
  }
  if body.number_of_weeks == 0 || body.number_of_weeks > 26 {
    return Err(AppError::BadRequest(
      "numberOfWeeks must be between 1 and 26".into(),
    ));
  }

  let (week, grid) = load_week_grid(state, &body.teacher_id, Some(body.week_start)).await;
  let now = state.clock.now();
  let (selection, already_open) = validate_cells(&grid, now, &body.slots)?;

  // Open cells recur too; the store skips their week-0 duplicates.
  let mut cells: Vec<(DateKey, TimeLabel)> = selection.iter().copied().collect();
  cells.extend(already_open);
  // The preview the UI shows before submitting: |selection| × weeks.
  let planned = preview_count(cells.len(), body.number_of_weeks);
  let requests = expand_recurring(&cells, week[0], body.number_of_weeks);
  info!(target: "schedule", teacher = %body.teacher_id, planned,
        expanded = requests.len(), "Recurring batch prepared");

  write_and_reload(
    state,
    &body.acting_teacher_id,
    &body.teacher_id,
    &requests,
    body.duration_minutes,
    planned,
    0,
    body.week_start,
  )
  .await
}

/// Delete one open slot from the acting teacher's own calendar.
pub async fn delete_slot(state: &AppState, acting_teacher_id: &str, id: Uuid) -> Result<(), AppError> {
  state.slots.delete(acting_teacher_id, id).await?;
  info!(target: "schedule", %id, "Slot deleted");
  Ok(())
}

/// Run one export end to end. Any failure is returned as a structured
/// error; the handler maps it to `{ success: false, error }`.
#[instrument(level = "info", skip(state, body), fields(format = body.format.as_str(), requested = body.lesson_ids.len()))]
pub async fn run_export(state: &AppState, body: ExportIn) -> Result<ExportOut, ExportError> {
  let lessons = state.lessons_by_ids(&body.lesson_ids).await;
  if lessons.len() < body.lesson_ids.len() {
    warn!(target: "export", requested = body.lesson_ids.len(), found = lessons.len(),
          "Some requested lessons were not found and will be omitted");
  }

  let defaults = &state.export_defaults;
  let options = ExportOptions {
    include_teacher_notes: body
      .options
      .include_teacher_notes
      .unwrap_or(defaults.include_teacher_notes),
    include_answer_keys: body
      .options
      .include_answer_keys
      .unwrap_or(defaults.include_answer_keys),
    package_name: body
      .options
      .package_name
      .clone()
      .unwrap_or_else(|| defaults.package_name.clone()),
    course_title: body
      .options
      .course_title
      .clone()
      .unwrap_or_else(|| defaults.course_title.clone()),
  };

  let package = build_package(&lessons, body.format, &options)?;
  let archive = zip_package(&package)?;
  let file_size_bytes = archive.len();

  let delivery = deliver(state.object_store.as_ref(), &package.file_name, &archive).await;
  let (download_url, download_data, storage_path) = match delivery {
    Delivery::Url(url) => (Some(url.clone()), None, Some(url)),
    Delivery::Inline(data) => (None, Some(data), None),
  };

  state
    .push_export_log(ExportLog {
      id: Uuid::new_v4(),
      teacher_id: body.teacher_id.clone(),
      format: body.format,
      lesson_count: lessons.len(),
      file_name: package.file_name.clone(),
      storage_path,
      file_size_bytes,
      options,
      created_at: state.clock.now(),
    })
    .await;

  info!(target: "export", file = %package.file_name, size = file_size_bytes,
        lessons = lessons.len(), "Export finished");

  Ok(ExportOut {
    success: true,
    download_url,
    download_data,
    file_name: package.file_name,
    format: body.format,
    lesson_count: lessons.len(),
    file_size_bytes,
  })
}
