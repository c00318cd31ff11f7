//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs include parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::error::AppError;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state), fields(%q.teacher_id))]
pub async fn http_get_availability(
  State(state): State<Arc<AppState>>,
  Query(q): Query<AvailabilityQuery>,
) -> impl IntoResponse {
  let (week, grid) = load_week_grid(&state, &q.teacher_id, q.week_of).await;
  info!(target: "schedule", teacher = %q.teacher_id, week_start = %week[0],
        slots = grid.slot_count(), "HTTP availability served");
  Json(week_grid_out(&q.teacher_id, &week, &grid))
}

#[instrument(level = "info", skip(state, body), fields(%body.teacher_id, cells = body.slots.len()))]
pub async fn http_post_batch(
  State(state): State<Arc<AppState>>,
  Json(body): Json<BatchCreateIn>,
) -> Result<Json<BatchCreateOut>, AppError> {
  let out = create_slots_one_time(&state, body).await?;
  info!(target: "schedule", created = out.created, skipped = out.skipped_existing,
        "HTTP one-time batch finished");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(%body.teacher_id, cells = body.slots.len(), weeks = body.number_of_weeks))]
pub async fn http_post_recurring(
  State(state): State<Arc<AppState>>,
  Json(body): Json<RecurringCreateIn>,
) -> Result<Json<BatchCreateOut>, AppError> {
  let out = create_slots_recurring(&state, body).await?;
  info!(target: "schedule", created = out.created, planned = out.planned,
        "HTTP recurring batch finished");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state), fields(%id, %q.teacher_id))]
pub async fn http_delete_slot(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Query(q): Query<DeleteQuery>,
) -> Result<Json<DeletedOut>, AppError> {
  delete_slot(&state, &q.teacher_id, id).await?;
  Ok(Json(DeletedOut { deleted: true }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_lessons(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let lessons = state.lessons.read().await;
  let out: Vec<LessonSummaryOut> = lessons
    .iter()
    .map(|l| LessonSummaryOut {
      id: l.id.clone(),
      title: l.title.clone(),
      target_group: l.target_group,
      slide_count: l.slides.len(),
      created_at: l.created_at.to_rfc3339(),
    })
    .collect();
  Json(out)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_exports(
  State(state): State<Arc<AppState>>,
  Query(q): Query<ExportHistoryQuery>,
) -> impl IntoResponse {
  let logs = state.export_logs.read().await;
  let out: Vec<ExportLogOut> = logs
    .iter()
    .filter(|l| q.teacher_id.is_none() || l.teacher_id == q.teacher_id)
    .map(export_log_out)
    .collect();
  Json(out)
}

/// Export errors never propagate unhandled: they come back as a structured
/// `{ success: false, error }` body with HTTP 500. Upload failure is not an
/// error — it already degraded to inline delivery inside the logic.
#[instrument(level = "info", skip(state, body), fields(format = body.format.as_str(), lessons = body.lesson_ids.len()))]
pub async fn http_post_export(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ExportIn>,
) -> impl IntoResponse {
  match run_export(&state, body).await {
    Ok(out) => (StatusCode::OK, Json(out)).into_response(),
    Err(e) => {
      error!(target: "export", error = %e, "Export failed");
      (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "success": false, "error": e.to_string() })),
      )
        .into_response()
    }
  }
}
