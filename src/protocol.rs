//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{ExportFormat, ExportLog, TargetGroup};
use crate::schedule::grid::{GridSlot, SlotStatus, WeekGrid};
use crate::schedule::timegrid::{
    day_date, day_name, format_week_range, generate_time_slots, DateKey, TimeLabel,
};
use chrono::NaiveDate;

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

//
// Availability grid
//

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    #[serde(rename = "teacherId")]
    pub teacher_id: String,
    /// Any date inside the requested week; defaults to today.
    #[serde(rename = "weekOf")]
    pub week_of: Option<DateKey>,
}

#[derive(Debug, Serialize)]
pub struct SlotOut {
    pub id: String,
    pub time: TimeLabel,
    #[serde(rename = "durationMinutes")]
    pub duration_minutes: u32,
    pub status: SlotStatus,
    #[serde(rename = "studentName", skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(rename = "lessonTitle", skip_serializing_if = "Option::is_none")]
    pub lesson_title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DayOut {
    pub date: DateKey,
    #[serde(rename = "dayName")]
    pub day_name: &'static str,
    #[serde(rename = "dayLabel")]
    pub day_label: String,
    pub slots: Vec<SlotOut>,
}

#[derive(Debug, Serialize)]
pub struct WeekGridOut {
    #[serde(rename = "teacherId")]
    pub teacher_id: String,
    #[serde(rename = "weekStart")]
    pub week_start: DateKey,
    #[serde(rename = "weekLabel")]
    pub week_label: String,
    #[serde(rename = "timeLabels")]
    pub time_labels: Vec<TimeLabel>,
    pub days: Vec<DayOut>,
}

fn slot_out(slot: &GridSlot) -> SlotOut {
    SlotOut {
        id: slot.id.to_string(),
        time: slot.time,
        duration_minutes: slot.duration_minutes,
        status: slot.status,
        student_name: slot.student_name.clone(),
        lesson_title: slot.lesson_title.clone(),
    }
}

/// Convert the internal grid to the public DTO.
pub fn week_grid_out(teacher_id: &str, week: &[NaiveDate; 7], grid: &WeekGrid) -> WeekGridOut {
    let days = week
        .iter()
        .map(|date| {
            let key = DateKey::from(*date);
            let slots = grid
                .days()
                .get(&key)
                .map(|slots| slots.iter().map(slot_out).collect())
                .unwrap_or_default();
            DayOut {
                date: key,
                day_name: day_name(*date),
                day_label: day_date(*date),
                slots,
            }
        })
        .collect();

    WeekGridOut {
        teacher_id: teacher_id.to_string(),
        week_start: DateKey::from(week[0]),
        week_label: format_week_range(week),
        time_labels: generate_time_slots(),
        days,
    }
}

//
// Batch creation
//

#[derive(Debug, Deserialize)]
pub struct CellIn {
    pub date: DateKey,
    pub time: TimeLabel,
}

#[derive(Debug, Deserialize)]
pub struct BatchCreateIn {
    /// Identity performing the write; must equal `teacherId`.
    #[serde(rename = "actingTeacherId")]
    pub acting_teacher_id: String,
    #[serde(rename = "teacherId")]
    pub teacher_id: String,
    pub slots: Vec<CellIn>,
    #[serde(rename = "durationMinutes")]
    pub duration_minutes: u32,
}

#[derive(Debug, Deserialize)]
pub struct RecurringCreateIn {
    #[serde(rename = "actingTeacherId")]
    pub acting_teacher_id: String,
    #[serde(rename = "teacherId")]
    pub teacher_id: String,
    pub slots: Vec<CellIn>,
    #[serde(rename = "durationMinutes")]
    pub duration_minutes: u32,
    /// Any date inside the anchor week (usually the visible week's Monday).
    #[serde(rename = "weekStart")]
    pub week_start: DateKey,
    #[serde(rename = "numberOfWeeks")]
    pub number_of_weeks: u32,
}

#[derive(Debug, Serialize)]
pub struct BatchCreateOut {
    pub created: usize,
    #[serde(rename = "skippedExisting")]
    pub skipped_existing: usize,
    pub planned: usize,
    pub message: String,
    /// Authoritative grid re-read after the write.
    pub grid: WeekGridOut,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(rename = "teacherId")]
    pub teacher_id: String,
}

#[derive(Serialize)]
pub struct DeletedOut {
    pub deleted: bool,
}

//
// Lessons and exports
//

#[derive(Serialize)]
pub struct LessonSummaryOut {
    pub id: String,
    pub title: String,
    #[serde(rename = "targetGroup")]
    pub target_group: TargetGroup,
    #[serde(rename = "slideCount")]
    pub slide_count: usize,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportIn {
    /// Requesting teacher; attributed on the export-log row when present.
    #[serde(rename = "teacherId", default)]
    pub teacher_id: Option<String>,
    #[serde(rename = "lessonIds")]
    pub lesson_ids: Vec<String>,
    pub format: ExportFormat,
    #[serde(default)]
    pub options: ExportOptionsIn,
}

/// Partial options; anything omitted falls back to configured defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ExportOptionsIn {
    #[serde(rename = "includeTeacherNotes")]
    pub include_teacher_notes: Option<bool>,
    #[serde(rename = "includeAnswerKeys")]
    pub include_answer_keys: Option<bool>,
    #[serde(rename = "packageName")]
    pub package_name: Option<String>,
    #[serde(rename = "courseTitle")]
    pub course_title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExportOut {
    pub success: bool,
    #[serde(rename = "downloadUrl", skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(rename = "downloadData", skip_serializing_if = "Option::is_none")]
    pub download_data: Option<String>,
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub format: ExportFormat,
    #[serde(rename = "lessonCount")]
    pub lesson_count: usize,
    #[serde(rename = "fileSizeBytes")]
    pub file_size_bytes: usize,
}

#[derive(Debug, Deserialize)]
pub struct ExportHistoryQuery {
    #[serde(rename = "teacherId")]
    pub teacher_id: Option<String>,
}

#[derive(Serialize)]
pub struct ExportLogOut {
    pub id: String,
    #[serde(rename = "teacherId", skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    pub format: ExportFormat,
    #[serde(rename = "lessonCount")]
    pub lesson_count: usize,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "storagePath", skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
    #[serde(rename = "fileSizeBytes")]
    pub file_size_bytes: usize,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

pub fn export_log_out(log: &ExportLog) -> ExportLogOut {
    ExportLogOut {
        id: log.id.to_string(),
        teacher_id: log.teacher_id.clone(),
        format: log.format,
        lesson_count: log.lesson_count,
        file_name: log.file_name.clone(),
        storage_path: log.storage_path.clone(),
        file_size_bytes: log.file_size_bytes,
        created_at: log.created_at.to_rfc3339(),
    }
}
