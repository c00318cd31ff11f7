//! In-process availability slot store.
//!
//! This realizes the storage boundary the scheduling code depends on:
//! query by teacher + date range, insert/delete by id, and a batch insert
//! that enforces the same constraints a database would (uniqueness on
//! teacher + start instant, required teacher id, duration check). The batch
//! writer's pre-flight authorization also lives at this seam so a failed
//! check aborts with zero side effects.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::SlotRow;
use crate::schedule::batch::SlotRequest;
use crate::schedule::timegrid::slot_instant;

pub const ALLOWED_DURATIONS: [u32; 2] = [30, 60];

/// Fatal write failures. Duplicates are not here: they are skipped and
/// counted, never raised.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotWriteError {
    #[error("calendar belongs to another teacher")]
    PermissionDenied,
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("duration must be 30 or 60 minutes, got {0}")]
    InvalidDuration(u32),
    #[error("slot not found")]
    NotFound,
    #[error("slot is booked")]
    Booked,
}

/// Result of a batch insert: how many rows were written and how many were
/// skipped because an identical slot already existed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub created: usize,
    pub skipped_existing: usize,
}

#[derive(Clone, Default)]
pub struct SlotStore {
    rows: Arc<RwLock<HashMap<Uuid, SlotRow>>>,
}

impl SlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows for one teacher whose start instant falls in `[from, to)`,
    /// unordered (the grid builder buckets and sorts them).
    pub async fn query_range(
        &self,
        teacher_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Vec<SlotRow> {
        let rows = self.rows.read().await;
        rows.values()
            .filter(|r| r.teacher_id == teacher_id && r.start_time >= from && r.start_time < to)
            .cloned()
            .collect()
    }

    /// Insert the expanded creation requests for one teacher's calendar.
    ///
    /// Pre-flight: the acting identity must equal the calendar owner, and
    /// the duration/owner fields must be valid, before any row is written.
    /// Existing `(teacher, instant)` pairs are skipped and counted.
    #[instrument(level = "info", skip(self, requests), fields(%teacher_id, request_count = requests.len()))]
    pub async fn batch_insert(
        &self,
        acting_teacher_id: &str,
        teacher_id: &str,
        requests: &[SlotRequest],
        duration_minutes: u32,
    ) -> Result<BatchOutcome, SlotWriteError> {
        if teacher_id.trim().is_empty() {
            return Err(SlotWriteError::MissingField("teacherId"));
        }
        if acting_teacher_id != teacher_id {
            warn!(target: "schedule", %acting_teacher_id, %teacher_id, "Batch insert rejected before write");
            return Err(SlotWriteError::PermissionDenied);
        }
        if !ALLOWED_DURATIONS.contains(&duration_minutes) {
            return Err(SlotWriteError::InvalidDuration(duration_minutes));
        }

        let mut rows = self.rows.write().await;
        let mut outcome = BatchOutcome::default();
        for request in requests {
            let start = slot_instant(request.date, request.time);
            let exists = rows
                .values()
                .any(|r| r.teacher_id == teacher_id && r.start_time == start);
            if exists {
                outcome.skipped_existing += 1;
                continue;
            }
            let id = Uuid::new_v4();
            rows.insert(
                id,
                SlotRow {
                    id,
                    teacher_id: teacher_id.to_string(),
                    start_time: start,
                    duration_minutes,
                    is_available: true,
                    is_booked: false,
                    student_id: None,
                    student_name: None,
                    lesson_title: None,
                },
            );
            outcome.created += 1;
        }

        info!(target: "schedule", %teacher_id, created = outcome.created,
              skipped = outcome.skipped_existing, "Batch insert finished");
        Ok(outcome)
    }

    /// Delete one open slot. Booked slots refuse; past open slots may still
    /// be removed by their owner (pastness is a display state, not a lock).
    #[instrument(level = "info", skip(self), fields(%id))]
    pub async fn delete(&self, acting_teacher_id: &str, id: Uuid) -> Result<(), SlotWriteError> {
        let mut rows = self.rows.write().await;
        let row = rows.get(&id).ok_or(SlotWriteError::NotFound)?;
        if row.teacher_id != acting_teacher_id {
            return Err(SlotWriteError::PermissionDenied);
        }
        if row.is_booked {
            return Err(SlotWriteError::Booked);
        }
        rows.remove(&id);
        Ok(())
    }

    /// Booking is driven by an external flow; this hook lets tests and demo
    /// seeding place booked rows with their denormalized display fields.
    pub async fn mark_booked(
        &self,
        id: Uuid,
        student_id: &str,
        student_name: &str,
        lesson_title: &str,
    ) -> Result<(), SlotWriteError> {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id).ok_or(SlotWriteError::NotFound)?;
        row.is_booked = true;
        row.student_id = Some(student_id.to_string());
        row.student_name = Some(student_name.to_string());
        row.lesson_title = Some(lesson_title.to_string());
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::timegrid::TimeLabel;
    use chrono::NaiveDate;

    fn request(d: u32, time: &str) -> SlotRequest {
        SlotRequest {
            date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            time: time.parse::<TimeLabel>().unwrap(),
        }
    }

    #[tokio::test]
    async fn permission_mismatch_aborts_with_zero_side_effects() {
        let store = SlotStore::new();
        let err = store
            .batch_insert("intruder", "t1", &[request(8, "09:00")], 60)
            .await
            .unwrap_err();
        assert_eq!(err, SlotWriteError::PermissionDenied);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn invalid_duration_and_missing_teacher_are_fatal() {
        let store = SlotStore::new();
        assert_eq!(
            store
                .batch_insert("t1", "t1", &[request(8, "09:00")], 45)
                .await
                .unwrap_err(),
            SlotWriteError::InvalidDuration(45)
        );
        assert_eq!(
            store
                .batch_insert("", "", &[request(8, "09:00")], 60)
                .await
                .unwrap_err(),
            SlotWriteError::MissingField("teacherId")
        );
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn duplicates_are_skipped_not_fatal() {
        let store = SlotStore::new();
        let first = store
            .batch_insert("t1", "t1", &[request(8, "09:00"), request(8, "09:30")], 30)
            .await
            .unwrap();
        assert_eq!(first, BatchOutcome { created: 2, skipped_existing: 0 });

        let second = store
            .batch_insert("t1", "t1", &[request(8, "09:00"), request(8, "10:00")], 30)
            .await
            .unwrap();
        assert_eq!(second, BatchOutcome { created: 1, skipped_existing: 1 });
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn booked_slots_refuse_deletion() {
        let store = SlotStore::new();
        store
            .batch_insert("t1", "t1", &[request(8, "09:00")], 60)
            .await
            .unwrap();
        let row = store
            .query_range(
                "t1",
                DateTime::<Utc>::MIN_UTC,
                DateTime::<Utc>::MAX_UTC,
            )
            .await
            .pop()
            .unwrap();

        store.mark_booked(row.id, "s1", "Ana", "Unit 3").await.unwrap();
        assert_eq!(
            store.delete("t1", row.id).await.unwrap_err(),
            SlotWriteError::Booked
        );
        // Ownership is checked before booked state.
        assert_eq!(
            store.delete("other", row.id).await.unwrap_err(),
            SlotWriteError::PermissionDenied
        );
    }

    #[tokio::test]
    async fn query_range_is_half_open_and_teacher_scoped() {
        let store = SlotStore::new();
        store
            .batch_insert("t1", "t1", &[request(8, "09:00")], 60)
            .await
            .unwrap();
        store
            .batch_insert("t2", "t2", &[request(8, "09:00")], 60)
            .await
            .unwrap();

        let from = slot_instant(
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            "09:00".parse::<TimeLabel>().unwrap(),
        );
        let hit = store.query_range("t1", from, from + chrono::Duration::hours(1)).await;
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].teacher_id, "t1");
        // `to` bound is exclusive.
        let miss = store.query_range("t1", from + chrono::Duration::hours(1), from + chrono::Duration::hours(2)).await;
        assert!(miss.is_empty());
    }
}
