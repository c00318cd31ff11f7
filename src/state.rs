//! Application state: lesson store, availability slot store, export log,
//! object-storage client, export defaults, and the injected clock.
//!
//! This module owns:
//!   - the lesson list (config bank + built-in seeds, insertion-ordered)
//!   - the slot store used by the scheduling endpoints
//!   - the export-log rows appended after successful packages
//!   - the optional object store (uploads) and the wall clock

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::clock::{Clock, SystemClock};
use crate::config::{load_platform_config_from_env, ExportDefaults};
use crate::domain::{ExportLog, LessonRecord, Slide, TargetGroup};
use crate::seeds::seed_lessons;
use crate::storage::ObjectStore;
use crate::store::SlotStore;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub lessons: Arc<RwLock<Vec<LessonRecord>>>,
    pub slots: SlotStore,
    pub export_logs: Arc<RwLock<Vec<ExportLog>>>,
    pub object_store: Option<ObjectStore>,
    pub export_defaults: ExportDefaults,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Build state from env: load config, seed lessons, init the object
    /// store. Production entry point.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Same wiring with an injected clock; tests pin it to a fixed instant.
    #[instrument(level = "info", skip_all)]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let cfg_opt = load_platform_config_from_env();
        let export_defaults = cfg_opt
            .as_ref()
            .map(|c| c.export.clone())
            .unwrap_or_default();

        let mut lessons: Vec<LessonRecord> = Vec::new();

        // Insert config-bank lessons (if any) first; their slides arrive as
        // loose JSON tables and are normalized through the slide sum type.
        if let Some(cfg) = &cfg_opt {
            for lc in &cfg.lessons {
                let id = lc
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                lessons.push(LessonRecord {
                    id,
                    title: lc.title.clone(),
                    target_group: lc.target_group.unwrap_or(TargetGroup::Adults),
                    teacher_notes: lc.teacher_notes.clone(),
                    slides: lc.slides.iter().cloned().map(Slide::from).collect(),
                    created_at: clock.now(),
                });
            }
        }

        // Always append built-in seeds, but don't shadow config ids.
        for seed in seed_lessons() {
            if !lessons.iter().any(|l| l.id == seed.id) {
                lessons.push(seed);
            }
        }

        // Inventory summary by target group.
        let mut kids = 0usize;
        let mut teens = 0usize;
        let mut adults = 0usize;
        for lesson in &lessons {
            match lesson.target_group {
                TargetGroup::Kids => kids += 1,
                TargetGroup::Teens => teens += 1,
                TargetGroup::Adults => adults += 1,
            }
        }
        info!(target: "lingora_backend", total = lessons.len(), kids, teens, adults,
              "Startup lesson inventory");

        let object_store = ObjectStore::from_env();
        if let Some(store) = &object_store {
            info!(target: "export", base_url = %store.base_url, bucket = %store.bucket,
                  "Object storage enabled.");
        } else {
            info!(target: "export",
                  "Object storage disabled (no STORAGE_BASE_URL/STORAGE_API_KEY). Exports deliver inline.");
        }

        Self {
            lessons: Arc::new(RwLock::new(lessons)),
            slots: SlotStore::new(),
            export_logs: Arc::new(RwLock::new(Vec::new())),
            object_store,
            export_defaults,
            clock,
        }
    }

    /// Lessons matching the requested ids, in stored order. Unknown ids are
    /// skipped; the caller decides whether an empty result is an error.
    pub async fn lessons_by_ids(&self, ids: &[String]) -> Vec<LessonRecord> {
        let lessons = self.lessons.read().await;
        lessons
            .iter()
            .filter(|l| ids.contains(&l.id))
            .cloned()
            .collect()
    }

    pub async fn push_export_log(&self, log: ExportLog) {
        self.export_logs.write().await.push(log);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
