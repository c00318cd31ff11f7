//! End-to-end export checks: run the packager through the real state and
//! inspect the produced zip archives.

use std::io::{Cursor, Read};
use std::sync::Arc;

use base64::Engine;
use chrono::{TimeZone, Utc};

use lingora_backend::clock::FixedClock;
use lingora_backend::domain::ExportFormat;
use lingora_backend::logic::run_export;
use lingora_backend::protocol::{ExportIn, ExportOptionsIn};
use lingora_backend::state::AppState;

fn state() -> AppState {
    AppState::with_clock(Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0)
            .single()
            .expect("fixed instant"),
    )))
}

async fn export_archive(format: ExportFormat) -> zip::ZipArchive<Cursor<Vec<u8>>> {
    let out = run_export(
        &state(),
        ExportIn {
            teacher_id: None,
            lesson_ids: vec!["l-daily-routines".into(), "l-ordering-food".into()],
            format,
            options: ExportOptionsIn::default(),
        },
    )
    .await
    .expect("export");

    assert!(out.success);
    assert_eq!(out.lesson_count, 2);
    // No object store configured: delivery degrades to inline base64.
    let data = out.download_data.expect("inline data");
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(data)
        .expect("valid base64");
    assert_eq!(bytes.len(), out.file_size_bytes);
    zip::ZipArchive::new(Cursor::new(bytes)).expect("open zip archive")
}

fn read_entry(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
    let mut body = String::new();
    archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("entry {name}"))
        .read_to_string(&mut body)
        .expect("read entry");
    body
}

#[tokio::test]
async fn scorm_archive_contains_manifest_scos_and_every_slide() {
    let mut archive = export_archive(ExportFormat::Scorm).await;

    let manifest = read_entry(&mut archive, "imsmanifest.xml");
    assert!(manifest.contains("<schemaversion>2004 4th Edition</schemaversion>"));
    for n in 1..=2 {
        assert!(manifest.contains(&format!("ITEM_{n}")));
        assert!(manifest.contains(&format!("RES_{n}")));
    }

    archive.by_name("shared/scorm-api.js").expect("api shim");
    archive.by_name("shared/player.js").expect("player");

    // Lesson 1 carries one slide of every kind; all must be referenced.
    let lesson = read_entry(&mut archive, "lesson_1.json");
    for kind in ["vocabulary", "grammar", "exercise", "quiz", "dialogue"] {
        assert!(lesson.contains(&format!("\"type\": \"{kind}\"")), "{kind}");
    }
}

#[tokio::test]
async fn h5p_archive_flattens_slides_and_normalizes_blanks() {
    let mut archive = export_archive(ExportFormat::H5p).await;

    let manifest = read_entry(&mut archive, "h5p.json");
    assert!(manifest.contains("H5P.CoursePresentation"));

    let content = read_entry(&mut archive, "content/content.json");
    // 5 slides from lesson 1 + 2 from lesson 2.
    let deck: serde_json::Value = serde_json::from_str(&content).expect("content json");
    assert_eq!(deck["presentation"]["slides"].as_array().expect("slides").len(), 7);

    // All three source blank notations end up as the starred answers.
    assert!(content.contains("*goes*"));
    assert!(content.contains("*eats*"));
    assert!(content.contains("*watch*"));
    assert!(!content.contains("[blank]"));
    assert!(!content.contains("[___]"));
}

#[tokio::test]
async fn html5_archive_is_self_contained() {
    let mut archive = export_archive(ExportFormat::Html5).await;

    let index = read_entry(&mut archive, "index.html");
    assert!(index.contains("Daily Routines"));
    assert!(index.contains("Ordering Food"));
    assert!(index.contains("lessons/lesson_1.json"));
    assert!(index.contains("lessons/lesson_2.json"));

    archive.by_name("manifest.webmanifest").expect("manifest");
    archive.by_name("shared/player.js").expect("player");
    archive.by_name("shared/style.css").expect("styles");
    let lesson = read_entry(&mut archive, "lessons/lesson_1.json");
    for kind in ["vocabulary", "grammar", "exercise", "quiz", "dialogue"] {
        assert!(lesson.contains(&format!("\"type\": \"{kind}\"")), "{kind}");
    }
}

#[tokio::test]
async fn export_options_control_answer_keys() {
    let out = run_export(
        &state(),
        ExportIn {
            teacher_id: None,
            lesson_ids: vec!["l-daily-routines".into()],
            format: ExportFormat::Html5,
            options: ExportOptionsIn {
                include_answer_keys: Some(false),
                include_teacher_notes: Some(false),
                package_name: Some("no answers".into()),
                course_title: None,
            },
        },
    )
    .await
    .expect("export");

    assert_eq!(out.file_name, "no-answers-html5.zip");
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(out.download_data.expect("inline data"))
        .expect("valid base64");
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("zip");
    let lesson = read_entry(&mut archive, "lessons/lesson_1.json");
    assert!(!lesson.contains("\"answer\""));
    assert!(!lesson.contains("\"correct\""));
    assert!(!lesson.contains("teacherNotes"));
}

#[tokio::test]
async fn unknown_lessons_only_yield_a_structured_error() {
    let err = run_export(
        &state(),
        ExportIn {
            teacher_id: None,
            lesson_ids: vec!["does-not-exist".into()],
            format: ExportFormat::Scorm,
            options: ExportOptionsIn::default(),
        },
    )
    .await
    .expect_err("no lessons");
    assert!(err.to_string().contains("no exportable lessons"));
}
