//! Curriculum export packager.
//!
//! Given stored lesson records and a target format (SCORM 2004 / H5P /
//! HTML5), synthesize the format's file tree, zip it, try to push the
//! archive to object storage, and fall back to inline base64 delivery when
//! the upload is unavailable or fails. A log row is recorded after every
//! successful build for the audit history.
//!
//! The three renderers share one rule: every slide of every exported lesson
//! must be referenced, with identical per-kind field access, so the formats
//! never drift apart in content.

pub mod h5p;
pub mod html5;
pub mod scorm;

use std::io::{Cursor, Write};

use base64::Engine;
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::{ExportFormat, ExportOptions, LessonRecord};
use crate::util::sanitize_file_stem;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no exportable lessons matched the requested ids")]
    NoLessons,
    #[error("archive assembly failed: {0}")]
    Archive(String),
}

/// One file inside the generated package tree.
#[derive(Debug)]
pub struct PackageEntry {
    pub path: String,
    pub bytes: Vec<u8>,
}

impl PackageEntry {
    pub fn text(path: impl Into<String>, body: impl Into<String>) -> Self {
        PackageEntry {
            path: path.into(),
            bytes: body.into().into_bytes(),
        }
    }
}

/// A fully rendered package, not yet zipped.
#[derive(Debug)]
pub struct BuiltPackage {
    pub file_name: String,
    pub entries: Vec<PackageEntry>,
}

/// How the finished archive reaches the caller.
pub enum Delivery {
    /// Public URL of the uploaded object.
    Url(String),
    /// Inline base64 fallback when upload is unavailable or failed.
    Inline(String),
}

/// Render the format's file tree for the given lessons.
#[instrument(level = "info", skip(lessons, options), fields(format = format.as_str(), lesson_count = lessons.len()))]
pub fn build_package(
    lessons: &[LessonRecord],
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<BuiltPackage, ExportError> {
    if lessons.is_empty() {
        return Err(ExportError::NoLessons);
    }

    let entries = match format {
        ExportFormat::Scorm => scorm::render(lessons, options),
        ExportFormat::H5p => h5p::render(lessons, options),
        ExportFormat::Html5 => html5::render(lessons, options),
    };

    // Stable name so idempotent re-exports overwrite the same storage path.
    let file_name = format!(
        "{}-{}.zip",
        sanitize_file_stem(&options.package_name),
        format.as_str()
    );

    info!(target: "export", %file_name, entry_count = entries.len(), "Package tree rendered");
    Ok(BuiltPackage { file_name, entries })
}

/// Zip the rendered tree with deflate compression.
pub fn zip_package(package: &BuiltPackage) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in &package.entries {
        zip.start_file(&entry.path, opts)
            .map_err(|e| ExportError::Archive(format!("start {}: {}", entry.path, e)))?;
        zip.write_all(&entry.bytes)
            .map_err(|e| ExportError::Archive(format!("write {}: {}", entry.path, e)))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| ExportError::Archive(format!("finalize: {e}")))?;
    Ok(cursor.into_inner())
}

/// Ship the archive: upload when an object store is configured, degrade to
/// inline base64 otherwise. Upload failure is a fallback, never an error.
pub async fn deliver(
    store: Option<&crate::storage::ObjectStore>,
    file_name: &str,
    archive: &[u8],
) -> Delivery {
    if let Some(store) = store {
        match store.upload(file_name, archive.to_vec()).await {
            Ok(url) => {
                info!(target: "export", %file_name, %url, "Archive uploaded");
                return Delivery::Url(url);
            }
            Err(e) => {
                warn!(target: "export", %file_name, error = %e,
                      "Upload failed; delivering archive inline as base64");
            }
        }
    }
    Delivery::Inline(base64::engine::general_purpose::STANDARD.encode(archive))
}

/// The JSON document the SCORM and HTML5 players load per lesson. Answer
/// keys and teacher notes are stripped here, in one place, so both formats
/// honor the options identically.
pub(crate) fn lesson_content_value(
    lesson: &LessonRecord,
    options: &ExportOptions,
) -> serde_json::Value {
    use crate::domain::Slide;

    let slides: Vec<serde_json::Value> = lesson
        .slides
        .iter()
        .map(|slide| {
            let mut v = slide.to_value();
            if !options.include_answer_keys {
                if let Some(map) = v.as_object_mut() {
                    match slide {
                        Slide::Exercise { .. } => {
                            if let Some(items) = map.get_mut("items").and_then(|i| i.as_array_mut())
                            {
                                for item in items {
                                    if let Some(obj) = item.as_object_mut() {
                                        obj.remove("answer");
                                    }
                                }
                            }
                        }
                        Slide::Quiz { .. } => {
                            if let Some(questions) =
                                map.get_mut("questions").and_then(|q| q.as_array_mut())
                            {
                                for question in questions {
                                    if let Some(obj) = question.as_object_mut() {
                                        obj.remove("correct");
                                    }
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
            v
        })
        .collect();

    let mut doc = serde_json::json!({
        "id": lesson.id,
        "title": lesson.title,
        "targetGroup": lesson.target_group,
        "slides": slides,
    });
    if options.include_teacher_notes {
        if let (Some(map), Some(notes)) = (doc.as_object_mut(), &lesson.teacher_notes) {
            map.insert("teacherNotes".into(), serde_json::json!(notes));
        }
    }
    doc
}
