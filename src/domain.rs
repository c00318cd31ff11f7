//! Domain models: availability slot rows, lesson records with polymorphic
//! slides, and export bookkeeping.
//!
//! Slides arrive from config banks and stored lesson content as loosely
//! tagged JSON (`type` field). We normalize them into a sum type with an
//! explicit raw fallback so the SCORM/H5P/HTML5 renderers can pattern-match
//! exhaustively instead of probing untyped properties.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One stored row on a teacher's calendar. Display state (open/booked/past)
/// is derived at read time, never stored.
#[derive(Clone, Debug, Serialize)]
pub struct SlotRow {
    pub id: Uuid,
    pub teacher_id: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: u32,
    pub is_available: bool,
    pub is_booked: bool,
    pub student_id: Option<String>,
    pub student_name: Option<String>,
    pub lesson_title: Option<String>,
}

/// Audience key carried on lessons (the front-end styles by it; we keep it
/// as plain data).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetGroup {
    Kids,
    Teens,
    Adults,
}

impl Default for TargetGroup {
    fn default() -> Self {
        TargetGroup::Adults
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VocabWord {
    pub word: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// One fill-in-the-blank item. The sentence may use any of the supported
/// blank notations (`__`, `[blank]`, `[___]`); renderers normalize.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlankItem {
    pub sentence: String,
    pub answer: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: String,
    pub text: String,
}

/// Polymorphic lesson slide. The `raw` variant preserves anything we do not
/// recognize so exports degrade gracefully instead of dropping content.
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "Value")]
pub enum Slide {
    Vocabulary {
        title: String,
        words: Vec<VocabWord>,
    },
    Grammar {
        title: String,
        explanation: String,
        examples: Vec<String>,
    },
    Exercise {
        title: String,
        instructions: String,
        items: Vec<BlankItem>,
    },
    Quiz {
        title: String,
        questions: Vec<QuizQuestion>,
    },
    Dialogue {
        title: String,
        lines: Vec<DialogueLine>,
    },
    Raw(Value),
}

impl Slide {
    /// Human-readable kind tag, also used as the wire `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Slide::Vocabulary { .. } => "vocabulary",
            Slide::Grammar { .. } => "grammar",
            Slide::Exercise { .. } => "exercise",
            Slide::Quiz { .. } => "quiz",
            Slide::Dialogue { .. } => "dialogue",
            Slide::Raw(_) => "raw",
        }
    }

    /// Slide heading for players and tables of contents.
    pub fn title(&self) -> &str {
        match self {
            Slide::Vocabulary { title, .. }
            | Slide::Grammar { title, .. }
            | Slide::Exercise { title, .. }
            | Slide::Quiz { title, .. }
            | Slide::Dialogue { title, .. } => title,
            Slide::Raw(_) => "Content",
        }
    }

    /// Re-emit the tagged JSON form consumed by the bundled players.
    pub fn to_value(&self) -> Value {
        fn tagged(kind: &str, mut body: Value) -> Value {
            if let Some(map) = body.as_object_mut() {
                map.insert("type".into(), Value::String(kind.into()));
            }
            body
        }
        match self {
            Slide::Vocabulary { title, words } => tagged(
                "vocabulary",
                serde_json::json!({ "title": title, "words": words }),
            ),
            Slide::Grammar {
                title,
                explanation,
                examples,
            } => tagged(
                "grammar",
                serde_json::json!({ "title": title, "explanation": explanation, "examples": examples }),
            ),
            Slide::Exercise {
                title,
                instructions,
                items,
            } => tagged(
                "exercise",
                serde_json::json!({ "title": title, "instructions": instructions, "items": items }),
            ),
            Slide::Quiz { title, questions } => tagged(
                "quiz",
                serde_json::json!({ "title": title, "questions": questions }),
            ),
            Slide::Dialogue { title, lines } => tagged(
                "dialogue",
                serde_json::json!({ "title": title, "lines": lines }),
            ),
            Slide::Raw(v) => v.clone(),
        }
    }
}

impl Serialize for Slide {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl From<Value> for Slide {
    fn from(v: Value) -> Self {
        #[derive(Deserialize)]
        struct VocabularyBody {
            title: String,
            words: Vec<VocabWord>,
        }
        #[derive(Deserialize)]
        struct GrammarBody {
            title: String,
            explanation: String,
            #[serde(default)]
            examples: Vec<String>,
        }
        #[derive(Deserialize)]
        struct ExerciseBody {
            title: String,
            #[serde(default)]
            instructions: String,
            items: Vec<BlankItem>,
        }
        #[derive(Deserialize)]
        struct QuizBody {
            title: String,
            questions: Vec<QuizQuestion>,
        }
        #[derive(Deserialize)]
        struct DialogueBody {
            title: String,
            lines: Vec<DialogueLine>,
        }

        let tag = v.get("type").and_then(Value::as_str).unwrap_or_default();
        let parsed = match tag {
            "vocabulary" => serde_json::from_value::<VocabularyBody>(v.clone())
                .ok()
                .map(|b| Slide::Vocabulary {
                    title: b.title,
                    words: b.words,
                }),
            "grammar" => serde_json::from_value::<GrammarBody>(v.clone())
                .ok()
                .map(|b| Slide::Grammar {
                    title: b.title,
                    explanation: b.explanation,
                    examples: b.examples,
                }),
            // Two source conventions for the same slide kind.
            "exercise" | "fill-in-blank" => serde_json::from_value::<ExerciseBody>(v.clone())
                .ok()
                .map(|b| Slide::Exercise {
                    title: b.title,
                    instructions: b.instructions,
                    items: b.items,
                }),
            "quiz" | "multiple-choice" => serde_json::from_value::<QuizBody>(v.clone())
                .ok()
                .map(|b| Slide::Quiz {
                    title: b.title,
                    questions: b.questions,
                }),
            "dialogue" => serde_json::from_value::<DialogueBody>(v.clone())
                .ok()
                .map(|b| Slide::Dialogue {
                    title: b.title,
                    lines: b.lines,
                }),
            _ => None,
        };
        parsed.unwrap_or(Slide::Raw(v))
    }
}

/// Stored lesson content plus metadata needed by the export picker.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LessonRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub target_group: TargetGroup,
    #[serde(default)]
    pub teacher_notes: Option<String>,
    pub slides: Vec<Slide>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Scorm,
    H5p,
    Html5,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Scorm => "scorm",
            ExportFormat::H5p => "h5p",
            ExportFormat::Html5 => "html5",
        }
    }
}

/// Options accepted by the export endpoint; defaults come from config.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportOptions {
    #[serde(rename = "includeTeacherNotes")]
    pub include_teacher_notes: bool,
    #[serde(rename = "includeAnswerKeys")]
    pub include_answer_keys: bool,
    #[serde(rename = "packageName")]
    pub package_name: String,
    #[serde(rename = "courseTitle")]
    pub course_title: String,
}

/// Audit row recorded after every successful package build.
#[derive(Clone, Debug, Serialize)]
pub struct ExportLog {
    pub id: Uuid,
    /// Requesting teacher, when the dashboard sends one.
    pub teacher_id: Option<String>,
    pub format: ExportFormat,
    pub lesson_count: usize,
    pub file_name: String,
    pub storage_path: Option<String>,
    pub file_size_bytes: usize,
    pub options: ExportOptions,
    pub created_at: DateTime<Utc>,
}
