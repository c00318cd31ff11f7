//! H5P package renderer.
//!
//! Layout:
//!   h5p.json                 package manifest; main library is
//!                            H5P.CoursePresentation with pinned sub-library
//!                            versions
//!   content/content.json     every lesson's slides flattened into a single
//!                            deck; one action element per slide content
//!
//! Slide mapping: vocabulary/grammar/dialogue → H5P.AdvancedText, exercise →
//! H5P.Blanks, quiz → H5P.MultiChoice (one element per question). Unknown
//! slides degrade to an AdvancedText JSON dump rather than vanishing.

use serde_json::{json, Value};

use crate::domain::{ExportOptions, LessonRecord, Slide};
use crate::export::PackageEntry;
use crate::util::escape_html;

// Library pins. h5p.json requires exact major/minor numbers; bumping one
// means revalidating the content schema against that library version.
const MAIN_LIBRARY: (&str, u32, u32) = ("H5P.CoursePresentation", 1, 24);
const LIB_ADVANCED_TEXT: (&str, u32, u32) = ("H5P.AdvancedText", 1, 1);
const LIB_BLANKS: (&str, u32, u32) = ("H5P.Blanks", 1, 14);
const LIB_MULTI_CHOICE: (&str, u32, u32) = ("H5P.MultiChoice", 1, 16);

pub fn render(lessons: &[LessonRecord], options: &ExportOptions) -> Vec<PackageEntry> {
    vec![
        PackageEntry::text(
            "h5p.json",
            serde_json::to_string_pretty(&package_manifest(&options.course_title))
                .unwrap_or_else(|_| "{}".into()),
        ),
        PackageEntry::text(
            "content/content.json",
            serde_json::to_string_pretty(&content_json(lessons))
                .unwrap_or_else(|_| "{}".into()),
        ),
    ]
}

fn library_dependency((name, major, minor): (&str, u32, u32)) -> Value {
    json!({
        "machineName": name,
        "majorVersion": major,
        "minorVersion": minor,
    })
}

fn library_tag((name, major, minor): (&str, u32, u32)) -> String {
    format!("{name} {major}.{minor}")
}

fn package_manifest(course_title: &str) -> Value {
    json!({
        "title": course_title,
        "language": "en",
        "mainLibrary": MAIN_LIBRARY.0,
        "embedTypes": ["div"],
        "license": "U",
        "defaultLanguage": "en",
        "preloadedDependencies": [
            library_dependency(MAIN_LIBRARY),
            library_dependency(LIB_ADVANCED_TEXT),
            library_dependency(LIB_BLANKS),
            library_dependency(LIB_MULTI_CHOICE),
        ],
    })
}

/// Flatten all lessons into one CoursePresentation slide deck.
fn content_json(lessons: &[LessonRecord]) -> Value {
    let mut slides = Vec::new();
    for lesson in lessons {
        for slide in &lesson.slides {
            slides.push(json!({
                "elements": slide_elements(slide),
                "keywords": [{ "main": slide.title() }],
            }));
        }
    }

    json!({
        "presentation": {
            "slides": slides,
            "keywordListEnabled": true,
            "keywordListAlwaysShow": false,
        },
        "override": { "activeSurface": false, "hideSummarySlide": false },
    })
}

/// Full-slide element placement shared by every action.
fn element(action: Value) -> Value {
    json!({
        "x": 0, "y": 0, "width": 100, "height": 100,
        "action": action,
    })
}

fn advanced_text(html: String) -> Value {
    json!({
        "library": library_tag(LIB_ADVANCED_TEXT),
        "params": { "text": html },
        "subContentId": "",
    })
}

fn slide_elements(slide: &Slide) -> Vec<Value> {
    match slide {
        Slide::Vocabulary { title, words } => {
            let mut html = format!("<h2>{}</h2><table>", escape_html(title));
            for w in words {
                html.push_str(&format!(
                    "<tr><td><strong>{}</strong></td><td>{}</td><td><em>{}</em></td></tr>",
                    escape_html(&w.word),
                    escape_html(&w.translation),
                    escape_html(w.example.as_deref().unwrap_or("")),
                ));
            }
            html.push_str("</table>");
            vec![element(advanced_text(html))]
        }
        Slide::Grammar {
            title,
            explanation,
            examples,
        } => {
            let mut html = format!(
                "<h2>{}</h2><p>{}</p><ul>",
                escape_html(title),
                escape_html(explanation)
            );
            for ex in examples {
                html.push_str(&format!("<li>{}</li>", escape_html(ex)));
            }
            html.push_str("</ul>");
            vec![element(advanced_text(html))]
        }
        Slide::Exercise {
            title,
            instructions,
            items,
        } => {
            let questions: Vec<Value> = items
                .iter()
                .map(|item| {
                    json!(format!(
                        "<p>{}</p>",
                        normalize_blanks(&item.sentence, &item.answer)
                    ))
                })
                .collect();
            vec![element(json!({
                "library": library_tag(LIB_BLANKS),
                "params": {
                    "text": format!("<p>{}</p>", escape_html(instructions)),
                    "questions": questions,
                    "behaviour": { "caseSensitive": false, "showSolutionsRequiresInput": true },
                },
                "subContentId": "",
                "metadata": { "title": title },
            }))]
        }
        Slide::Quiz { questions, .. } => questions
            .iter()
            .map(|q| {
                let answers: Vec<Value> = q
                    .options
                    .iter()
                    .enumerate()
                    .map(|(i, opt)| {
                        json!({
                            "text": format!("<div>{}</div>", escape_html(opt)),
                            "correct": i == q.correct,
                        })
                    })
                    .collect();
                element(json!({
                    "library": library_tag(LIB_MULTI_CHOICE),
                    "params": {
                        "question": format!("<p>{}</p>", escape_html(&q.prompt)),
                        "answers": answers,
                        "behaviour": { "singleAnswer": true },
                    },
                    "subContentId": "",
                }))
            })
            .collect(),
        Slide::Dialogue { title, lines } => {
            let mut html = format!("<h2>{}</h2>", escape_html(title));
            for line in lines {
                html.push_str(&format!(
                    "<p><strong>{}:</strong> {}</p>",
                    escape_html(&line.speaker),
                    escape_html(&line.text),
                ));
            }
            vec![element(advanced_text(html))]
        }
        Slide::Raw(v) => {
            let dump = serde_json::to_string_pretty(v).unwrap_or_else(|_| "{}".into());
            vec![element(advanced_text(format!(
                "<pre>{}</pre>",
                escape_html(&dump)
            )))]
        }
    }
}

/// Normalize a fill-in-blank sentence to H5P.Blanks `*answer*` syntax.
///
/// Source content uses three marker conventions: `__`, `[blank]`, `[___]`.
/// The first marker found is replaced with the starred answer; sentences
/// with no marker get the blank appended so the item stays answerable.
/// `[___]` must be probed before `__` or the bare check would match inside
/// the bracketed form and leave brackets behind.
pub fn normalize_blanks(sentence: &str, answer: &str) -> String {
    let replacement = format!("*{answer}*");
    for marker in ["[blank]", "[___]", "__"] {
        if sentence.contains(marker) {
            return sentence.replacen(marker, &replacement, 1);
        }
    }
    format!("{sentence} {replacement}")
}
