//! Standalone HTML5 bundle renderer.
//!
//! Layout:
//!   index.html               lesson-list shell, navigable client-side
//!   manifest.webmanifest     web app manifest
//!   shared/player.js         slide renderer (same dispatch as SCORM)
//!   shared/style.css
//!   lessons/lesson_n.json    one content document per lesson
//!
//! Servable as static files with no LMS host and no build step.

use crate::domain::{ExportOptions, LessonRecord};
use crate::export::{lesson_content_value, PackageEntry};
use crate::util::escape_html;

pub fn render(lessons: &[LessonRecord], options: &ExportOptions) -> Vec<PackageEntry> {
    let mut entries = vec![
        PackageEntry::text("index.html", index_html(lessons, &options.course_title)),
        PackageEntry::text("manifest.webmanifest", web_manifest(&options.course_title)),
        PackageEntry::text("shared/player.js", PLAYER_JS),
        PackageEntry::text("shared/style.css", SHARED_CSS),
    ];

    for (index, lesson) in lessons.iter().enumerate() {
        let content = lesson_content_value(lesson, options);
        entries.push(PackageEntry::text(
            format!("lessons/lesson_{}.json", index + 1),
            serde_json::to_string_pretty(&content).unwrap_or_else(|_| "{}".into()),
        ));
    }

    entries
}

fn index_html(lessons: &[LessonRecord], course_title: &str) -> String {
    let mut list = String::new();
    for (index, lesson) in lessons.iter().enumerate() {
        let n = index + 1;
        list.push_str(&format!(
            "      <li><a href=\"#\" data-lesson=\"lessons/lesson_{n}.json\">{}</a> <span class=\"badge\">{}</span></li>\n",
            escape_html(&lesson.title),
            lesson.slides.len(),
        ));
    }

    let title = escape_html(course_title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="manifest" href="manifest.webmanifest">
  <link rel="stylesheet" href="shared/style.css">
</head>
<body>
  <header><h1>{title}</h1></header>
  <nav id="lesson-list">
    <ul>
{list}    </ul>
  </nav>
  <main id="player" hidden></main>
  <script src="shared/player.js"></script>
  <script>
    var nav = document.getElementById('lesson-list');
    var main = document.getElementById('player');
    nav.addEventListener('click', function (ev) {{
      var link = ev.target.closest('a[data-lesson]');
      if (!link) {{ return; }}
      ev.preventDefault();
      nav.hidden = true;
      main.hidden = false;
      main.dataset.lesson = link.dataset.lesson;
      Player.mount(main, function (state) {{
        if (state.completed) {{
          nav.hidden = false;
          main.hidden = true;
        }}
      }});
    }});
  </script>
</body>
</html>
"#
    )
}

fn web_manifest(course_title: &str) -> String {
    serde_json::to_string_pretty(&serde_json::json!({
        "name": course_title,
        "short_name": course_title,
        "start_url": "index.html",
        "display": "standalone",
        "background_color": "#ffffff",
        "theme_color": "#2a6f4e",
    }))
    .unwrap_or_else(|_| "{}".into())
}

/// Shared slide player. One branch per slide kind, reading exactly the
/// fields the other renderers read, plus a raw fallback that dumps the
/// original JSON so nothing silently disappears.
pub(crate) const PLAYER_JS: &str = r#"'use strict';
var Player = (function () {
  function el(tag, cls, text) {
    var node = document.createElement(tag);
    if (cls) { node.className = cls; }
    if (text !== undefined) { node.textContent = text; }
    return node;
  }

  function renderSlide(slide, container, state) {
    container.appendChild(el('h2', 'slide-title', slide.title || 'Content'));
    switch (slide.type) {
      case 'vocabulary': {
        var table = el('table', 'vocab');
        (slide.words || []).forEach(function (w) {
          var row = el('tr');
          row.appendChild(el('td', 'word', w.word));
          row.appendChild(el('td', 'translation', w.translation));
          row.appendChild(el('td', 'example', w.example || ''));
          table.appendChild(row);
        });
        container.appendChild(table);
        break;
      }
      case 'grammar': {
        container.appendChild(el('p', 'explanation', slide.explanation));
        var list = el('ul', 'examples');
        (slide.examples || []).forEach(function (ex) {
          list.appendChild(el('li', null, ex));
        });
        container.appendChild(list);
        break;
      }
      case 'exercise': {
        container.appendChild(el('p', 'instructions', slide.instructions));
        (slide.items || []).forEach(function (item, i) {
          var row = el('div', 'blank-item');
          row.appendChild(el('span', null, item.sentence));
          var input = el('input');
          input.type = 'text';
          input.addEventListener('change', function () {
            state.answers['blank-' + i] = input.value;
            if (item.answer !== undefined && input.value.trim() === item.answer) {
              state.score += 1;
            }
          });
          row.appendChild(input);
          container.appendChild(row);
        });
        break;
      }
      case 'quiz': {
        (slide.questions || []).forEach(function (q, qi) {
          var block = el('fieldset', 'quiz-question');
          block.appendChild(el('legend', null, q.prompt));
          (q.options || []).forEach(function (opt, oi) {
            var label = el('label');
            var radio = el('input');
            radio.type = 'radio';
            radio.name = 'q-' + qi;
            radio.addEventListener('change', function () {
              state.answers['q-' + qi] = oi;
              if (q.correct !== undefined && oi === q.correct) {
                state.score += 1;
              }
            });
            label.appendChild(radio);
            label.appendChild(document.createTextNode(opt));
            block.appendChild(label);
          });
          container.appendChild(block);
        });
        break;
      }
      case 'dialogue': {
        var dialogue = el('dl', 'dialogue');
        (slide.lines || []).forEach(function (line) {
          dialogue.appendChild(el('dt', 'speaker', line.speaker));
          dialogue.appendChild(el('dd', 'line', line.text));
        });
        container.appendChild(dialogue);
        break;
      }
      default: {
        var pre = el('pre', 'raw-slide');
        pre.textContent = JSON.stringify(slide, null, 2);
        container.appendChild(pre);
      }
    }
  }

  return {
    mount: function (root, onProgress) {
      var state = { slideIndex: 0, answers: {}, score: 0, completed: false };
      fetch(root.dataset.lesson)
        .then(function (res) { return res.json(); })
        .then(function (lesson) {
          function show(index) {
            root.textContent = '';
            state.slideIndex = index;
            if (index >= lesson.slides.length) {
              state.completed = true;
              root.appendChild(el('h2', null, 'Lesson complete'));
              onProgress(state);
              return;
            }
            renderSlide(lesson.slides[index], root, state);
            var next = el('button', 'next', 'Next');
            next.addEventListener('click', function () { show(index + 1); });
            root.appendChild(next);
            onProgress(state);
          }
          show(0);
        });
    }
  };
})();
"#;

pub(crate) const SHARED_CSS: &str = r#"body {
  font-family: system-ui, sans-serif;
  margin: 0 auto;
  max-width: 48rem;
  padding: 1rem;
  color: #1c1c1c;
}
header h1 { color: #2a6f4e; }
.slide-title { border-bottom: 2px solid #2a6f4e; padding-bottom: 0.25rem; }
table.vocab td { padding: 0.25rem 0.75rem; border-bottom: 1px solid #ddd; }
.blank-item { margin: 0.5rem 0; }
.blank-item input { margin-left: 0.5rem; }
fieldset.quiz-question { margin: 0.75rem 0; border: 1px solid #ccc; }
fieldset.quiz-question label { display: block; }
dl.dialogue dt { font-weight: bold; margin-top: 0.5rem; }
.badge { color: #666; font-size: 0.8em; }
button.next { margin-top: 1rem; padding: 0.5rem 1.5rem; }
pre.raw-slide { background: #f5f5f5; overflow-x: auto; padding: 0.5rem; }
"#;
