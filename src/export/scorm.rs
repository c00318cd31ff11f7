//! SCORM 2004 (4th edition) package renderer.
//!
//! Layout:
//!   imsmanifest.xml          organizations/resources, one SCO per lesson
//!   shared/scorm-api.js      runtime shim (Initialize/SetValue/.../Terminate)
//!   shared/player.js         slide renderer shared with the HTML5 bundle's
//!   shared/style.css         dispatch (same fields read per slide kind)
//!   lesson_n.html            SCO launch page
//!   lesson_n.json            slide content consumed by the player
//!
//! Item/resource identifiers are stable and 1:1 with lesson order:
//! `ITEM_1`/`RES_1` for the first lesson, and so on.

use crate::domain::{ExportOptions, LessonRecord};
use crate::export::{lesson_content_value, PackageEntry};
use crate::util::escape_html;

pub fn render(lessons: &[LessonRecord], options: &ExportOptions) -> Vec<PackageEntry> {
    let mut entries = vec![
        PackageEntry::text("imsmanifest.xml", manifest_xml(lessons, &options.course_title)),
        PackageEntry::text("shared/scorm-api.js", SCORM_API_JS),
        PackageEntry::text("shared/player.js", super::html5::PLAYER_JS),
        PackageEntry::text("shared/style.css", super::html5::SHARED_CSS),
    ];

    for (index, lesson) in lessons.iter().enumerate() {
        let n = index + 1;
        entries.push(PackageEntry::text(
            format!("lesson_{n}.html"),
            lesson_html(n, lesson),
        ));
        let content = lesson_content_value(lesson, options);
        entries.push(PackageEntry::text(
            format!("lesson_{n}.json"),
            serde_json::to_string_pretty(&content).unwrap_or_else(|_| "{}".into()),
        ));
    }

    entries
}

/// ADL SCORM 2004 4th-edition manifest.
fn manifest_xml(lessons: &[LessonRecord], course_title: &str) -> String {
    let mut items = String::new();
    let mut resources = String::new();

    for (index, lesson) in lessons.iter().enumerate() {
        let n = index + 1;
        let title = escape_html(&lesson.title);
        items.push_str(&format!(
            r#"      <item identifier="ITEM_{n}" identifierref="RES_{n}">
        <title>{title}</title>
      </item>
"#
        ));
        resources.push_str(&format!(
            r#"    <resource identifier="RES_{n}" type="webcontent" adlcp:scormType="sco" href="lesson_{n}.html">
      <file href="lesson_{n}.html"/>
      <file href="lesson_{n}.json"/>
      <file href="shared/scorm-api.js"/>
      <file href="shared/player.js"/>
      <file href="shared/style.css"/>
    </resource>
"#
        ));
    }

    let course = escape_html(course_title);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest identifier="LINGORA_CURRICULUM" version="1.0"
          xmlns="http://www.imsglobal.org/xsd/imscp_v1p1"
          xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_v1p3"
          xmlns:adlseq="http://www.adlnet.org/xsd/adlseq_v1p3"
          xmlns:adlnav="http://www.adlnet.org/xsd/adlnav_v1p3"
          xmlns:imsss="http://www.imsglobal.org/xsd/imsss"
          xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
          xsi:schemaLocation="http://www.imsglobal.org/xsd/imscp_v1p1 imscp_v1p1.xsd
                              http://www.adlnet.org/xsd/adlcp_v1p3 adlcp_v1p3.xsd
                              http://www.adlnet.org/xsd/adlseq_v1p3 adlseq_v1p3.xsd
                              http://www.adlnet.org/xsd/adlnav_v1p3 adlnav_v1p3.xsd
                              http://www.imsglobal.org/xsd/imsss imsss_v1p0.xsd">
  <metadata>
    <schema>ADL SCORM</schema>
    <schemaversion>2004 4th Edition</schemaversion>
  </metadata>
  <organizations default="ORG_1">
    <organization identifier="ORG_1">
      <title>{course}</title>
{items}    </organization>
  </organizations>
  <resources>
{resources}  </resources>
</manifest>
"#
    )
}

fn lesson_html(n: usize, lesson: &LessonRecord) -> String {
    let title = escape_html(&lesson.title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>{title}</title>
  <link rel="stylesheet" href="shared/style.css">
</head>
<body>
  <main id="player" data-lesson="lesson_{n}.json"></main>
  <script src="shared/scorm-api.js"></script>
  <script src="shared/player.js"></script>
  <script>
    ScormApi.initialize();
    Player.mount(document.getElementById('player'), function (state) {{
      ScormApi.setLocation(String(state.slideIndex));
      ScormApi.setSuspendData(JSON.stringify(state.answers));
      if (state.completed) {{
        ScormApi.setScore(state.score, 0, 100);
        ScormApi.setValue('cmi.completion_status', 'completed');
      }}
      ScormApi.commit();
    }});
    window.addEventListener('unload', function () {{ ScormApi.terminate(); }});
  </script>
</body>
</html>
"#
    )
}

/// SCORM 2004 runtime shim. Finds the LMS-provided `API_1484_11` object by
/// walking parent/opener windows, and exposes the handful of calls the
/// player needs plus location/suspend-data/score helpers.
const SCORM_API_JS: &str = r#"'use strict';
var ScormApi = (function () {
  var api = null;
  var started = false;

  function findApi(win) {
    var tries = 0;
    while (win && tries < 10) {
      if (win.API_1484_11) { return win.API_1484_11; }
      if (win.parent && win.parent !== win) { win = win.parent; }
      else if (win.opener) { win = win.opener; }
      else { break; }
      tries += 1;
    }
    return null;
  }

  return {
    initialize: function () {
      api = findApi(window);
      if (!api) { return false; }
      started = api.Initialize('') === 'true';
      return started;
    },
    setValue: function (element, value) {
      if (!started) { return false; }
      return api.SetValue(element, String(value)) === 'true';
    },
    getValue: function (element) {
      if (!started) { return ''; }
      return api.GetValue(element);
    },
    commit: function () {
      if (!started) { return false; }
      return api.Commit('') === 'true';
    },
    terminate: function () {
      if (!started) { return false; }
      started = false;
      return api.Terminate('') === 'true';
    },
    setLocation: function (location) {
      return this.setValue('cmi.location', location);
    },
    getLocation: function () {
      return this.getValue('cmi.location');
    },
    setSuspendData: function (data) {
      return this.setValue('cmi.suspend_data', data);
    },
    getSuspendData: function () {
      return this.getValue('cmi.suspend_data');
    },
    setScore: function (raw, min, max) {
      this.setValue('cmi.score.raw', raw);
      this.setValue('cmi.score.min', min);
      this.setValue('cmi.score.max', max);
      if (max > min) {
        this.setValue('cmi.score.scaled', ((raw - min) / (max - min)).toFixed(4));
      }
      return true;
    }
  };
})();
"#;
