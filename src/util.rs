//! Small utility helpers used across modules.

/// Escape text for embedding in HTML bodies and XML text nodes.
pub fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for ch in s.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(ch),
    }
  }
  out
}

/// Reduce a user-supplied package name to a safe file-name stem.
/// Keeps ASCII alphanumerics, `-` and `_`; everything else becomes `-`.
/// Empty input falls back to "curriculum".
pub fn sanitize_file_stem(s: &str) -> String {
  let stem: String = s
    .trim()
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
    .collect();
  let stem = stem.trim_matches('-').to_string();
  if stem.is_empty() { "curriculum".to_string() } else { stem }
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
#[allow(dead_code)]
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max { s.to_string() } else { format!("{}… ({} bytes total)", &s[..max], s.len()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn escapes_markup_characters() {
    assert_eq!(escape_html("a < b & c"), "a &lt; b &amp; c");
    assert_eq!(escape_html("\"quoted\""), "&quot;quoted&quot;");
  }

  #[test]
  fn sanitizes_file_stems() {
    assert_eq!(sanitize_file_stem("My Course: A1!"), "My-Course--A1");
    assert_eq!(sanitize_file_stem("   "), "curriculum");
    assert_eq!(sanitize_file_stem("unit_3-review"), "unit_3-review");
  }
}
