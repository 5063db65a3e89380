//! Input normalisation helpers shared by the entity types.

use std::sync::LazyLock;

use regex::Regex;

/// Trim surrounding whitespace, then escape the five HTML-significant
/// characters.
pub(crate) fn clean(input: &str) -> String {
  let input = input.trim();
  let mut out = String::with_capacity(input.len());
  for c in input.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '\'' => out.push_str("&#39;"),
      '"' => out.push_str("&#34;"),
      c => out.push(c),
    }
  }
  out
}

/// Keep at most `max` characters.
pub(crate) fn truncate_chars(s: &mut String, max: usize) {
  if let Some((idx, _)) = s.char_indices().nth(max) {
    s.truncate(idx);
  }
}

/// Dot-atom local part, then dot-separated domain labels of at most 63
/// characters with no leading or trailing hyphen.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
  )
  .expect("email pattern compiles")
});

pub(crate) fn is_valid_email(email: &str) -> bool { EMAIL.is_match(email) }
