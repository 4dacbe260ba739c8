//! Text escaping for untrusted strings

/// Escape `s` so it renders as literal text in element content and in
/// double- or single-quoted attribute values.
///
/// Mirrors what assigning `textContent` and reading back `innerHTML` yields,
/// extended with quotes so the same primitive is safe inside attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
