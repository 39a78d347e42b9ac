#![forbid(unsafe_code)]

//! HTML entity escaping.

/// Escape the five characters with meaning in HTML text and attribute
/// values: `& < > " '`.
///
/// Returns the input unchanged (no allocation beyond the output string)
/// when nothing needs escaping.
pub fn html(input: &str) -> String {
    if !input
        .bytes()
        .any(|b| matches!(b, b'&' | b'<' | b'>' | b'"' | b'\''))
    {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len() + 8);
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}
