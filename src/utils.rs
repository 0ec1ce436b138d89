use crate::report::DecodedField;

// escapes text for safe inclusion in html
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

// returns a css class and the escaped value to show for a decoded field
pub fn format_stat_value(field: &DecodedField) -> (&'static str, String) {
    if field.is_available() {
        ("", escape_html(field.text()))
    } else {
        (" empty", escape_html(field.text()))
    }
}
