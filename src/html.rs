use crate::{Entry, License, Report, Section};

/// Notice rendered in place of a license that could not be found.
pub const NOT_FOUND_NOTICE: &str = "License file not found";

/// Escapes text for interpolation into HTML element content or attribute
/// values.
///
/// `&`, `<`, `>`, `"` and `'` are replaced by character references; all other
/// characters pass through unchanged.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Renders a complete HTML document for the report.
#[must_use]
pub fn render(report: &Report) -> String {
    let title = escape(report.title());
    let body: String = report
        .sections()
        .iter()
        .map(|section| render_section(section) + "\n")
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
</head>
<body>
  <h1>{title}</h1>
{body}</body>
</html>
"#
    )
}

/// Renders a section heading followed by its entries, one per line.
///
/// Fragments are not indented so `<pre>` content keeps its exact whitespace.
#[must_use]
pub fn render_section(section: &Section) -> String {
    let mut fragment = format!("<h2>{}</h2>", escape(section.label()));
    for entry in section.entries() {
        fragment.push('\n');
        fragment.push_str(&render_entry(entry));
    }
    fragment
}

/// Renders a single dependency: its name as a heading, then either the
/// license text or a notice that none was found.
#[must_use]
pub fn render_entry(entry: &Entry) -> String {
    let name = escape(&entry.name);
    match &entry.license {
        License::Found(text) => format!("<h3>{name}</h3><pre>{}</pre>", escape(text)),
        License::NotFound => format!("<h3>{name}</h3><p>{NOT_FOUND_NOTICE}</p>"),
    }
}
