//! Text formatting for rendered messages.
//!
//! Everything here is pure string work so the rendering rules can be tested
//! without a browser:
//!
//! - [`bot_html`]: bot reply text → bullet list / paragraphs with links
//! - [`linkify`]: `http(s)://` substrings → anchors opening in a new tab
//! - [`escape_html`]: plain text → HTML-safe text
//! - [`speech_text`]: reply text → text fed to the speech synthesizer
//!
//! # Example
//!
//! ```rust
//! use chat_widget::format::bot_html;
//!
//! assert_eq!(
//!     bot_html("- a\n- b\nc"),
//!     "<ul><li>a</li><li>b</li><p>c</p></ul>"
//! );
//! ```

use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://\S+").unwrap_or_else(|e| panic!("invalid URL pattern: {e}"))
});

/// One formatted line of a bot reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A dash-prefixed line, with the dash and surrounding whitespace removed.
    Bullet(String),
    /// Any other non-empty line.
    Paragraph(String),
}

impl Line {
    fn to_html(&self) -> String {
        match self {
            Self::Bullet(text) => format!("<li>{}</li>", linkify(&escape_html(text))),
            Self::Paragraph(text) => format!("<p>{}</p>", linkify(&escape_html(text))),
        }
    }
}

/// Split bot text into formatted lines, dropping blank ones.
pub fn classify_lines(text: &str) -> Vec<Line> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.strip_prefix('-') {
            Some(rest) => Line::Bullet(rest.trim().to_string()),
            None => Line::Paragraph(line.to_string()),
        })
        .collect()
}

/// Render bot reply text as HTML.
///
/// When at least one line is a bullet every line is wrapped in a single
/// `<ul>`; otherwise the paragraphs are concatenated.
pub fn bot_html(text: &str) -> String {
    let lines = classify_lines(text);
    let body: String = lines.iter().map(Line::to_html).collect();

    if lines.iter().any(|line| matches!(line, Line::Bullet(_))) {
        format!("<ul>{body}</ul>")
    } else {
        body
    }
}

/// Replace every URL in already-escaped text with an anchor that opens in a new tab.
pub fn linkify(escaped: &str) -> String {
    URL_PATTERN
        .replace_all(escaped, |caps: &regex::Captures<'_>| {
            let url = &caps[0];
            format!(r#"<a href="{url}" target="_blank" rel="noopener noreferrer">{url}</a>"#)
        })
        .into_owned()
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
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

/// Text handed to the browser synthesizer: dashes dropped, newlines flattened.
pub fn speech_text(text: &str) -> String {
    text.replace('-', "").replace('\n', " ")
}
