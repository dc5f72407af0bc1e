//! Host page.

use crate::format::escape_html;

/// HTMX build loaded by the host page.
pub const HTMX_SRC: &str = "https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js";

/// Generate the HTML page that embeds one widget.
///
/// The container posts the browser's capabilities and stored theme to
/// `/widget` on load and swaps the returned widget in.
#[must_use]
pub fn html_shell(title: &str) -> String {
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>

    <!-- Widget glue first: the container reads it on load -->
    <script src="/static/widget.js"></script>
    <script src="{HTMX_SRC}"></script>
    <link rel="stylesheet" href="/static/widget.css">
</head>
<body>
    <div
        id="chatbot-container"
        class="chatbot-container"
        hx-post="/widget"
        hx-trigger="load"
        hx-swap="innerHTML"
        hx-vals='js:{{...window.chatWidget.capabilities()}}'
    ></div>
</body>
</html>"#
    )
}
