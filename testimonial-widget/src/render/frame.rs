//! Standalone document served at the frame URL
//!
//! The page renders the same markup as isolated mode and reports its height to
//! the parent with `{type: "resize", height, version}` addressed to the host
//! origin only.

use super::{RenderEngine, View, escape_html};
use crate::config::WidgetConfig;
use crate::theme::Theme;

/// Version of the resize message protocol.
pub const BRIDGE_PROTOCOL_VERSION: u32 = 1;

/// Full HTML document for the iframe fallback.
pub fn render_frame_document(
    engine: &RenderEngine,
    view: &View<'_>,
    config: &WidgetConfig,
    theme: &Theme,
    parent_origin: &str,
) -> String {
    let body = engine.render_document_body(view, config, theme);
    format!(
        concat!(
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">",
            "<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">",
            "<title>{title}</title>",
            "<style>html,body{{margin:0;padding:0;background:{bg}}}</style>",
            "</head><body>{body}{script}</body></html>"
        ),
        title = escape_html(&config.title),
        bg = theme.background,
        body = body,
        script = resize_script(parent_origin),
    )
}

/// Script that posts the document height to the parent whenever it changes.
fn resize_script(parent_origin: &str) -> String {
    format!(
        concat!(
            "<script>(function(){{",
            "var target={origin};var last=-1;",
            "function report(){{var h=Math.ceil(document.documentElement.scrollHeight);",
            "if(h===last)return;last=h;",
            "window.parent.postMessage({{type:\"resize\",height:h,version:{version}}},target);}}",
            "window.addEventListener(\"load\",report);",
            "if(window.ResizeObserver){{new ResizeObserver(report).observe(document.body);}}",
            "else{{window.addEventListener(\"resize\",report);}}",
            "report();",
            "}})();</script>"
        ),
        origin = js_string_literal(parent_origin),
        version = BRIDGE_PROTOCOL_VERSION,
    )
}

/// JSON-encode `value` for embedding in an inline script.
fn js_string_literal(value: &str) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}
