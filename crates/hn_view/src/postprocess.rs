//! Fix-ups applied to the rendered report body.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::markdown::EXTERNAL_LINK_REL;

pub const TABLE_WRAPPER_OPEN: &str = r#"<div class="table-wrapper" style="overflow-x: auto;">"#;

lazy_static! {
    // quoted attribute values may contain `>`
    static ref ANCHOR: Regex = Regex::new(r#"(?i)<a\b((?:[^>"']|"[^"]*"|'[^']*')*)>"#)
        .expect("static anchor pattern");
    static ref ATTRIBUTE: Regex = Regex::new(
        r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#
    )
    .expect("static attribute pattern");
    static ref TABLE_TAG: Regex = Regex::new(r"(?i)<(/?)table\b[^>]*>").expect("static table pattern");
    static ref WRAPPER_BEFORE: Regex = Regex::new(
        r#"(?i)<div\b[^>]*\bclass\s*=\s*["'][^"']*\btable-wrapper\b[^"']*["'][^>]*>\s*$"#
    )
    .expect("static wrapper pattern");
}

pub fn post_process(html: &str) -> String {
    wrap_tables(&mark_external_links(html))
}

/// Every `<a href="http...">` opens in a new tab without opener or referrer.
pub fn mark_external_links(html: &str) -> String {
    ANCHOR
        .replace_all(html, |caps: &Captures| rewrite_anchor(&caps[0], &caps[1]))
        .into_owned()
}

fn rewrite_anchor(tag: &str, attrs: &str) -> String {
    let parsed: Vec<(String, String, &str)> = ATTRIBUTE
        .captures_iter(attrs)
        .map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let raw = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            (name, value, raw)
        })
        .collect();

    let external = parsed
        .iter()
        .any(|(name, value, _)| name == "href" && value.trim_start().starts_with("http"));
    if !external {
        return tag.to_string();
    }

    let mut out = String::from("<a");
    let mut has_class = false;
    for (name, value, raw) in &parsed {
        match name.as_str() {
            "target" | "rel" => {}
            "class" => {
                has_class = true;
                if value.split_whitespace().any(|c| c == "external-link") {
                    out.push_str(&format!(" class=\"{}\"", value));
                } else if value.trim().is_empty() {
                    out.push_str(" class=\"external-link\"");
                } else {
                    out.push_str(&format!(" class=\"{} external-link\"", value.trim()));
                }
            }
            _ => {
                out.push(' ');
                out.push_str(raw);
            }
        }
    }
    if !has_class {
        out.push_str(" class=\"external-link\"");
    }
    out.push_str(&format!(" target=\"_blank\" rel=\"{}\">", EXTERNAL_LINK_REL));
    out
}

/// Wrap top level tables in a horizontally scrollable container unless they
/// already sit in one.
pub fn wrap_tables(html: &str) -> String {
    let mut out = String::with_capacity(html.len() + 64);
    let mut cursor = 0;
    let mut depth = 0usize;
    // start of the outermost open table and whether it needs a wrapper
    let mut open: Option<(usize, bool)> = None;

    for caps in TABLE_TAG.captures_iter(html) {
        let Some(m) = caps.get(0) else { continue };
        let closing = !caps[1].is_empty();

        if !closing {
            if depth == 0 {
                out.push_str(&html[cursor..m.start()]);
                let wrapped = WRAPPER_BEFORE.is_match(&out);
                open = Some((m.start(), !wrapped));
                cursor = m.start();
            }
            depth += 1;
        } else if depth > 0 {
            depth -= 1;
            if depth == 0 {
                if let Some((start, needs_wrapper)) = open.take() {
                    let table = &html[start..m.end()];
                    if needs_wrapper {
                        out.push_str(TABLE_WRAPPER_OPEN);
                        out.push_str(table);
                        out.push_str("</div>");
                    } else {
                        out.push_str(table);
                    }
                    cursor = m.end();
                }
            }
        }
    }

    out.push_str(&html[cursor..]);
    out
}
