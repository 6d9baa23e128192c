//! Line based rewrites applied to report Markdown before conversion.
//!
//! Every rewrite leaves lines it does not recognise untouched, and running a
//! rewrite twice gives the same text as running it once.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref LABELED_URL: Regex = Regex::new(
        r"(?i)^(?P<prefix>\s*(?:[-*+]\s+)?\*\*(?:原文链接|原文|链接|HN\s*讨论|讨论链接|讨论|URL|Link|Original URL|HN Discussion)(?:[:：]\*\*|\*\*\s*[:：])\s*)(?P<url>https?://\S+)\s*$"
    )
    .expect("static url pattern");
    static ref NUMBERED_HEADING: Regex = Regex::new(
        r"^(?P<hashes>#{1,6})\s+(?P<number>\d+)\.\s*(?P<title>.+?)\s*$"
    )
    .expect("static heading pattern");
    static ref HN_ID: Regex = Regex::new(
        r"(?i)^\s*(?:[-*+]\s+)?\*\*HN\s*ID(?:[:：]\*\*|\*\*\s*[:：])\s*(?P<id>\d+)\s*$"
    )
    .expect("static hn id pattern");
    static ref EXISTING_LINK: Regex = Regex::new(r"\]\(").expect("static link pattern");
}

#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// Thread URL template with an `{id}` placeholder.
    pub hn_item_url: String,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            hn_item_url: hn_core::config::HN_ITEM_URL.to_string(),
        }
    }
}

/// Run every rewrite.
pub fn preprocess(markdown: &str, options: &RewriteOptions) -> String {
    link_hn_headings(&link_labeled_urls(markdown), options)
}

/// `**原文链接:** https://x` becomes `**原文链接:** [https://x](https://x)`.
pub fn link_labeled_urls(markdown: &str) -> String {
    map_lines(markdown, |line| {
        LABELED_URL
            .replace(line, |caps: &Captures| {
                let url = &caps["url"];
                format!("{}[{}]({})", &caps["prefix"], url, url)
            })
            .into_owned()
    })
}

/// Turn `### 3. Title (English Title)` followed by `**HN ID:** 12345` into a
/// heading linked to the discussion thread. The marker line is kept.
pub fn link_hn_headings(markdown: &str, options: &RewriteOptions) -> String {
    let lines: Vec<&str> = markdown.split('\n').collect();
    let mut out = Vec::with_capacity(lines.len());

    for (i, raw) in lines.iter().enumerate() {
        let (line, cr) = split_cr(raw);
        let id = lines
            .get(i + 1)
            .and_then(|next| HN_ID.captures(split_cr(next).0))
            .map(|caps| caps["id"].to_string());

        let rewritten = match (id, NUMBERED_HEADING.captures(line)) {
            (Some(id), Some(heading)) if !EXISTING_LINK.is_match(&heading["title"]) => {
                let url = options.hn_item_url.replace("{id}", &id);
                format!(
                    "{} {}. [{}]({}){}",
                    &heading["hashes"],
                    &heading["number"],
                    escape_link_text(&heading["title"]),
                    url,
                    cr
                )
            }
            _ => raw.to_string(),
        };
        out.push(rewritten);
    }

    out.join("\n")
}

fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

fn split_cr(line: &str) -> (&str, &str) {
    match line.strip_suffix('\r') {
        Some(stripped) => (stripped, "\r"),
        None => (line, ""),
    }
}

fn map_lines(text: &str, f: impl Fn(&str) -> String) -> String {
    text.split('\n')
        .map(|raw| {
            let (line, cr) = split_cr(raw);
            format!("{}{}", f(line), cr)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
