use std::collections::HashMap;
use std::sync::Arc;

use hn_core::{Highlighter, MarkdownConverter};
use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use tracing::warn;

use crate::escape::escape_html;

lazy_static! {
    // stops at whitespace, angle brackets and CJK punctuation
    static ref BARE_URL: Regex =
        Regex::new(r"\bhttps?://[^\s<>\x{3000}-\x{303F}\x{FF00}-\x{FFEF}]+")
            .expect("static bare url pattern");
}

pub const EXTERNAL_LINK_REL: &str = "noopener noreferrer";

#[derive(Debug, Clone)]
pub struct CmarkOptions {
    /// Render single newlines as `<br />`.
    pub breaks: bool,
    /// Tables, strikethrough, task lists and footnotes.
    pub gfm: bool,
    pub header_ids: bool,
    /// Class prefix for the code block language.
    pub lang_prefix: String,
}

impl Default for CmarkOptions {
    fn default() -> Self {
        Self {
            breaks: true,
            gfm: true,
            header_ids: true,
            lang_prefix: "hljs language-".to_string(),
        }
    }
}

/// pulldown-cmark based converter with a token pass that highlights code
/// blocks and opens external links in a new tab.
pub struct CmarkConverter {
    highlighter: Arc<dyn Highlighter>,
    options: CmarkOptions,
}

impl CmarkConverter {
    pub fn new(highlighter: Arc<dyn Highlighter>) -> Self {
        Self::with_options(highlighter, CmarkOptions::default())
    }

    pub fn with_options(highlighter: Arc<dyn Highlighter>, options: CmarkOptions) -> Self {
        Self { highlighter, options }
    }

    fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.options.gfm {
            options.insert(Options::ENABLE_TABLES);
            options.insert(Options::ENABLE_STRIKETHROUGH);
            options.insert(Options::ENABLE_TASKLISTS);
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        options
    }

    fn walk_tokens<'a>(&self, parser: Parser<'a>) -> Vec<Event<'a>> {
        let mut events = Vec::new();
        // one entry per open link, true when it was rewritten to raw HTML
        let mut links: Vec<bool> = Vec::new();
        let mut code: Option<(Option<String>, String)> = None;
        // adjacent text outside links and code, scanned for bare URLs on flush
        let mut text = String::new();

        for event in parser {
            if let Event::Text(t) = &event {
                if code.is_none() && links.is_empty() {
                    text.push_str(t);
                    continue;
                }
            }
            if !text.is_empty() {
                push_autolinked(&std::mem::take(&mut text), &mut events);
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    code = Some((code_lang(&kind), String::new()));
                }
                Event::Text(chunk) if code.is_some() => {
                    if let Some((_, buf)) = code.as_mut() {
                        buf.push_str(&chunk);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, buf)) = code.take() {
                        let block = self.code_block(&buf, lang.as_deref());
                        events.push(Event::Html(block.into()));
                    }
                }
                Event::Start(Tag::Link { dest_url, title, .. }) if is_external(&dest_url) => {
                    links.push(true);
                    events.push(Event::InlineHtml(external_link_open(&dest_url, &title).into()));
                }
                Event::Start(tag @ Tag::Link { .. }) => {
                    links.push(false);
                    events.push(Event::Start(tag));
                }
                Event::End(TagEnd::Link) => {
                    if links.pop().unwrap_or(false) {
                        events.push(Event::InlineHtml("</a>".into()));
                    } else {
                        events.push(Event::End(TagEnd::Link));
                    }
                }
                Event::SoftBreak if self.options.breaks => events.push(Event::HardBreak),
                other => events.push(other),
            }
        }
        if !text.is_empty() {
            push_autolinked(&text, &mut events);
        }

        events
    }

    fn code_block(&self, code: &str, lang: Option<&str>) -> String {
        let body = match lang {
            Some(lang) if self.highlighter.supports(lang) => {
                match self.highlighter.highlight(code, lang) {
                    Ok(html) => html,
                    Err(e) => {
                        warn!("Code highlighting failed, falling back to detection: {}", e);
                        self.highlighter.highlight_auto(code)
                    }
                }
            }
            _ => self.highlighter.highlight_auto(code),
        };
        let class = match lang {
            Some(lang) => format!("{}{}", self.options.lang_prefix, escape_html(lang)),
            None => "hljs".to_string(),
        };
        format!("<pre><code class=\"{}\">{}</code></pre>\n", class, body)
    }
}

impl MarkdownConverter for CmarkConverter {
    fn to_html(&self, markdown: &str) -> String {
        let mut events = self.walk_tokens(Parser::new_ext(markdown, self.parser_options()));
        if self.options.header_ids {
            events = assign_heading_ids(events);
        }
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        out
    }
}

fn code_lang(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info
            .split(|c: char| c.is_whitespace() || c == ',')
            .next()
            .filter(|lang| !lang.is_empty())
            .map(str::to_string),
        CodeBlockKind::Indented => None,
    }
}

/// Emit `text`, turning bare `http(s)://` URLs into external links.
fn push_autolinked(text: &str, events: &mut Vec<Event<'_>>) {
    let mut cursor = 0;
    for m in BARE_URL.find_iter(text) {
        let url = trim_url(m.as_str());
        if url.len() <= "https://".len() {
            continue;
        }
        if m.start() > cursor {
            events.push(Event::Text(text[cursor..m.start()].to_string().into()));
        }
        events.push(Event::InlineHtml(external_link_open(url, "").into()));
        events.push(Event::Text(url.to_string().into()));
        events.push(Event::InlineHtml("</a>".into()));
        cursor = m.start() + url.len();
    }
    if cursor < text.len() {
        events.push(Event::Text(text[cursor..].to_string().into()));
    }
}

/// Drop trailing punctuation and unbalanced closing parentheses.
fn trim_url(mut url: &str) -> &str {
    while let Some(last) = url.chars().last() {
        let trim = match last {
            '.' | ',' | ':' | ';' | '!' | '?' | '"' | '\'' | '*' | '_' | '~' => true,
            ')' => url.matches(')').count() > url.matches('(').count(),
            _ => false,
        };
        if !trim {
            break;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
    url
}

fn is_external(url: &str) -> bool {
    url.starts_with("http")
}

fn external_link_open(url: &str, title: &str) -> String {
    let title = if title.is_empty() {
        String::new()
    } else {
        format!(" title=\"{}\"", escape_html(title))
    };
    format!(
        "<a href=\"{}\"{} target=\"_blank\" rel=\"{}\">",
        escape_html(url),
        title,
        EXTERNAL_LINK_REL
    )
}

fn assign_heading_ids(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out: Vec<Event<'_>> = Vec::with_capacity(events.len());
    let mut used: HashMap<String, usize> = HashMap::new();
    // index of the open heading in `out` and its text so far
    let mut pending: Option<(usize, String)> = None;

    for event in events {
        match &event {
            Event::Start(Tag::Heading { id: None, .. }) => {
                pending = Some((out.len(), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = pending.as_mut() {
                    buf.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((index, text)) = pending.take() {
                    let slug = unique_slug(&text, &mut used);
                    if let Some(Event::Start(Tag::Heading { id, .. })) = out.get_mut(index) {
                        *id = Some(CowStr::from(slug));
                    }
                }
            }
            _ => {}
        }
        out.push(event);
    }

    out
}

pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '_' {
            slug.push(c);
        } else if (c.is_whitespace() || c == '-') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug.to_string()
    }
}

fn unique_slug(text: &str, used: &mut HashMap<String, usize>) -> String {
    let base = slugify(text);
    let count = used.entry(base.clone()).or_insert(0);
    let slug = if *count == 0 {
        base
    } else {
        format!("{}-{}", base, count)
    };
    *count += 1;
    slug
}
