use crate::Result;

/// Markdown to HTML conversion.
pub trait MarkdownConverter: Send + Sync {
    fn to_html(&self, markdown: &str) -> String;
}

/// Code block highlighting used by the converter.
pub trait Highlighter: Send + Sync {
    /// Returns true if `lang` names a language this highlighter knows.
    fn supports(&self, lang: &str) -> bool;

    /// Highlight `code` as `lang`, returning HTML.
    fn highlight(&self, code: &str, lang: &str) -> Result<String>;

    /// Highlight `code` with a detected language. Never fails; falls back to escaped text.
    fn highlight_auto(&self, code: &str) -> String;
}
