use hn_core::{Error, Highlighter, Result};
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::debug;

use crate::escape::escape_html;

/// CSS classes emitted for highlighted tokens, e.g. `hl-keyword`.
pub const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Class based highlighter backed by syntect's bundled grammars.
pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Stylesheet matching [`CLASS_STYLE`] for one of syntect's bundled themes.
    pub fn stylesheet(theme: &str) -> Result<String> {
        let themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .get(theme)
            .ok_or_else(|| Error::Config(format!("unknown highlight theme: {}", theme)))?;
        css_for_theme_with_class_style(theme, CLASS_STYLE)
            .map_err(|e| Error::Highlight(e.to_string()))
    }

    fn render(&self, code: &str, syntax: &SyntaxReference) -> Result<String> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| Error::Highlight(e.to_string()))?;
        }
        Ok(generator.finalize())
    }
}

impl Highlighter for SyntectHighlighter {
    fn supports(&self, lang: &str) -> bool {
        self.syntaxes.find_syntax_by_token(lang).is_some()
    }

    fn highlight(&self, code: &str, lang: &str) -> Result<String> {
        let syntax = self
            .syntaxes
            .find_syntax_by_token(lang)
            .ok_or_else(|| Error::Highlight(format!("unknown language: {}", lang)))?;
        self.render(code, syntax)
    }

    fn highlight_auto(&self, code: &str) -> String {
        let syntax = self
            .syntaxes
            .find_syntax_by_first_line(code)
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());
        debug!("Auto-detected code block syntax: {}", syntax.name);
        self.render(code, syntax)
            .unwrap_or_else(|_| escape_html(code))
    }
}
