//! Markdown-to-HTML rendering. Wraps [`pulldown_cmark`] with the extensions
//! the site uses and intercepts fenced code blocks at the event level so
//! their contents can be syntax-highlighted with [`syntect`] before being
//! re-emitted as raw HTML.

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag};
use std::fmt;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// Renders post bodies to HTML. Construction loads the default syntax and
/// theme sets, which is comparatively expensive, so callers should build one
/// renderer per run and reuse it for every document.
pub struct Renderer {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Renderer {
    pub fn new() -> Renderer {
        let syntaxes = SyntaxSet::load_defaults_newlines();
        let theme = ThemeSet::load_defaults()
            .themes
            .remove("base16-ocean.light")
            .expect("default theme set should include \"base16-ocean.light\"");
        Renderer { syntaxes, theme }
    }

    /// Converts `markdown` into an HTML string. Fenced code blocks are
    /// replaced with highlighted HTML; a fence language that isn't
    /// recognized falls back to plain text rather than failing the
    /// document.
    pub fn render(&self, markdown: &str) -> Result<String> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut in_code_block = false;
        let mut code_language = String::new();
        let mut code = String::new();

        let mut events = Vec::new();
        for event in Parser::new_ext(markdown, options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_language = match kind {
                        CodeBlockKind::Fenced(language) => language.to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    code.clear();
                }
                Event::End(Tag::CodeBlock(_)) => {
                    in_code_block = false;
                    let highlighted = self.highlight(&code, &code_language)?;
                    events.push(Event::Html(highlighted.into()));
                }
                Event::Text(text) if in_code_block => code.push_str(&text),
                other => events.push(other),
            }
        }

        let mut out = String::new();
        html::push_html(&mut out, events.into_iter());
        Ok(out)
    }

    fn highlight(&self, code: &str, language: &str) -> Result<String> {
        let syntax = match language.split(',').next().map(str::trim) {
            Some(token) if !token.is_empty() => self
                .syntaxes
                .find_syntax_by_token(token)
                .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text()),
            _ => self.syntaxes.find_syntax_plain_text(),
        };
        highlighted_html_for_string(code, &self.syntaxes, syntax, &self.theme)
            .map_err(Error::Highlight)
    }
}

impl Default for Renderer {
    fn default() -> Renderer {
        Renderer::new()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error converting markdown to HTML.
#[derive(Debug)]
pub enum Error {
    /// Returned when [`syntect`] fails to highlight a code block.
    Highlight(syntect::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Highlight(err) => write!(f, "highlighting code block: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Highlight(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_emphasis() -> Result<()> {
        let html = Renderer::new().render("**bold**")?;
        assert!(html.contains("<strong>bold</strong>"), "got: {}", html);
        Ok(())
    }

    #[test]
    fn test_render_fenced_code_is_highlighted() -> Result<()> {
        let html = Renderer::new().render("```rust\nlet x = 1;\n```\n")?;
        assert!(html.contains("<pre"), "got: {}", html);
        assert!(!html.contains("```"), "fence leaked into output: {}", html);
        Ok(())
    }

    #[test]
    fn test_render_unknown_fence_language_falls_back() -> Result<()> {
        let html = Renderer::new().render("```klingon\nqapla'\n```\n")?;
        assert!(html.contains("qapla"), "got: {}", html);
        Ok(())
    }

    #[test]
    fn test_render_plain_paragraph() -> Result<()> {
        let html = Renderer::new().render("just text")?;
        assert!(html.contains("<p>just text</p>"), "got: {}", html);
        Ok(())
    }
}
