//! Markdown to HTML compilation with syntax highlighting

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::MarkdownBody;

const EXCERPT_SEPARATOR: &str = "<!-- more -->";
const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Compiles markdown bodies into HTML
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Theme,
    line_numbers: bool,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::with_options(DEFAULT_THEME, true)
    }

    /// Use the named syntect theme, falling back to the default theme when it
    /// is unknown
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = themes
            .remove(theme)
            .or_else(|| themes.remove(DEFAULT_THEME))
            .unwrap_or_default();

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            line_numbers,
        }
    }

    /// Compile a markdown body, splitting off the excerpt if the body has a
    /// `<!-- more -->` marker
    pub fn compile(&self, raw: &str) -> Result<MarkdownBody> {
        let excerpt = match raw.find(EXCERPT_SEPARATOR) {
            Some(pos) => Some(self.render(raw[..pos].trim())?),
            None => None,
        };

        Ok(MarkdownBody {
            raw: raw.to_string(),
            html: self.render(&raw.replacen(EXCERPT_SEPARATOR, "", 1))?,
            excerpt,
        })
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES;

        let mut events: Vec<Event> = Vec::new();
        // Some(lang) while inside a code block
        let mut code_block: Option<Option<String>> = None;
        let mut code = String::new();

        for event in Parser::new_ext(markdown, options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    code_block = Some(match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    });
                    code.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let lang = code_block.take().flatten();
                    events.push(Event::Html(CowStr::from(
                        self.highlight_code(&code, lang.as_deref()),
                    )));
                }
                Event::Text(text) if code_block.is_some() => code.push_str(&text),
                event => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        Ok(html_output)
    }

    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        match highlighted_html_for_string(code, &self.syntax_set, syntax, &self.theme) {
            Ok(highlighted) if self.line_numbers => with_line_numbers(&highlighted, lang),
            Ok(highlighted) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                lang, highlighted
            ),
            Err(e) => {
                tracing::debug!("Highlighting {} block failed: {}", lang, e);
                format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    lang,
                    html_escape(code)
                )
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn with_line_numbers(highlighted: &str, lang: &str) -> String {
    let lines: Vec<&str> = highlighted.lines().collect();
    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        lang,
        gutter,
        lines.join("\n")
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
