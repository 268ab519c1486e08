//! Markdown rendering with sanitization and syntax highlighting

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// Markdown renderer producing sanitized HTML
///
/// Raw HTML in the source is escaped to text, so the output contains only
/// markup generated from the event stream. Fenced code blocks are
/// highlighted with syntect when enabled.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_DEFINITION_LIST
        | Options::ENABLE_GFM
}

impl MarkdownRenderer {
    /// Create a renderer with default settings
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", true)
    }

    /// Create with a highlight theme and highlighting toggle
    pub fn with_options(theme: &str, highlight: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            highlight,
        }
    }

    /// Render markdown to sanitized HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        self.render_with(markdown, |dest| Ok(dest.to_string()))
    }

    /// Render with a rewriter applied to every image destination
    ///
    /// The rewriter failing (e.g. a reference to a missing asset) fails the
    /// whole render.
    pub fn render_with<F>(&self, markdown: &str, mut rewrite_image: F) -> Result<String>
    where
        F: FnMut(&str) -> Result<String>,
    {
        let parser = Parser::new_ext(markdown, parser_options());

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_lang: Option<String> = None;
        let mut code_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_content.clear();
                    code_lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    let rendered = self.code_block(&code_content, code_lang.take().as_deref());
                    events.push(Event::Html(CowStr::from(rendered)));
                }
                Event::Text(text) if in_code_block => {
                    code_content.push_str(&text);
                }
                // Raw HTML becomes text, which push_html escapes
                Event::Html(raw) => events.push(Event::Text(raw)),
                Event::InlineHtml(raw) => events.push(Event::Text(raw)),
                Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    let dest = rewrite_image(&dest_url)?;
                    events.push(Event::Start(Tag::Image {
                        link_type,
                        dest_url: CowStr::from(dest),
                        title,
                        id,
                    }));
                }
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Render one fenced code block
    fn code_block(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        if self.highlight {
            let syntax = self
                .syntax_set
                .find_syntax_by_token(lang)
                .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

            if let Some(theme) = self
                .theme_set
                .themes
                .get(&self.theme_name)
                .or_else(|| self.theme_set.themes.values().next())
            {
                if let Ok(highlighted) =
                    highlighted_html_for_string(code, &self.syntax_set, syntax, theme)
                {
                    return format!(
                        r#"<figure class="highlight {}">{}</figure>"#,
                        lang, highlighted
                    );
                }
            }
        }

        format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            lang,
            html_escape(code)
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the plain text of a markdown body, markup stripped
///
/// Derived from the parse events rather than the rendered HTML, so
/// highlighting markup never leaks into excerpts or word counts.
pub fn plain_text(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, parser_options());
    let mut out = String::new();

    for event in parser {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Heading(_))
            | Event::End(TagEnd::Item)
            | Event::End(TagEnd::CodeBlock) => out.push(' '),
            _ => {}
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `budget` characters of plain text, cut back to a word boundary
pub fn excerpt(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }

    let taken: String = text.chars().take(budget).collect();
    match taken.rfind(char::is_whitespace) {
        Some(pos) if pos > 0 => taken[..pos].trim_end().to_string(),
        _ => taken,
    }
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
