//! Markdown rendering with syntax highlighting

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::components::{ComponentMap, Element};
use crate::helpers::{collapse_whitespace, html_escape, truncate};

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
    line_numbers: bool,
}

struct PendingCodeBlock {
    lang: Option<String>,
    code: String,
}

struct PendingImage<'a> {
    src: String,
    title: String,
    alt: String,
    events: Vec<Event<'a>>,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", true, false)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, highlight: bool, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            highlight,
            line_numbers,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        self.render_document(markdown, None, &ComponentMap::new())
    }

    /// Render a post body
    ///
    /// Relative image sources are resolved against `asset_base`, and code
    /// blocks and images go through `components` before the default output.
    pub fn render_document(
        &self,
        markdown: &str,
        asset_base: Option<&str>,
        components: &ComponentMap,
    ) -> Result<String> {
        let parser = Parser::new_ext(markdown, parser_options());

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<PendingCodeBlock> = None;
        let mut image: Option<PendingImage> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some(PendingCodeBlock {
                        lang,
                        code: String::new(),
                    });
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some(block) = code_block.as_mut() {
                        block.code.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(block) = code_block.take() {
                        let element = Element::CodeBlock {
                            lang: block.lang.as_deref(),
                            code: &block.code,
                        };
                        let html = components.render(&element).unwrap_or_else(|| {
                            self.highlight_code(&block.code, block.lang.as_deref())
                        });
                        events.push(Event::Html(CowStr::from(html)));
                    }
                }
                Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    let src = resolve_asset(&dest_url, asset_base);
                    image = Some(PendingImage {
                        src: src.clone(),
                        title: title.to_string(),
                        alt: String::new(),
                        events: vec![Event::Start(Tag::Image {
                            link_type,
                            dest_url: CowStr::from(src),
                            title,
                            id,
                        })],
                    });
                }
                Event::End(TagEnd::Image) => {
                    if let Some(mut pending) = image.take() {
                        let element = Element::Image {
                            src: &pending.src,
                            alt: &pending.alt,
                            title: &pending.title,
                        };
                        match components.render(&element) {
                            Some(html) => events.push(Event::InlineHtml(CowStr::from(html))),
                            None => {
                                pending.events.push(Event::End(TagEnd::Image));
                                events.extend(pending.events);
                            }
                        }
                    }
                }
                other => match image.as_mut() {
                    Some(pending) => {
                        if let Event::Text(text) | Event::Code(text) = &other {
                            pending.alt.push_str(text);
                        }
                        pending.events.push(other);
                    }
                    None => events.push(other),
                },
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");
        let plain = || {
            format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            )
        };

        if !self.highlight {
            return plain();
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Some(theme) = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
        else {
            return plain();
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) if self.line_numbers => self.add_line_numbers(&highlighted, lang),
            Ok(highlighted) => format!(
                r#"<div class="highlight language-{}">{}</div>"#,
                html_escape(lang),
                highlighted
            ),
            Err(e) => {
                tracing::debug!("Highlighting {} failed: {}", lang, e);
                plain()
            }
        }
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        let lines: Vec<&str> = code.lines().collect();

        let gutter = (1..=lines.len())
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
            html_escape(lang),
            gutter,
            lines.join("\n")
        )
    }

    /// Plain text of a document, code blocks excluded
    pub fn plain_text(markdown: &str) -> String {
        let mut text = String::new();
        let mut in_code_block = false;

        for event in Parser::new_ext(markdown, parser_options()) {
            match event {
                Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    text.push(' ');
                }
                Event::Text(t) | Event::Code(t) if !in_code_block => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push(' '),
                Event::End(
                    TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::TableCell,
                ) => text.push(' '),
                _ => {}
            }
        }

        collapse_whitespace(&text)
    }

    /// Preview of a document: its plain text cut to `length` characters
    pub fn excerpt(markdown: &str, length: usize) -> String {
        truncate(&Self::plain_text(markdown), length, Some("…"))
    }

    /// Drop top-level MDX `import`/`export` statements
    pub fn strip_mdx_esm(source: &str) -> String {
        let mut in_fence = false;
        source
            .lines()
            .filter(|line| {
                let trimmed = line.trim_start();
                if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                    in_fence = !in_fence;
                    return true;
                }
                in_fence || !(line.starts_with("import ") || line.starts_with("export "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn parser_options() -> Options {
    // Front-matter is split off before parsing, so no metadata blocks here
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_GFM
}

/// Resolve a document-relative URL against the post's asset directory
fn resolve_asset(url: &str, base: Option<&str>) -> String {
    let is_relative = !(url.is_empty()
        || url.starts_with('/')
        || url.starts_with('#')
        || url.starts_with("data:")
        || url.contains("://"));

    match base {
        Some(base) if is_relative => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            url.trim_start_matches("./")
        ),
        _ => url.to_string(),
    }
}
