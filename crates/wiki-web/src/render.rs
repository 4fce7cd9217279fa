//! # Page Renderer
//!
//! Turns stored markdown plus page metadata into the final HTML response
//! body: markdown is converted through a pure function, the result is bound
//! into a named template, and the engine renders the page.
//!
//! The registry runs in strict mode, so a template referencing a binding the
//! context does not supply is a render failure surfaced to the caller, never
//! a silently empty slot.

use handlebars::Handlebars;
use pulldown_cmark::{html, Parser};
use serde::Serialize;

/// Markdown shown for a page that does not exist yet.
pub const EMPTY_PAGE_MARKDOWN: &str = "# A new page\n\nFeel-free to write in Markdown!\n";

/// A rendering failure: a bad template at registration time, or a missing
/// binding / unknown template at render time.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("bad template: {0}")]
    Template(#[from] handlebars::TemplateError),
    #[error("rendering failed: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Bindings for the "index" template.
#[derive(Debug, Serialize)]
pub struct IndexContext {
    pub title: String,
    pub pages: Vec<String>,
}

/// Bindings for the "page" template.
///
/// `new_page` is the string flag the editor form posts back (`"yes"` for a
/// page that does not exist yet, `"no"` otherwise); `content` is the
/// converted HTML and `raw_content` the markdown the editor shows.
#[derive(Debug, Serialize)]
pub struct PageContext {
    pub title: String,
    pub id: i64,
    #[serde(rename = "newPage")]
    pub new_page: String,
    #[serde(rename = "rawContent")]
    pub raw_content: String,
    pub content: String,
    pub timestamp: String,
}

/// Template registry with the wiki's two templates compiled in.
pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string("index", include_str!("../templates/index.hbs"))?;
        registry.register_template_string("page", include_str!("../templates/page.hbs"))?;
        Ok(Self { registry })
    }

    /// Render a named template with the given bindings into an HTML string.
    pub fn render<T: Serialize>(&self, template: &str, bindings: &T) -> Result<String, RenderError> {
        Ok(self.registry.render(template, bindings)?)
    }
}

/// Convert raw markdown to an HTML fragment. Pure; no sanitization beyond
/// what the conversion itself does.
pub fn markdown_to_html(raw: &str) -> String {
    let parser = Parser::new(raw);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// The render time as a display string for the page footer.
pub fn render_timestamp() -> String {
    chrono::Local::now().to_rfc2822()
}
