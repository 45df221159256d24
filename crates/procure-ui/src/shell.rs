//! Page shell: document head and the layout wrapping every view.

use crate::sections::{html_escape, render_search_bar, render_sidebar};

/// Animated header text above the search bar.
pub const BRAND_TEXT: &str = "| Proacure |";

const BASE_STYLES: &str = "body{margin:0;font-family:system-ui,sans-serif}\
.app{display:flex}.content{flex:1;padding:1rem}\
.sidebar.closed ul{display:none}\
.image-display{display:grid;grid-template-columns:repeat(auto-fill,minmax(200px,1fr));gap:1rem}\
.premium-message{padding:.5rem;border-radius:4px;background:#e6f4ea}";

/// Head content for the shell.
#[derive(Debug, Clone, Default)]
pub struct HeadContent {
    pub title: Option<String>,
    /// Meta tags as `(name, content)`.
    pub meta: Vec<(String, String)>,
    /// Raw tags emitted as-is (stylesheets, inline styles).
    pub links: Vec<String>,
}

impl HeadContent {
    /// Create new head content with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Add a meta tag.
    pub fn with_meta(mut self, name: &str, content: &str) -> Self {
        self.meta.push((name.to_string(), content.to_string()));
        self
    }

    /// Add a stylesheet link.
    pub fn with_stylesheet(mut self, href: &str) -> Self {
        self.links
            .push(format!(r#"<link rel="stylesheet" href="{}">"#, html_escape(href)));
        self
    }

    /// Add inline CSS styles.
    pub fn with_style(mut self, css: &str) -> Self {
        self.links.push(format!("<style>{}</style>", css));
        self
    }

    /// Render head content to HTML.
    pub fn render(&self) -> String {
        let mut html = String::new();

        if let Some(title) = &self.title {
            html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
        }

        for (name, content) in &self.meta {
            html.push_str(&format!(
                r#"<meta name="{}" content="{}">"#,
                html_escape(name),
                html_escape(content)
            ));
            html.push('\n');
        }

        for link in &self.links {
            html.push_str(link);
            html.push('\n');
        }

        html
    }
}

/// The document around a page: head, sidebar, header and search bar.
#[derive(Debug, Clone)]
pub struct PageShell {
    pub head: HeadContent,
    pub sidebar_open: bool,
    /// Value shown in the search bar.
    pub query: String,
}

impl PageShell {
    pub fn new(head: HeadContent) -> Self {
        Self {
            head,
            sidebar_open: true,
            query: String::new(),
        }
    }

    /// Default head for a page titled `title`.
    pub fn for_title(title: &str) -> Self {
        let head = HeadContent::new(format!("{} - Proacure", title))
            .with_meta("viewport", "width=device-width, initial-scale=1")
            .with_meta("description", "Procurement search and new item requests")
            .with_style(BASE_STYLES);
        Self::new(head)
    }

    pub fn with_sidebar_open(mut self, open: bool) -> Self {
        self.sidebar_open = open;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Render the opening part of the shell (before page content).
    pub fn render_opening(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
{}</head>
<body>
<div class="app">
{}
<div class="content">
<div class="animated-header"><div class="animated-text" data-text="{}">{}</div></div>
{}
"#,
            self.head.render(),
            render_sidebar(self.sidebar_open),
            BRAND_TEXT,
            BRAND_TEXT,
            render_search_bar(&self.query)
        )
    }

    /// Render the closing part of the shell (after page content).
    pub fn render_closing(&self) -> String {
        "</div>\n</div>\n</body>\n</html>".to_string()
    }

    /// Wrap `content` in the full document.
    pub fn wrap(&self, content: &str) -> String {
        format!("{}{}\n{}", self.render_opening(), content, self.render_closing())
    }
}
