//! Landing section - quick links above the results grid.

/// Quick links on the landing page: label and target.
pub const QUICK_LINKS: [(&str, &str); 4] = [
    ("Software", ""),
    ("Laptop", "https://example2.com"),
    ("New Supplier", "https://example3.com"),
    ("New Item", "/new-item"),
];

/// Render the quick-link buttons.
pub fn render_quick_links() -> String {
    let buttons: String = QUICK_LINKS
        .iter()
        .map(|(label, href)| format!(r#"<a href="{}" class="button">{}</a>"#, href, label))
        .collect();

    format!(
        r#"<div class="main-content" data-section="quick-links">{}</div>"#,
        buttons
    )
}

/// Render the top bar search form, prefilled with `query`.
pub fn render_search_bar(query: &str) -> String {
    format!(
        r#"<form class="topbar" action="/" method="GET" data-section="search">
    <input type="text" name="query" class="search-bar" placeholder="Search for products..." value="{}">
    <button type="submit" class="search-button" aria-label="Search">Search</button>
</form>"#,
        super::html_escape(query)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_link_routes_to_form() {
        let html = render_quick_links();
        assert!(html.contains(r#"<a href="/new-item" class="button">New Item</a>"#));
        assert_eq!(html.matches(r#"class="button""#).count(), 4);
    }

    #[test]
    fn test_search_bar_escapes_query() {
        let html = render_search_bar(r#"14" laptop"#);
        assert!(html.contains(r#"value="14&quot; laptop""#));
    }
}
