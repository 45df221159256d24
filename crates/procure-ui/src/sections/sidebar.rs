//! Sidebar section - collapsible external navigation.

/// External links shown in the sidebar, in order.
pub const SIDEBAR_LINKS: [(&str, &str); 4] = [
    ("Home", "https://www.proacure.com/"),
    ("Resources", "https://www.proacure.com/resources/"),
    ("Pricing", "https://www.proacure.com/pricing/"),
    (
        "Solutions",
        "https://www.proacure.com/spend-analytics/?tab=spend_analytics",
    ),
];

/// Render the sidebar in its open or closed state.
pub fn render_sidebar(open: bool) -> String {
    let (class, toggle) = if open { ("open", "&lt;") } else { ("closed", "&gt;") };

    let links: String = SIDEBAR_LINKS
        .iter()
        .map(|(label, href)| {
            format!(
                r#"<li><a href="{}" target="_blank" rel="noopener noreferrer">{}</a></li>"#,
                super::html_escape(href),
                label
            )
        })
        .collect();

    format!(
        r#"<aside class="sidebar {}" data-section="sidebar">
    <button class="toggle-button" aria-expanded="{}">{}</button>
    <ul>{}</ul>
</aside>"#,
        class, open, toggle, links
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_closed() {
        let open = render_sidebar(true);
        assert!(open.contains(r#"class="sidebar open""#));
        assert!(open.contains("&lt;"));

        let closed = render_sidebar(false);
        assert!(closed.contains(r#"class="sidebar closed""#));
        assert!(closed.contains(r#"aria-expanded="false""#));
    }

    #[test]
    fn test_links_open_in_new_tab() {
        let html = render_sidebar(true);
        assert_eq!(html.matches(r#"target="_blank""#).count(), 4);
        assert!(html.contains("spend-analytics/?tab=spend_analytics"));
    }
}
