//! Application shell: routes, navigation and page rendering.

use std::fmt;
use std::sync::{Arc, Mutex};

use procure_data::ProcureGateway;
use procure_observability::StructuredLogger;

use crate::form::{ItemForm, MountOutcome, ResetPolicy};
use crate::search::SearchPanel;
use crate::sections::{html_escape, render_item_form, render_quick_links, render_results, ResultsView};
use crate::shell::PageShell;
use crate::store::ShellStore;

/// Client routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: quick links.
    Landing,
    /// `/new-item`: the item form.
    NewItem,
    /// Anything else, with the requested path.
    NotFound(String),
}

impl Route {
    /// Resolve a path. Query strings, fragments and a trailing slash are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Landing,
            "/new-item" => Route::NewItem,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Landing => "/",
            Route::NewItem => "/new-item",
            Route::NotFound(path) => path,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Landing => "Home",
            Route::NewItem => "New Item",
            Route::NotFound(_) => "Not Found",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// The whole client: shell store, search panel and item form behind one
/// router.
#[derive(Debug, Clone)]
pub struct ProcureApp {
    store: ShellStore,
    search: SearchPanel,
    form: ItemForm,
    current: Arc<Mutex<Route>>,
    logger: StructuredLogger,
}

impl ProcureApp {
    pub fn new(gateway: ProcureGateway) -> Self {
        Self::with_logger(gateway, StructuredLogger::discard())
    }

    pub fn with_logger(gateway: ProcureGateway, logger: StructuredLogger) -> Self {
        let store = ShellStore::new();
        let gateway = gateway.with_logger(logger.clone());
        Self {
            search: SearchPanel::new(gateway.clone(), store.clone()).with_logger(logger.clone()),
            form: ItemForm::new(gateway).with_logger(logger.clone()),
            store,
            current: Arc::new(Mutex::new(Route::Landing)),
            logger: logger.component("router"),
        }
    }

    pub fn with_reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.form = self.form.with_reset_policy(policy);
        self
    }

    pub fn store(&self) -> &ShellStore {
        &self.store
    }

    pub fn search(&self) -> &SearchPanel {
        &self.search
    }

    pub fn form(&self) -> &ItemForm {
        &self.form
    }

    pub fn current_route(&self) -> Route {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Switch routes. Entering `/new-item` mounts the form and waits for its
    /// reference data; leaving it unmounts the form.
    pub async fn navigate(&self, route: Route) -> Option<MountOutcome> {
        let previous = {
            let mut current = self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            std::mem::replace(&mut *current, route.clone())
        };
        self.logger
            .debug_builder("navigate")
            .field("from", previous.path())
            .field("to", route.path())
            .emit();

        if previous == Route::NewItem && route != Route::NewItem {
            self.form.unmount();
        }
        if route == Route::NewItem {
            Some(self.form.mount().await)
        } else {
            None
        }
    }

    /// Render the current route as a full HTML document.
    pub fn render(&self) -> String {
        self.render_route(&self.current_route())
    }

    /// Render `route` with the current state, without navigating.
    pub fn render_route(&self, route: &Route) -> String {
        let state = self.store.snapshot();
        let shell = PageShell::for_title(route.title())
            .with_sidebar_open(state.sidebar_open)
            .with_query(state.query.as_str());

        let page = match route {
            Route::Landing => render_quick_links(),
            Route::NewItem => render_item_form(&self.form.snapshot()),
            Route::NotFound(path) => format!(
                r#"<div class="not-found" data-section="not-found"><h1>Page not found</h1><p>{}</p><a href="/">Back to home</a></div>"#,
                html_escape(path)
            ),
        };
        let results = render_results(&ResultsView::project(&state.products, state.loading));

        shell.wrap(&format!("{}\n{}", page, results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormPhase;
    use procure_data::{Endpoints, FetchClient, StubReply, StubTransport};
    use serde_json::json;

    fn app() -> ProcureApp {
        let stub = StubTransport::new()
            .on_get(
                "http://api.test/api/v1/search",
                StubReply::json(200, json!({"products": [{"asin": "B1", "product_title": "Laptop X", "product_price": "$999"}]})),
            )
            .on_get(
                "http://api.test/api/v1/countries",
                StubReply::json(200, json!({"countries": ["India"]})),
            )
            .on_get(
                "http://api.test/api/v1/categories",
                StubReply::json(200, json!({"categories": [{"id": 1, "name": "Laptops"}]})),
            );
        let gateway = ProcureGateway::new(
            FetchClient::with_transport(Arc::new(stub)),
            Endpoints::with_base("http://api.test"),
        );
        ProcureApp::new(gateway)
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/"), Route::Landing);
        assert_eq!(Route::parse(""), Route::Landing);
        assert_eq!(Route::parse("/?query=desk"), Route::Landing);
        assert_eq!(Route::parse("/new-item"), Route::NewItem);
        assert_eq!(Route::parse("/new-item/"), Route::NewItem);
        assert_eq!(
            Route::parse("/pricing#top"),
            Route::NotFound("/pricing".to_string())
        );
    }

    #[tokio::test]
    async fn test_landing_renders_results_grid() {
        let app = app();
        app.search().run("laptop").await;

        let html = app.render();
        assert!(html.contains(r#"data-section="quick-links""#));
        assert!(html.contains("<h3>Laptop X</h3>"));
        assert!(html.contains(r#"value="laptop""#));
    }

    #[tokio::test]
    async fn test_navigation_mounts_and_unmounts_form() {
        let app = app();
        let outcome = app.navigate(Route::NewItem).await;
        assert_eq!(outcome, Some(MountOutcome::Ready { locations: 1, categories: 1 }));
        assert!(app.render().contains("New Item Form"));

        assert_eq!(app.navigate(Route::Landing).await, None);
        assert_eq!(app.form().phase(), FormPhase::Idle);
        assert_eq!(app.current_route(), Route::Landing);
    }

    #[test]
    fn test_not_found_route() {
        let app = app();
        let html = app.render_route(&Route::parse("/<admin>"));
        assert!(html.contains("Page not found"));
        assert!(html.contains("/&lt;admin&gt;"));
        assert!(html.contains("No products shown"));
    }

    #[test]
    fn test_sidebar_state_flows_into_page() {
        let app = app();
        app.store().toggle_sidebar();
        assert!(app.render().contains(r#"class="sidebar closed""#));
    }
}
