//! Shell state store.
//!
//! The shell owns the product list and the loading flag. Searches take a
//! [`Ticket`] when they start and hand their outcome back under it; the store
//! applies an outcome only while its ticket is the newest one, so a slow,
//! superseded response can never overwrite a newer result or clear `loading`
//! for a request that is still in flight.

use std::sync::{Arc, Mutex, MutexGuard};

use procure_core::ProductSummary;
use serde::Serialize;

/// Generation number a search was issued under.
pub type Ticket = u64;

/// Snapshot of the shell's view state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShellState {
    /// Query of the latest search, empty after a clear.
    pub query: String,
    pub products: Vec<ProductSummary>,
    /// True only while the current search is outstanding.
    pub loading: bool,
    /// Whether the last applied search failed (products are then empty).
    pub last_failed: bool,
    pub sidebar_open: bool,
}

/// Result of a search, as handed back to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Products(Vec<ProductSummary>),
    Failed,
}

#[derive(Debug)]
struct Inner {
    state: ShellState,
    current: Ticket,
}

/// Shared, cloneable handle to the shell state.
#[derive(Debug, Clone)]
pub struct ShellStore {
    inner: Arc<Mutex<Inner>>,
}

impl Default for ShellStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellStore {
    /// Empty store with the sidebar open.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: ShellState {
                    sidebar_open: true,
                    ..Default::default()
                },
                current: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start a search: issue a new ticket and raise `loading`.
    pub fn begin_search(&self, query: &str) -> Ticket {
        let mut inner = self.lock();
        inner.current += 1;
        inner.state.query = query.to_string();
        inner.state.loading = true;
        inner.current
    }

    /// Apply an outcome if `ticket` is still current. Returns whether it was
    /// applied.
    pub fn resolve(&self, ticket: Ticket, outcome: SearchOutcome) -> bool {
        let mut inner = self.lock();
        if ticket != inner.current {
            return false;
        }
        let (products, failed) = match outcome {
            SearchOutcome::Products(products) => (products, false),
            SearchOutcome::Failed => (Vec::new(), true),
        };
        inner.state.products = products;
        inner.state.last_failed = failed;
        inner.state.loading = false;
        true
    }

    /// Drop the results and invalidate any outstanding search.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.current += 1;
        inner.state.query.clear();
        inner.state.products.clear();
        inner.state.loading = false;
        inner.state.last_failed = false;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.lock().current == ticket
    }

    /// Flip the sidebar; returns the new open state.
    pub fn toggle_sidebar(&self) -> bool {
        let mut inner = self.lock();
        inner.state.sidebar_open = !inner.state.sidebar_open;
        inner.state.sidebar_open
    }

    pub fn snapshot(&self) -> ShellState {
        self.lock().state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laptop() -> ProductSummary {
        ProductSummary::new("B1", "Laptop X").with_price("$999")
    }

    #[test]
    fn test_begin_then_resolve() {
        let store = ShellStore::new();
        let ticket = store.begin_search("laptop");
        assert!(store.snapshot().loading);

        assert!(store.resolve(ticket, SearchOutcome::Products(vec![laptop()])));
        let state = store.snapshot();
        assert!(!state.loading);
        assert_eq!(state.products, vec![laptop()]);
        assert_eq!(state.query, "laptop");
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let store = ShellStore::new();
        let first = store.begin_search("old");
        let second = store.begin_search("new");

        assert!(!store.resolve(first, SearchOutcome::Products(vec![laptop()])));
        let state = store.snapshot();
        assert!(state.loading, "stale response must not clear loading");
        assert!(state.products.is_empty());

        assert!(store.resolve(second, SearchOutcome::Products(Vec::new())));
        assert!(!store.snapshot().loading);
    }

    #[test]
    fn test_failure_empties_products_and_marks_failed() {
        let store = ShellStore::new();
        let t = store.begin_search("a");
        store.resolve(t, SearchOutcome::Products(vec![laptop()]));

        let t = store.begin_search("b");
        store.resolve(t, SearchOutcome::Failed);
        let state = store.snapshot();
        assert!(state.products.is_empty());
        assert!(state.last_failed);
    }

    #[test]
    fn test_clear_invalidates_outstanding_search() {
        let store = ShellStore::new();
        let t = store.begin_search("laptop");
        store.clear();

        assert!(!store.is_current(t));
        assert!(!store.resolve(t, SearchOutcome::Products(vec![laptop()])));
        let state = store.snapshot();
        assert!(!state.loading);
        assert!(state.products.is_empty());
    }

    #[test]
    fn test_sidebar_toggle() {
        let store = ShellStore::new();
        assert!(store.snapshot().sidebar_open);
        assert!(!store.toggle_sidebar());
        assert!(store.toggle_sidebar());
    }

    #[test]
    fn test_clones_share_state() {
        let store = ShellStore::new();
        let handle = store.clone();
        let t = handle.begin_search("x");
        assert!(store.is_current(t));
    }
}
