//! Search panel.

use procure_data::ProcureGateway;
use procure_observability::{RequestId, StructuredLogger};

use crate::store::{SearchOutcome, ShellStore, Ticket};

/// How a search run ended, from the store's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResolution {
    /// Blank query: results cleared, no request issued.
    Cleared,
    /// The outcome was applied to the store.
    Applied { ticket: Ticket, count: usize, failed: bool },
    /// A newer search started first; the outcome was dropped.
    Superseded { ticket: Ticket },
}

/// Runs searches against the gateway and dispatches the results to the shell
/// store.
///
/// Failures never surface: they become an empty product list and an
/// error-level log line.
#[derive(Debug, Clone)]
pub struct SearchPanel {
    gateway: ProcureGateway,
    store: ShellStore,
    logger: StructuredLogger,
}

impl SearchPanel {
    pub fn new(gateway: ProcureGateway, store: ShellStore) -> Self {
        Self {
            gateway,
            store,
            logger: StructuredLogger::discard(),
        }
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger.component("search");
        self
    }

    pub fn store(&self) -> &ShellStore {
        &self.store
    }

    /// Run a search for `query` as typed.
    pub async fn run(&self, query: &str) -> SearchResolution {
        if query.trim().is_empty() {
            self.store.clear();
            self.logger.debug("blank query, results cleared");
            return SearchResolution::Cleared;
        }

        let ticket = self.store.begin_search(query);
        let log = self.logger.for_request(RequestId::generate());

        let outcome = match self.gateway.search(query).await {
            Ok(products) => SearchOutcome::Products(products),
            Err(e) => {
                log.error_builder("search failed")
                    .field("query", query)
                    .field("error", e.to_string())
                    .emit();
                SearchOutcome::Failed
            }
        };

        let failed = outcome == SearchOutcome::Failed;
        let count = match &outcome {
            SearchOutcome::Products(products) => products.len(),
            SearchOutcome::Failed => 0,
        };

        if self.store.resolve(ticket, outcome) {
            log.info_builder("search applied")
                .field("query", query)
                .field_u64("count", count as u64)
                .emit();
            SearchResolution::Applied { ticket, count, failed }
        } else {
            log.debug_builder("superseded search response dropped")
                .field_u64("ticket", ticket)
                .emit();
            SearchResolution::Superseded { ticket }
        }
    }
}
