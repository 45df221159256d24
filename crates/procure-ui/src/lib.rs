//! Procurement client components.
//!
//! - [`ShellStore`]: products, loading flag and sidebar state with ticketed
//!   search dispatch
//! - [`SearchPanel`]: runs searches and feeds the store
//! - [`ItemForm`]: the new-item form state machine
//! - [`sections`]: pure HTML renderers for each part of the page
//! - [`ProcureApp`]: routes and full-page rendering
//!
//! # Example
//!
//! ```rust,no_run
//! use procure_data::{Endpoints, FetchClient, ProcureGateway};
//! use procure_ui::{ProcureApp, Route};
//!
//! # async fn run() {
//! let gateway = ProcureGateway::new(FetchClient::new(), Endpoints::default());
//! let app = ProcureApp::new(gateway);
//!
//! app.search().run("laptop").await;
//! let html = app.render_route(&Route::Landing);
//! # let _ = html;
//! # }
//! ```

pub mod app;
pub mod form;
pub mod search;
pub mod sections;
pub mod shell;
pub mod store;

pub use app::{ProcureApp, Route};
pub use form::{
    ConfirmationToken, FormError, FormPhase, FormState, ItemForm, MountOutcome, ResetPolicy,
    SubmitOutcome, CONFIRMATION_MESSAGE, CONFIRMATION_WINDOW,
};
pub use search::{SearchPanel, SearchResolution};
pub use sections::{ProductCard, ResultsView};
pub use shell::{HeadContent, PageShell};
pub use store::{SearchOutcome, ShellState, ShellStore, Ticket};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{ItemForm, ProcureApp, ResultsView, Route, SearchPanel, ShellStore};
}
