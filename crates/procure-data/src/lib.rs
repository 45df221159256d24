//! Remote data gateway for the procurement client.
//!
//! [`FetchClient`] builds requests and hands them to a [`Transport`];
//! [`ProcureGateway`] wraps it with one typed call per endpoint.
//!
//! # Example
//!
//! ```rust,no_run
//! use procure_data::prelude::*;
//!
//! # async fn run() -> Result<(), FetchError> {
//! let gateway = ProcureGateway::new(FetchClient::new(), Endpoints::default());
//!
//! for product in gateway.search("laptop").await? {
//!     println!("{}", product.title().unwrap_or("Product"));
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod gateway;
mod request;
mod response;
mod transport;

pub use client::{ClientRequestBuilder, FetchClient};
pub use config::{
    Endpoints, CATEGORIES_URL_ENV, LOCATIONS_URL_ENV, SEARCH_URL_ENV, SUBMISSIONS_URL_ENV,
    SUBMIT_URL_ENV,
};
pub use error::FetchError;
pub use gateway::{ProcureGateway, SEARCH_PAGE, SEARCH_SORT};
pub use request::{Method, Request, RequestBuilder};
pub use response::Response;
pub use transport::{ReqwestTransport, StubReply, StubTransport, Transport};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Endpoints, FetchClient, FetchError, Method, ProcureGateway, Response};
}
