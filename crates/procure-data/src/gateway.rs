//! Typed calls against the procurement endpoints.

use std::time::Instant;

use procure_core::{Category, ItemDraft, Location, ProductSummary, StoredSubmission, SubmissionReceipt};
use procure_observability::StructuredLogger;

use crate::{Endpoints, FetchClient, FetchError};

/// Results page requested by every search.
pub const SEARCH_PAGE: u32 = 1;
/// Sort order requested by every search.
pub const SEARCH_SORT: &str = "RELEVANCE";

/// The remote data gateway.
///
/// Every call returns the typed payload or a [`FetchError`]; callers decide
/// how to degrade. Calls are logged at debug level on the `gateway`
/// component.
#[derive(Debug, Clone)]
pub struct ProcureGateway {
    client: FetchClient,
    endpoints: Endpoints,
    logger: StructuredLogger,
}

impl ProcureGateway {
    pub fn new(client: FetchClient, endpoints: Endpoints) -> Self {
        Self {
            client,
            endpoints,
            logger: StructuredLogger::discard(),
        }
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger.component("gateway");
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// `GET search?query=&page=1&sort_by=RELEVANCE`, returning `products` in
    /// response order.
    pub async fn search(&self, query: &str) -> Result<Vec<ProductSummary>, FetchError> {
        let started = Instant::now();
        let response = self
            .client
            .get(&self.endpoints.search)
            .query("query", query)
            .query("page", SEARCH_PAGE.to_string())
            .query("sort_by", SEARCH_SORT)
            .send()
            .await?
            .error_for_status()?;
        let products: Vec<ProductSummary> = response.json_array_field("products")?;

        self.logger
            .debug_builder("search completed")
            .field("query", query)
            .field_u64("count", products.len() as u64)
            .duration_ms("duration_ms", started.elapsed())
            .emit();
        Ok(products)
    }

    /// The `countries` list from the locations endpoint.
    pub async fn locations(&self) -> Result<Vec<Location>, FetchError> {
        let response = self
            .client
            .get(&self.endpoints.locations)
            .send()
            .await?
            .error_for_status()?;
        let locations: Vec<Location> = response.json_array_field("countries")?;

        self.logger
            .debug_builder("locations loaded")
            .field_u64("count", locations.len() as u64)
            .emit();
        Ok(locations)
    }

    /// The `categories` list from the categories endpoint.
    pub async fn categories(&self) -> Result<Vec<Category>, FetchError> {
        let response = self
            .client
            .get(&self.endpoints.categories)
            .send()
            .await?
            .error_for_status()?;
        let categories: Vec<Category> = response.json_array_field("categories")?;

        self.logger
            .debug_builder("categories loaded")
            .field_u64("count", categories.len() as u64)
            .emit();
        Ok(categories)
    }

    /// POST the whole draft as JSON.
    ///
    /// A 2xx answer carrying an `error` body is still a failure.
    pub async fn submit(&self, draft: &ItemDraft) -> Result<SubmissionReceipt, FetchError> {
        let response = self
            .client
            .post(&self.endpoints.submit)
            .json(draft)?
            .send()
            .await?
            .error_for_status()?;

        let receipt: SubmissionReceipt = if response.body.iter().all(u8::is_ascii_whitespace) {
            SubmissionReceipt::default()
        } else {
            response.json()?
        };
        if let Some(error) = receipt.error {
            return Err(FetchError::ServiceError(error));
        }

        self.logger
            .debug_builder("submission accepted")
            .field("message", receipt.message.clone().unwrap_or_default())
            .emit();
        Ok(receipt)
    }

    /// Stored submissions, newest last as the service returns them.
    pub async fn submissions(&self) -> Result<Vec<StoredSubmission>, FetchError> {
        let response = self
            .client
            .get(&self.endpoints.submissions)
            .send()
            .await?
            .error_for_status()?;
        let rows: Vec<StoredSubmission> = response.json()?;

        self.logger
            .debug_builder("submissions listed")
            .field_u64("count", rows.len() as u64)
            .emit();
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StubReply, StubTransport};
    use pretty_assertions::assert_eq;
    use procure_core::{CategoryId, DraftField};
    use procure_observability::LogLevel;
    use serde_json::json;
    use std::sync::Arc;

    const BASE: &str = "http://api.test";

    fn gateway(stub: StubTransport) -> (ProcureGateway, Arc<StubTransport>) {
        let stub = Arc::new(stub);
        let client = FetchClient::with_transport(stub.clone());
        (ProcureGateway::new(client, Endpoints::with_base(BASE)), stub)
    }

    fn url(path: &str) -> String {
        format!("{}/api/v1/{}", BASE, path)
    }

    #[tokio::test]
    async fn test_search_sends_fixed_params_and_keeps_order() {
        let (gw, stub) = gateway(StubTransport::new().on_get(
            url("search"),
            StubReply::json(
                200,
                json!({"products": [
                    {"asin": "B1", "product_title": "Laptop X", "product_price": "$999"},
                    {"asin": "B2", "product_title": "Laptop Y"}
                ]}),
            ),
        ));

        let products = gw.search("gaming laptop").await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].title(), Some("Laptop X"));
        assert_eq!(products[0].product_price.as_deref(), Some("$999"));
        assert_eq!(products[1].title(), Some("Laptop Y"));

        let sent = &stub.requests()[0];
        assert_eq!(sent.query_param("query").as_deref(), Some("gaming laptop"));
        assert_eq!(sent.query_param("page").as_deref(), Some("1"));
        assert_eq!(sent.query_param("sort_by").as_deref(), Some("RELEVANCE"));
    }

    #[tokio::test]
    async fn test_search_keeps_elements_with_unexpected_field_types() {
        let (gw, _) = gateway(StubTransport::new().on_get(
            url("search"),
            StubReply::json(
                200,
                json!({"products": [
                    {"asin": "B1", "product_title": "Laptop X", "product_price": "$999"},
                    {"asin": "B2", "product_title": "Laptop Y", "product_price": 999},
                    {"asin": "B3", "product_num_ratings": "1,204", "product_star_rating": 4.5},
                    null
                ]}),
            ),
        ));

        let products = gw.search("laptop").await.unwrap();
        assert_eq!(products.len(), 4);
        assert_eq!(products[1].title(), Some("Laptop Y"));
        assert_eq!(products[1].product_price.as_deref(), Some("999"));
        assert_eq!(products[2].product_num_ratings, Some(1204));
        assert_eq!(products[2].product_star_rating.as_deref(), Some("4.5"));
        assert_eq!(products[3].title(), None);
    }

    #[tokio::test]
    async fn test_search_shape_and_status_errors() {
        let (gw, _) = gateway(
            StubTransport::new()
                .on_get(url("search"), StubReply::json(200, json!({"items": []})))
                .on_get(url("search"), StubReply::text(502, "bad gateway"))
                .on_get(url("search"), StubReply::json(200, json!({"error": "Value error: x"}))),
        );

        assert_eq!(
            gw.search("a").await,
            Err(FetchError::MissingField("products".to_string()))
        );
        assert_eq!(gw.search("a").await.unwrap_err().status(), Some(502));
        assert_eq!(
            gw.search("a").await,
            Err(FetchError::ServiceError("Value error: x".to_string()))
        );
    }

    #[tokio::test]
    async fn test_reference_lists() {
        let (gw, _) = gateway(
            StubTransport::new()
                .on_get(url("countries"), StubReply::json(200, json!({"countries": ["India", "Peru"]})))
                .on_get(
                    url("categories"),
                    StubReply::json(200, json!({"categories": [{"id": 1, "name": "Laptops"}, {"id": "b", "name": "Chairs"}]})),
                ),
        );

        let locations = gw.locations().await.unwrap();
        assert_eq!(locations, vec![Location::new("India"), Location::new("Peru")]);

        let categories = gw.categories().await.unwrap();
        assert_eq!(categories[0].id, CategoryId::new("1"));
        assert_eq!(categories[1].name, "Chairs");
    }

    #[tokio::test]
    async fn test_malformed_categories_is_an_error() {
        let (gw, _) = gateway(
            StubTransport::new().on_get(url("categories"), StubReply::text(200, "{categories farmers:[]}")),
        );
        assert!(matches!(gw.categories().await, Err(FetchError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_submit_posts_camel_case_draft() {
        let (gw, stub) = gateway(StubTransport::new().on_post(
            url("submit"),
            StubReply::json(200, json!({"message": "Form submission successful", "id": 7})),
        ));
        let mut draft = ItemDraft::default();
        draft.set(DraftField::SupplierName, "Acme").unwrap();
        draft.set(DraftField::Quantity, "3").unwrap();

        let receipt = gw.submit(&draft).await.unwrap();
        assert_eq!(receipt.id, Some(7));

        let body = stub.requests_to(&url("submit"))[0].json_body().unwrap();
        assert_eq!(body["supplierName"], json!("Acme"));
        assert_eq!(body["quantity"], json!(3));
    }

    #[tokio::test]
    async fn test_submit_failures() {
        let (gw, _) = gateway(
            StubTransport::new()
                .on_post(url("submit"), StubReply::text(500, "internal"))
                .on_post(url("submit"), StubReply::json(200, json!({"error": "could not save"})))
                .on_post(url("submit"), StubReply::network_error("connection reset")),
        );
        let draft = ItemDraft::default();

        assert_eq!(gw.submit(&draft).await.unwrap_err().status(), Some(500));
        assert_eq!(
            gw.submit(&draft).await,
            Err(FetchError::ServiceError("could not save".to_string()))
        );
        assert!(gw.submit(&draft).await.unwrap_err().is_transport());
    }

    #[tokio::test]
    async fn test_submissions_listing() {
        let (gw, _) = gateway(StubTransport::new().on_get(
            url("forms"),
            StubReply::json(
                200,
                json!([{
                    "id": 2, "supplier_name": "Acme", "product_info": "Desks",
                    "product_url": "https://acme.test/desk", "category": "4", "quantity": 10,
                    "timeline": "2026-11-30", "location": "Chile", "required_for": "Office"
                }]),
            ),
        ));

        let rows = gw.submissions().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].supplier_name, "Acme");
    }

    #[tokio::test]
    async fn test_calls_are_logged_on_gateway_component() {
        let (logger, buffer) = StructuredLogger::memory();
        let (gw, _) = gateway(
            StubTransport::new().on_get(url("countries"), StubReply::json(200, json!({"countries": []}))),
        );
        let gw = gw.with_logger(logger);

        gw.locations().await.unwrap();

        let entries = buffer.at_level(LogLevel::Debug);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].component.as_deref(), Some("gateway"));
        assert_eq!(entries[0].field("count"), Some(&json!(0)));
    }
}
