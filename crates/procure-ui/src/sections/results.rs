//! Results section - product grid driven by the shell state.

use procure_core::ProductSummary;
use serde::Serialize;

use super::html_escape;

/// Image shown when a product has no photo.
pub const FALLBACK_IMAGE: &str = "default-image.jpg";
/// Title shown when a product has no title.
pub const FALLBACK_TITLE: &str = "Product";

pub const LOADING_TEXT: &str = "Loading...";
pub const EMPTY_TEXT: &str = "No products shown";

/// One rendered product entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    pub id: Option<String>,
    pub image: String,
    pub title: String,
    pub price: Option<String>,
    pub minimum_offer_price: Option<String>,
    pub delivery: Option<String>,
    pub badges: Vec<&'static str>,
}

impl ProductCard {
    fn from_summary(product: &ProductSummary) -> Self {
        Self {
            id: product.asin.as_ref().map(|id| id.to_string()),
            image: product.photo().unwrap_or(FALLBACK_IMAGE).to_string(),
            title: product.title().unwrap_or(FALLBACK_TITLE).to_string(),
            price: product.product_price.clone(),
            minimum_offer_price: product.product_minimum_offer_price.clone(),
            delivery: product.delivery.clone(),
            badges: product.badges(),
        }
    }
}

/// What the results panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "cards", rename_all = "snake_case")]
pub enum ResultsView {
    Loading,
    Empty,
    Products(Vec<ProductCard>),
}

impl ResultsView {
    /// Project the shell's products and loading flag. Loading wins over any
    /// products still held.
    pub fn project(products: &[ProductSummary], loading: bool) -> Self {
        if loading {
            ResultsView::Loading
        } else if products.is_empty() {
            ResultsView::Empty
        } else {
            ResultsView::Products(products.iter().map(ProductCard::from_summary).collect())
        }
    }
}

/// Render the results container.
pub fn render_results(view: &ResultsView) -> String {
    let inner = match view {
        ResultsView::Loading => format!(r#"<div class="loading-spinner">{}</div>"#, LOADING_TEXT),
        ResultsView::Empty => format!(r#"<div class="no-products">{}</div>"#, EMPTY_TEXT),
        ResultsView::Products(cards) => {
            let cards: String = cards.iter().map(render_product_card).collect();
            format!(r#"<div class="image-display">{}</div>"#, cards)
        }
    };

    format!(
        r#"<section class="image-display-container" data-section="results">
    {}
</section>"#,
        inner
    )
}

fn render_product_card(card: &ProductCard) -> String {
    let details: String = [&card.price, &card.minimum_offer_price, &card.delivery]
        .into_iter()
        .flatten()
        .map(|line| format!("<p>{}</p>", html_escape(line)))
        .collect();

    let badges: String = card
        .badges
        .iter()
        .map(|b| format!(r#"<span class="badge">{}</span>"#, b))
        .collect();

    format!(
        r#"<div class="image-item" data-product-id="{}">
    <img src="{}" alt="{}" class="image-thumbnail" loading="lazy">
    <div class="product-details">
        <h3>{}</h3>{}{}
    </div>
</div>"#,
        html_escape(card.id.as_deref().unwrap_or("")),
        html_escape(&card.image),
        html_escape(&card.title),
        html_escape(&card.title),
        badges,
        details
    )
}
