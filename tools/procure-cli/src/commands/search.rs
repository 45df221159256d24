//! Product search command.

use anyhow::Result;
use procure_ui::{ResultsView, SearchPanel, SearchResolution, ShellStore};

use super::SearchArgs;
use crate::context::Context;
use crate::output::truncate;

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let query = args.query.join(" ");
    let panel = SearchPanel::new(ctx.gateway(), ShellStore::new()).with_logger(ctx.logger.clone());

    let spinner = ctx.output.spinner(&format!("Searching for \"{}\"...", query));
    let resolution = panel.run(&query).await;
    spinner.finish_and_clear();

    let state = panel.store().snapshot();
    if let SearchResolution::Applied { failed: true, .. } = resolution {
        ctx.output.warn("Search failed, showing no results (see log for details)");
    }

    let mut products = state.products;
    if let Some(limit) = args.limit {
        products.truncate(limit);
    }
    let view = ResultsView::project(&products, state.loading);

    if ctx.output.is_json() {
        ctx.output.json(&view);
        return Ok(());
    }

    match view {
        ResultsView::Loading => ctx.output.info(procure_ui::sections::LOADING_TEXT),
        ResultsView::Empty => ctx.output.info(procure_ui::sections::EMPTY_TEXT),
        ResultsView::Products(cards) => {
            ctx.output.header(&format!("{} product(s) for \"{}\"", cards.len(), query));
            let title_width = ctx.output.term_width().saturating_sub(36).clamp(20, 80);
            ctx.output.table_row(&["TITLE", "PRICE", "DELIVERY"], &[title_width, 10, 20]);
            for card in &cards {
                let title = match card.badges.as_slice() {
                    [] => card.title.clone(),
                    badges => format!("{} [{}]", card.title, badges.join(", ")),
                };
                let delivery = truncate(card.delivery.as_deref().unwrap_or(""), 20);
                ctx.output.table_row(
                    &[
                        title.as_str(),
                        card.price.as_deref().unwrap_or("-"),
                        delivery.as_str(),
                    ],
                    &[title_width, 10, 20],
                );
            }
        }
    }

    Ok(())
}
