//! Reference data command.

use anyhow::Result;
use procure_ui::{ItemForm, MountOutcome};
use serde_json::json;

use super::ReferenceArgs;
use crate::context::Context;

/// Run the reference command.
pub async fn run(args: ReferenceArgs, ctx: &Context) -> Result<()> {
    let form = ItemForm::new(ctx.gateway()).with_logger(ctx.logger.clone());

    let spinner = ctx.output.spinner("Loading reference data...");
    let outcome = form.mount().await;
    spinner.finish_and_clear();

    if let MountOutcome::Ready {
        locations,
        categories,
    } = outcome
    {
        ctx.output.debug(&format!(
            "Loaded {} location(s) and {} category(ies)",
            locations, categories
        ));
    }

    let state = form.snapshot();
    let show_locations = !args.categories;
    let show_categories = !args.locations;

    if ctx.output.is_json() {
        let mut value = json!({});
        if show_locations {
            value["locations"] = json!(state.locations);
        }
        if show_categories {
            value["categories"] = json!(state.categories);
        }
        ctx.output.json(&value);
        return Ok(());
    }

    if show_locations {
        ctx.output.header("Locations");
        if state.locations.is_empty() {
            ctx.output.info(procure_ui::sections::NO_LOCATIONS);
        }
        for location in &state.locations {
            ctx.output.list_item(location.as_str());
        }
    }

    if show_categories {
        ctx.output.header("Categories");
        if state.categories.is_empty() {
            ctx.output.info(procure_ui::sections::NO_CATEGORIES);
        }
        for category in &state.categories {
            ctx.output.kv(category.id.as_str(), &category.name);
        }
    }

    Ok(())
}
