//! Stored submissions command.

use anyhow::{Context as _, Result};

use super::SubmissionsArgs;
use crate::context::Context;

/// Run the submissions command.
pub async fn run(args: SubmissionsArgs, ctx: &Context) -> Result<()> {
    let gateway = ctx.gateway();

    let spinner = ctx.output.spinner("Fetching submissions...");
    let result = gateway.submissions().await;
    spinner.finish_and_clear();

    let mut rows = result.context("Failed to list submissions")?;
    if let Some(limit) = args.limit {
        let skip = rows.len().saturating_sub(limit);
        rows.drain(..skip);
    }

    if ctx.output.is_json() {
        ctx.output.json(&rows);
        return Ok(());
    }

    if rows.is_empty() {
        ctx.output.info("No submissions yet");
        return Ok(());
    }

    ctx.output.header(&format!("{} submission(s)", rows.len()));
    let widths = [5, 20, 24, 5, 12, 14];
    ctx.output.table_row(
        &["ID", "SUPPLIER", "PRODUCT", "QTY", "NEEDED BY", "LOCATION"],
        &widths,
    );
    for row in &rows {
        let id = row.id.to_string();
        let quantity = row.quantity.to_string();
        ctx.output.table_row(
            &[
                id.as_str(),
                row.supplier_name.as_str(),
                row.product_info.as_str(),
                quantity.as_str(),
                row.timeline.as_str(),
                row.location.as_str(),
            ],
            &widths,
        );
    }

    Ok(())
}
