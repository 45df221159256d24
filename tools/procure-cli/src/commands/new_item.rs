//! New item request command.

use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use chrono::{Days, Local};
use dialoguer::{Confirm, Input, Select};
use procure_core::draft::TIMELINE_FORMAT;
use procure_core::{DraftField, ItemDraft};
use procure_ui::{FormState, ItemForm, SubmitOutcome, CONFIRMATION_MESSAGE};

use super::NewItemArgs;
use crate::context::Context;

/// Lead time suggested for the timeline prompt.
const DEFAULT_LEAD_DAYS: u64 = 14;

/// Run the new-item command.
pub async fn run(args: NewItemArgs, ctx: &Context) -> Result<()> {
    let form = ItemForm::new(ctx.gateway())
        .with_logger(ctx.logger.clone())
        .with_reset_policy(ctx.reset_policy());

    let spinner = ctx.output.spinner("Loading locations and categories...");
    form.mount().await;
    spinner.finish_and_clear();

    apply_flags(&form, &args)?;

    let interactive = ctx.output.is_interactive();
    if interactive {
        prompt_missing(&form)?;
    }

    let state = form.snapshot();
    if interactive && !args.yes {
        print_summary(ctx, &state);
        let confirmed = Confirm::new()
            .with_prompt("Submit this request?")
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.warn("Submission cancelled");
            return Ok(());
        }
    }

    let spinner = ctx.output.spinner("Submitting request...");
    let outcome = form.submit().await;
    spinner.finish_and_clear();

    match outcome? {
        SubmitOutcome::Accepted { receipt, .. } => {
            if ctx.output.is_json() {
                ctx.output.json(&receipt);
            }
            ctx.output.success(CONFIRMATION_MESSAGE);
            if let Some(id) = receipt.id {
                ctx.output.kv("id", &id.to_string());
            }
            if args.keep_open {
                wait_for_dismissal(ctx, &form).await;
            }
            Ok(())
        }
        SubmitOutcome::Rejected { error } => bail!("Submission failed: {}", error),
    }
}

fn apply_flags(form: &ItemForm, args: &NewItemArgs) -> Result<()> {
    let flags = [
        (DraftField::SupplierName, "--supplier", &args.supplier),
        (DraftField::ProductInfo, "--product-info", &args.product_info),
        (DraftField::ProductUrl, "--product-url", &args.product_url),
        (DraftField::Category, "--category", &args.category),
        (DraftField::Quantity, "--quantity", &args.quantity),
        (DraftField::Timeline, "--timeline", &args.timeline),
        (DraftField::Location, "--location", &args.location),
        (DraftField::RequiredFor, "--required-for", &args.required_for),
    ];

    for (field, flag, value) in flags {
        if let Some(value) = value {
            form.set(field, value)
                .with_context(|| format!("Invalid value for {}", flag))?;
        }
    }
    Ok(())
}

fn prompt_missing(form: &ItemForm) -> Result<()> {
    for field in DraftField::ALL {
        let state = form.snapshot();
        if !state.draft.get(field).is_empty() {
            continue;
        }

        match field {
            DraftField::Category => {
                if state.categories.is_empty() {
                    bail!(procure_ui::sections::NO_CATEGORIES);
                }
                let names: Vec<&str> = state.categories.iter().map(|c| c.name.as_str()).collect();
                let selection = Select::new()
                    .with_prompt(field.label())
                    .items(&names)
                    .default(0)
                    .interact()?;
                form.select_category(state.categories[selection].id.as_str());
            }
            DraftField::Location => {
                if state.locations.is_empty() {
                    bail!(procure_ui::sections::NO_LOCATIONS);
                }
                let names: Vec<&str> = state.locations.iter().map(|l| l.as_str()).collect();
                let selection = Select::new()
                    .with_prompt(field.label())
                    .items(&names)
                    .default(0)
                    .interact()?;
                form.select_location(names[selection]);
            }
            _ => {
                let value = prompt_text(field)?;
                form.set(field, &value)?;
            }
        }
    }
    Ok(())
}

fn prompt_text(field: DraftField) -> Result<String> {
    let mut input = Input::<String>::new()
        .with_prompt(field.label())
        .allow_empty(!field.is_required())
        .validate_with(move |value: &String| -> Result<(), String> {
            if field.is_required() && value.is_empty() {
                return Err(format!("{} is required", field.label()));
            }
            ItemDraft::default()
                .set(field, value)
                .map_err(|e| e.to_string())
        });

    if field == DraftField::Timeline {
        if let Some(suggested) = Local::now()
            .date_naive()
            .checked_add_days(Days::new(DEFAULT_LEAD_DAYS))
        {
            input = input.default(suggested.format(TIMELINE_FORMAT).to_string());
        }
    }

    Ok(input.interact_text()?)
}

fn print_summary(ctx: &Context, state: &FormState) {
    ctx.output.header("New item request");
    for field in DraftField::ALL {
        let value = match field {
            DraftField::Category => state
                .categories
                .iter()
                .find(|c| c.id.as_str() == state.selected_category())
                .map(|c| format!("{} ({})", c.name, c.id))
                .unwrap_or_else(|| state.selected_category().to_string()),
            _ => state.draft.get(field),
        };
        ctx.output.kv(field.label(), if value.is_empty() { "-" } else { value.as_str() });
    }
}

async fn wait_for_dismissal(ctx: &Context, form: &ItemForm) {
    let spinner = ctx.output.spinner("Confirmation visible...");
    while form.snapshot().confirmation_visible() {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    spinner.finish_and_clear();
    ctx.output.debug("Confirmation dismissed");
}
