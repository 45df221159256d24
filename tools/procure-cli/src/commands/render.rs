//! Page rendering command.

use std::fs;

use anyhow::{Context as _, Result};
use procure_ui::Route;

use super::RenderArgs;
use crate::context::Context;

/// Run the render command.
pub async fn run(args: RenderArgs, ctx: &Context) -> Result<()> {
    let app = ctx.app();
    let route = Route::parse(&args.route);

    let spinner = ctx.output.spinner(&format!("Rendering {}...", route));
    if let Some(query) = &args.query {
        app.search().run(query).await;
    }
    app.navigate(route.clone()).await;
    let html = app.render();
    spinner.finish_and_clear();

    if let Route::NotFound(path) = &route {
        ctx.output.warn(&format!("No route matches {}, rendering the not-found page", path));
    }

    match &args.out {
        Some(out) => {
            let path = ctx.resolve_path(out);
            fs::write(&path, &html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            ctx.output.success(&format!("Wrote {} ({} bytes)", path.display(), html.len()));
        }
        None => println!("{}", html),
    }

    Ok(())
}
