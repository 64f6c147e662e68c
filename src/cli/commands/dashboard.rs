use serde_json::json;

use crate::cli::utils::{output_value, render_table};
use crate::cli::{AppContext, OutputFormat};
use crate::pages::{dashboard_stats, DASHBOARD_TITLE};
use crate::shell::{current_footer, guard, sidebar_items, RouteOutcome};

pub fn dashboard(ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    ctx.require(crate::shell::Route::Dashboard)?;
    let stats = dashboard_stats();

    match output_format {
        OutputFormat::Json => {
            let values: Vec<_> = stats
                .iter()
                .map(|s| json!({ "title": s.title, "value": s.value, "display": s.display() }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&json!({ "title": DASHBOARD_TITLE, "stats": values }))?);
        }
        OutputFormat::Text => {
            println!("{}\n", DASHBOARD_TITLE);
            let rows: Vec<Vec<String>> = stats.iter().map(|s| vec![s.title.to_string(), s.display()]).collect();
            println!("{}", render_table(&["Indicador".to_string(), "Valor".to_string()], &rows));
            println!("\n{}", current_footer());
        }
    }
    Ok(())
}

/// Show what the console would render for a path
pub fn open(ctx: &AppContext, path: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let outcome = guard(path, &ctx.session.current());
    let (status, route) = match outcome {
        RouteOutcome::Render(route) => ("render", Some(route)),
        RouteOutcome::Redirect(route) => ("redirect", Some(route)),
        RouteOutcome::Loading => ("loading", None),
        RouteOutcome::NotFound => ("not_found", None),
    };
    let title = route.and_then(|r| sidebar_items().into_iter().find(|item| item.key == r).map(|item| item.label));

    output_value(
        &output_format,
        &json!({
            "path": path,
            "outcome": status,
            "route": route.map(|r| r.path()),
            "title": title,
        }),
    )
}
