use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_core::{derive_view_state, DetailPhase, DetailSession, SearchSession};
use serde_json::json;
use tracing::info;
use crate::commands::context::AppContext;
use crate::commands::render;
use crate::commands::spinner::Spinner;
use crate::output::Output;

pub async fn run_search(ctx: &AppContext, query: &str, output: &Output) -> Result<()> {
    let session = SearchSession::with_config(ctx.catalog()?, &ctx.config.search);

    let spinner = Spinner::start(format!("Searching for '{}'...", query), output.is_human());
    session.search(query);
    let state = session.settled().await;
    spinner.finish();

    if let Some(error) = state.error {
        return Err(eyre!("{}", error));
    }

    let min = ctx.config.search.min_query_length;
    if query.chars().count() < min {
        output.warn(format!("Queries need at least {} characters", min));
    }

    info!(query = %query, results = state.results.len(), "Search finished");
    output.data(&json!({ "query": state.query, "results": state.results }));
    if output.is_human() {
        if state.results.is_empty() {
            output.info("No results");
        } else {
            output.table(&render::results_table(&state.results));
        }
    }
    Ok(())
}

pub async fn run_show(ctx: &AppContext, id: &str, output: &Output) -> Result<()> {
    let session = DetailSession::new(ctx.catalog()?);
    let watchlist = ctx.watchlist()?;

    let spinner = Spinner::start(format!("Loading {}...", id), output.is_human());
    session.open(id);
    let state = session.settled().await;
    spinner.finish();

    let view = derive_view_state(&state, watchlist.list());
    match (state.phase, &state.detail) {
        (DetailPhase::Ready, Some(detail)) => {
            output.data(&json!({ "detail": detail, "view": view }));
            output.table(&render::detail_table(detail, Some(&view)));
            Ok(())
        }
        _ => Err(eyre!(
            "{}",
            state.error.unwrap_or_else(|| format!("Could not load {}", id))
        )),
    }
}
