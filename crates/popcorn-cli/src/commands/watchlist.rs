use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_core::{CommitOutcome, DetailSession};
use popcorn_models::Rating;
use serde_json::json;
use crate::commands::context::AppContext;
use crate::commands::render;
use crate::commands::spinner::Spinner;
use crate::output::Output;

/// Fetch `id`, rate it and add it through the same detail session the
/// browse loop uses.
pub async fn run_add(ctx: AppContext, id: &str, rating: u8, output: &Output) -> Result<()> {
    let rating = Rating::new(rating).map_err(|e| eyre!("{}", e))?;
    let mut watchlist = ctx.watchlist()?;

    if let Some(existing) = watchlist.get(id) {
        output.warn(format!(
            "{} is already on your list with rating {}",
            existing.title, existing.user_rating
        ));
        output.data(&json!({ "id": id, "added": false }));
        return Ok(());
    }

    let session = DetailSession::new(ctx.catalog()?);
    let spinner = Spinner::start(format!("Loading {}...", id), output.is_human());
    session.open(id);
    let state = session.settled().await;
    spinner.finish();

    if let Some(error) = state.error {
        return Err(eyre!("{}", error));
    }

    session.set_user_rating(rating);
    let title = state.detail.map(|d| d.title).unwrap_or_else(|| id.to_string());
    match session.commit_to_watchlist(&mut watchlist)? {
        CommitOutcome::Added => {
            output.success(format!("Added {} with rating {}", title, rating));
            output.data(&json!({ "id": id, "added": true }));
        }
        CommitOutcome::AlreadyWatched => {
            output.warn(format!("{} is already on your list", title));
            output.data(&json!({ "id": id, "added": false }));
        }
        CommitOutcome::NotReady => return Err(eyre!("Could not load {}", id)),
    }
    Ok(())
}

pub fn run_remove(ctx: AppContext, id: &str, output: &Output) -> Result<()> {
    let mut watchlist = ctx.watchlist()?;
    let title = watchlist.get(id).map(|m| m.title.clone());

    let removed = watchlist.remove(id)?;
    match title {
        Some(title) if removed => output.success(format!("Removed {}", title)),
        _ => output.warn(format!("{} is not on your list", id)),
    }
    output.data(&json!({ "id": id, "removed": removed }));
    Ok(())
}

pub fn run_list(ctx: &AppContext, output: &Output) -> Result<()> {
    let watchlist = ctx.watchlist()?;
    output.data(watchlist.list());
    if output.is_human() {
        if watchlist.is_empty() {
            output.info("Your watched list is empty");
        } else {
            output.table(&render::watched_table(watchlist.list()));
        }
    }
    Ok(())
}

pub fn run_summary(ctx: &AppContext, output: &Output) -> Result<()> {
    let summary = ctx.watchlist()?.summary();
    output.data(&summary);
    output.table(&render::summary_table(&summary));
    Ok(())
}
