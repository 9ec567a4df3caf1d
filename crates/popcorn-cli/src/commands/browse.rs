use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use popcorn_core::{derive_view_state, CommitOutcome, DetailSession, SearchSession, WatchlistStore};
use tracing::debug;
use crate::commands::context::AppContext;
use crate::commands::prompts::{prompt_rating, prompt_select, prompt_string, prompt_yes_no};
use crate::commands::render;
use crate::commands::spinner::{is_interactive, Spinner};
use crate::output::Output;

enum DetailAction {
    Rate,
    Commit,
    Remove,
    Back,
}

impl DetailAction {
    fn label(&self) -> &'static str {
        match self {
            DetailAction::Rate => "Rate",
            DetailAction::Commit => "Add to list",
            DetailAction::Remove => "Remove from list",
            DetailAction::Back => "Back to results",
        }
    }
}

/// Search, open a result, rate it and add it, until an empty query.
pub async fn run_browse(ctx: AppContext, output: &Output) -> Result<()> {
    if !is_interactive() || !output.is_human() {
        return Err(eyre!("browse needs an interactive terminal and --output human"));
    }

    let catalog = ctx.catalog()?;
    let search = SearchSession::with_config(catalog.clone(), &ctx.config.search);
    let detail = DetailSession::new(catalog);
    let mut watchlist = ctx.watchlist()?;

    output.info(format!(
        "{} {} watched. Enter an empty query to quit.",
        "Popcorn".bright_cyan().bold(),
        watchlist.len()
    ));

    loop {
        let query = prompt_string("Search")?;
        if query.trim().is_empty() {
            break;
        }

        let spinner = Spinner::start("Searching...", true);
        search.search(query.trim());
        let state = search.settled().await;
        spinner.finish();

        if let Some(error) = &state.error {
            output.error(error);
            continue;
        }
        if state.results.is_empty() {
            output.warn(format!(
                "No results (queries need at least {} characters)",
                ctx.config.search.min_query_length
            ));
            continue;
        }

        // Rebuilt each round so the watched marks follow the list
        loop {
            let labels: Vec<String> = state
                .results
                .iter()
                .map(|item| {
                    let mark = if watchlist.contains(&item.id) { "✓ " } else { "  " };
                    format!("{}{} ({})", mark, item.title, item.year)
                })
                .collect();

            let Some(index) = prompt_select("Pick a title (Esc for a new search)", &labels)? else {
                break;
            };
            browse_detail(&detail, &mut watchlist, &state.results[index].id, output).await?;
        }
    }

    search.clear();
    detail.close();
    Ok(())
}

async fn browse_detail(
    detail: &DetailSession,
    watchlist: &mut WatchlistStore,
    id: &str,
    output: &Output,
) -> Result<()> {
    let spinner = Spinner::start("Loading...", true);
    detail.toggle(id);
    let mut state = detail.settled().await;
    spinner.finish();

    if let Some(error) = &state.error {
        output.error(error);
        detail.close();
        return Ok(());
    }

    loop {
        let view = derive_view_state(&state, watchlist.list());
        if let Some(movie) = &state.detail {
            output.table(&render::detail_table(movie, Some(&view)));
        }
        if let Some(rating) = state.user_rating {
            output.info(format!("Your rating: {} (revised {} times)", rating, state.rating_revision_count));
        }

        let mut actions = Vec::new();
        if view.is_watched {
            actions.push(DetailAction::Remove);
        }
        if view.can_rate {
            actions.push(DetailAction::Rate);
        }
        if view.can_commit {
            actions.push(DetailAction::Commit);
        }
        actions.push(DetailAction::Back);

        let labels: Vec<&str> = actions.iter().map(DetailAction::label).collect();
        let choice = prompt_select("What now?", &labels)?.map(|i| &actions[i]);

        match choice {
            Some(DetailAction::Rate) => {
                let rating = prompt_rating("Your rating", state.user_rating)?;
                detail.set_user_rating(rating);
            }
            Some(DetailAction::Commit) => {
                match detail.commit_to_watchlist(watchlist)? {
                    CommitOutcome::Added => output.success("Added to your list"),
                    CommitOutcome::AlreadyWatched => output.warn("Already on your list"),
                    CommitOutcome::NotReady => output.warn("Rate the title first"),
                }
                if !detail.state().is_open() {
                    return Ok(());
                }
            }
            Some(DetailAction::Remove) => {
                if prompt_yes_no("Remove from your list?", false)? && watchlist.remove(id)? {
                    output.success("Removed from your list");
                }
            }
            Some(DetailAction::Back) | None => {
                detail.close();
                return Ok(());
            }
        }

        state = detail.state();
        debug!(id = %id, phase = ?state.phase, "Detail state refreshed");
    }
}
