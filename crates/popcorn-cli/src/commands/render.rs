use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use popcorn_core::{ViewState, WatchSummary};
use popcorn_models::{MovieDetail, SearchResultItem, WatchedMovie};
use crate::output::new_table;

pub fn results_table(results: &[SearchResultItem]) -> Table {
    let mut table = new_table();
    table.set_header(vec![header("Id"), header("Title"), header("Year"), header("Type")]);
    for item in results {
        table.add_row(vec![
            Cell::new(&item.id),
            Cell::new(&item.title),
            Cell::new(&item.year),
            Cell::new(item.kind.as_deref().unwrap_or("-")),
        ]);
    }
    table
}

pub fn detail_table(detail: &MovieDetail, view: Option<&ViewState>) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new(&detail.title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(&detail.year),
    ]);

    let rows = [
        ("Id", detail.id.clone()),
        ("Released", or_dash(&detail.released)),
        ("Runtime", minutes(detail.runtime_minutes)),
        ("IMDb rating", imdb(detail.imdb_rating)),
        ("Genre", or_dash(&detail.genre)),
        ("Director", or_dash(&detail.director)),
        ("Actors", or_dash(&detail.actors)),
        ("Plot", or_dash(&detail.plot)),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }

    if let Some(view) = view {
        let watched = match view.watched_user_rating {
            Some(rating) => format!("{} (your rating: {})", "✓".green(), rating),
            None => "✗".red().to_string(),
        };
        table.add_row(vec![Cell::new("Watched"), Cell::new(watched)]);
    }
    table
}

pub fn watched_table(movies: &[WatchedMovie]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        header("Id"),
        header("Title"),
        header("Year"),
        header("IMDb"),
        header("Yours"),
        header("Runtime"),
        header("Added"),
    ]);
    for movie in movies {
        table.add_row(vec![
            Cell::new(&movie.id),
            Cell::new(&movie.title),
            Cell::new(&movie.year),
            Cell::new(imdb(movie.imdb_rating)),
            Cell::new(movie.user_rating.to_string()),
            Cell::new(minutes(movie.runtime_minutes)),
            Cell::new(movie.added_at.format("%Y-%m-%d").to_string()),
        ]);
    }
    table
}

pub fn summary_table(summary: &WatchSummary) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Watched").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(summary.count.to_string()),
    ]);
    table.add_row(vec![Cell::new("Avg IMDb rating"), Cell::new(format!("{:.1}", summary.avg_imdb_rating))]);
    table.add_row(vec![Cell::new("Avg your rating"), Cell::new(format!("{:.1}", summary.avg_user_rating))]);
    table.add_row(vec![Cell::new("Avg runtime"), Cell::new(format!("{:.0} min", summary.avg_runtime_minutes))]);
    table
}

fn header(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn or_dash(value: &str) -> String {
    if value.is_empty() { "-".to_string() } else { value.to_string() }
}

// 0 means the catalog had no value
fn minutes(value: u32) -> String {
    if value == 0 { "-".to_string() } else { format!("{} min", value) }
}

fn imdb(value: f64) -> String {
    if value == 0.0 { "-".to_string() } else { format!("{:.1}", value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail() -> MovieDetail {
        MovieDetail {
            id: "tt0133093".to_string(),
            title: "The Matrix".to_string(),
            year: "1999".to_string(),
            poster_url: String::new(),
            runtime_minutes: 0,
            imdb_rating: 8.7,
            plot: String::new(),
            released: "31 Mar 1999".to_string(),
            actors: String::new(),
            director: "Lana Wachowski, Lilly Wachowski".to_string(),
            genre: "Action, Sci-Fi".to_string(),
        }
    }

    #[test]
    fn test_missing_values_render_as_dash() {
        let rendered = detail_table(&detail(), None).to_string();
        assert!(rendered.contains("8.7"));
        assert!(rendered.contains("31 Mar 1999"));
        assert!(!rendered.contains("0 min"));
        assert!(!rendered.contains("Watched"));
    }

    #[test]
    fn test_results_table_lists_every_item() {
        let results = vec![
            SearchResultItem {
                id: "tt0133093".to_string(),
                title: "The Matrix".to_string(),
                year: "1999".to_string(),
                poster_url: String::new(),
                kind: Some("movie".to_string()),
            },
            SearchResultItem {
                id: "tt0234215".to_string(),
                title: "The Matrix Reloaded".to_string(),
                year: "2003".to_string(),
                poster_url: String::new(),
                kind: None,
            },
        ];
        let rendered = results_table(&results).to_string();
        assert!(rendered.contains("tt0133093"));
        assert!(rendered.contains("The Matrix Reloaded"));
    }
}
