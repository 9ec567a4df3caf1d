use clap::{ArgAction, Parser, Subcommand};
use commands::{browse, config, context::AppContext, search, watchlist};
use popcorn_config::{Config, PathManager};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "popcorn")]
#[command(about = "Popcorn - search movies and keep a list of what you've watched")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog by title
    #[command(long_about = "Search the movie catalog by title. Queries shorter than the configured minimum length (3 characters by default) return no results without contacting the catalog.")]
    Search {
        /// Title or part of a title
        query: String,
    },
    /// Show full details for a title
    Show {
        /// IMDb id, e.g. tt0133093
        id: String,
    },
    /// Rate a title and add it to the watched list
    #[command(long_about = "Fetch a title from the catalog, rate it, and add it to the watched list. Adding a title that is already on the list leaves the existing entry untouched.")]
    Add {
        /// IMDb id, e.g. tt0133093
        id: String,

        /// Your rating, 1-10
        #[arg(long, short = 'r', value_parser = clap::value_parser!(u8).range(1..=10))]
        rating: u8,
    },
    /// Remove a title from the watched list
    Remove {
        /// IMDb id of the entry to remove
        id: String,
    },
    /// List the watched movies
    List,
    /// Show averages over the watched list
    Summary,
    /// Interactive search, rate and add loop
    Browse,
    /// Manage configuration and the catalog API key
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Store the catalog API key in the credentials file
    #[command(long_about = "Store the OMDb API key in credentials.toml. The OMDB_API_KEY environment variable still takes precedence when set. Prompts for the key when --key is not given.")]
    ApiKey {
        /// API key (if not provided, will prompt)
        #[arg(long)]
        key: Option<String>,
    },
    /// Write a config file with the default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // A broken config file must not keep `config init` from running, so the
    // log file setting is best-effort here
    let paths = PathManager::default();
    let log_file = Config::load_or_default(&paths.config_file())
        .ok()
        .and_then(|config| config.logging.resolve_file(&paths));
    logging::init_logging(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Search { query } => search::run_search(&AppContext::load()?, &query, &output).await,
        Commands::Show { id } => search::run_show(&AppContext::load()?, &id, &output).await,
        Commands::Add { id, rating } => watchlist::run_add(AppContext::load()?, &id, rating, &output).await,
        Commands::Remove { id } => watchlist::run_remove(AppContext::load()?, &id, &output),
        Commands::List => watchlist::run_list(&AppContext::load()?, &output),
        Commands::Summary => watchlist::run_summary(&AppContext::load()?, &output),
        Commands::Browse => browse::run_browse(AppContext::load()?, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output).await,
    }
}
