use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use popcorn_config::{resolve_api_key, Config, CredentialStore, PathManager, API_KEY_ENV};
use serde_json::json;
use tracing::info;
use crate::commands::prompts::{prompt_password, prompt_yes_no};
use crate::commands::spinner::is_interactive;
use crate::output::{new_table, Output};
use crate::ConfigCommands;

pub async fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    match cmd {
        ConfigCommands::Show { full } => show_config(&paths, full, output),
        ConfigCommands::ApiKey { key } => configure_api_key(&paths, key, output),
        ConfigCommands::Init { force } => init_config(&paths, force, output),
    }
}

fn show_config(paths: &PathManager, full: bool, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    let mut credentials = CredentialStore::new(paths.credentials_file());
    credentials
        .load()
        .map_err(|e| eyre!("Failed to load credentials: {}", e))?;

    let key = resolve_api_key(&credentials).ok();
    let key_source = if std::env::var(API_KEY_ENV).map(|v| !v.trim().is_empty()).unwrap_or(false) {
        API_KEY_ENV.to_string()
    } else if key.is_some() {
        "credentials.toml".to_string()
    } else {
        "-".to_string()
    };
    let key_display = match &key {
        Some(key) if full => key.clone(),
        Some(key) => mask_string(key),
        None => mask_string(""),
    };
    let data_dir = config
        .storage
        .data_dir
        .clone()
        .unwrap_or_else(|| paths.data_dir());

    output.data(&json!({
        "config_file": config_file,
        "config_file_exists": config_file.exists(),
        "config": config,
        "data_dir": data_dir,
        "api_key": key_display,
        "api_key_source": key_source,
    }));
    if !output.is_human() {
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!(
            "No config file at {}; showing defaults. Run 'popcorn config init' to create one.",
            config_file.display()
        ));
    }

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Setting").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new("Value").fg(Color::Cyan).add_attribute(Attribute::Bold),
    ]);
    let rows = [
        ("Config file", config_file.display().to_string()),
        ("Catalog URL", config.catalog.base_url.clone()),
        ("Timeout", format!("{}s", config.catalog.timeout_seconds)),
        ("Min query length", config.search.min_query_length.to_string()),
        ("Watched list key", config.storage.watched_key.clone()),
        ("Data directory", data_dir.display().to_string()),
        (
            "Log file",
            config
                .logging
                .resolve_file(paths)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "stderr".to_string()),
        ),
        ("API key", key_display),
        ("API key source", key_source),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    output.table(&table);
    Ok(())
}

fn configure_api_key(paths: &PathManager, key: Option<String>, output: &Output) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None if is_interactive() => prompt_password("OMDb API key")?,
        None => return Err(eyre!("No API key given; pass --key or run in a terminal")),
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(eyre!("API key cannot be empty"));
    }

    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create config directories: {}", e))?;

    let mut credentials = CredentialStore::new(paths.credentials_file());
    credentials
        .load()
        .map_err(|e| eyre!("Failed to load credentials: {}", e))?;
    credentials.set_api_key(key);
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;

    info!(path = %paths.credentials_file().display(), "API key stored");
    output.success(format!("API key saved to {}", paths.credentials_file().display()));
    if std::env::var(API_KEY_ENV).is_ok() {
        output.warn(format!("{} is set and takes precedence over the stored key", API_KEY_ENV));
    }
    Ok(())
}

fn init_config(paths: &PathManager, force: bool, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if config_file.exists() && !force {
        let overwrite = is_interactive()
            && output.is_human()
            && prompt_yes_no(
                &format!("{} exists. Overwrite with defaults?", config_file.display()),
                false,
            )?;
        if !overwrite {
            output.warn(format!("Kept existing config at {}", config_file.display()));
            return Ok(());
        }
    }

    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create config directories: {}", e))?;
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {}", config_file.display(), e))?;

    output.success(format!("Wrote default config to {}", config_file.display()));
    Ok(())
}

/// Show the first and last two characters of a secret
fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return "<not set>".to_string();
    }
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
