use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::{Confirm, Input, Password, Select};
use popcorn_models::Rating;

/// Prompt for a string value; empty input is allowed
pub fn prompt_string(prompt: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| eyre!("Failed to read input: {}", e))
}

/// Prompt for a secret (masked input)
pub fn prompt_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| eyre!("Failed to read password: {}", e))
}

pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| eyre!("Failed to read confirmation: {}", e))
}

/// Pick one of `items`; `None` when the user backs out with Esc or q
pub fn prompt_select<T: ToString>(prompt: &str, items: &[T]) -> Result<Option<usize>> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()
        .map_err(|e| eyre!("Failed to read selection: {}", e))
}

/// Prompt until a rating in range is entered
pub fn prompt_rating(prompt: &str, current: Option<Rating>) -> Result<Rating> {
    let mut input = Input::<u8>::new()
        .with_prompt(format!("{} ({}-{})", prompt, Rating::MIN, Rating::MAX))
        .validate_with(|value: &u8| Rating::new(*value).map(|_| ()).map_err(|e| e.to_string()));

    if let Some(rating) = current {
        input = input.default(rating.value());
    }

    let value = input
        .interact_text()
        .map_err(|e| eyre!("Failed to read rating: {}", e))?;
    Rating::new(value).map_err(|e| eyre!("{}", e))
}
