use std::path::PathBuf;

use anyhow::Result;
use log::{debug, info, warn};
use thiserror::Error;

use crate::config;
use crate::gh::Context;
use crate::prompt::Prompt;

/// Scopes requested for new tokens
pub const SCOPES: &[&str] = &["user", "repo", "gist"];
pub const APP_NAME: &str = "github-cli";
pub const APP_URL: &str = "https://github.com/sigmavirus24/github-cli";

/// How many empty answers a prompt accepts before giving up
pub const MAX_PROMPT_ATTEMPTS: usize = 5;

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("no {field} entered after {attempts} attempts, aborting")]
    EmptyInput { field: &'static str, attempts: usize },
    #[error("{} has no token in its [github] section", .path.display())]
    MissingToken { path: PathBuf },
}

/// Authenticate `context.github`.
///
/// Uses the token in the credentials file when there is a readable and writable one. Otherwise
/// asks for a username and password, exchanges them for a new token and saves it. With
/// `--basic-auth` the username and password are used directly and nothing is saved.
pub async fn login(context: &mut Context) -> Result<()> {
    if context.github.is_authenticated() {
        debug!("Already authenticated");
        return Ok(());
    }

    if context.opts.basic_auth {
        let (username, password) = prompt_credentials(context.prompt.as_mut())?;
        debug!("Using basic authentication as {username}");
        context.github.login_basic(&username, &password);
        return Ok(());
    }

    let config_path = context.config_path()?;
    if config::is_read_write(&config_path) {
        return match config::read_token(&config_path)? {
            Some(token) => {
                context.github.login(&token);
                Ok(())
            }
            None => Err(LoginError::MissingToken { path: config_path }.into()),
        };
    }

    let (username, password) = prompt_credentials(context.prompt.as_mut())?;
    let authorization = context
        .github
        .authorize(&username, &password, SCOPES, APP_NAME, APP_URL)
        .await?;
    context.github.login(&authorization.token);
    config::write_token(&config_path, &authorization.token)?;
    info!("Saved access token to {}", config_path.display());
    Ok(())
}

fn prompt_credentials(prompt: &mut dyn Prompt) -> Result<(String, String)> {
    let username = prompt_non_empty("username", || prompt.input("Username"))?;
    let password = prompt_non_empty("password", || prompt.password("Password"))?;
    Ok((username, password))
}

fn prompt_non_empty(field: &'static str, mut ask: impl FnMut() -> Result<String>) -> Result<String> {
    for attempt in 1..=MAX_PROMPT_ATTEMPTS {
        let value = ask()?;
        if !value.is_empty() {
            return Ok(value);
        }
        warn!("The {field} cannot be empty ({attempt}/{MAX_PROMPT_ATTEMPTS})");
    }
    Err(LoginError::EmptyInput {
        field,
        attempts: MAX_PROMPT_ATTEMPTS,
    }
    .into())
}
