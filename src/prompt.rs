//! Interactive terminal input

use anyhow::Result;
use dialoguer::{Input, Password};

/// Something that can ask the user for a line of text
pub trait Prompt: Send + Sync {
    /// Ask for a value, echoing what is typed
    fn input(&mut self, prompt: &str) -> Result<String>;

    /// Ask for a value without echoing it
    fn password(&mut self, prompt: &str) -> Result<String>;
}

/// Prompts on the controlling terminal using dialoguer
#[derive(Debug, Default)]
pub struct Terminal;

impl Prompt for Terminal {
    fn input(&mut self, prompt: &str) -> Result<String> {
        let value = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(value)
    }

    fn password(&mut self, prompt: &str) -> Result<String> {
        let value = Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?;
        Ok(value)
    }
}
