//! Command registry - name to command lookup, loaded on demand from a factory table.

use std::collections::BTreeMap;

use log::debug;
use thiserror::Error;

use crate::commands::{self, Command};

/// Constructs a command
pub type Factory = fn() -> Box<dyn Command>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("a command named `{0}` is already registered")]
    Duplicate(String),
    #[error("the factory for `{expected}` built a command named `{actual}`")]
    NameMismatch { expected: String, actual: String },
}

/// Maps command names to the single instance of each command.
///
/// Commands are constructed from the factory table the first time they are loaded and live for the
/// rest of the process.
#[derive(Default)]
pub struct CommandRegistry {
    factories: BTreeMap<&'static str, Factory>,
    commands: BTreeMap<&'static str, Box<dyn Command>>,
}

impl CommandRegistry {
    /// An empty registry that knows no commands
    pub fn new() -> CommandRegistry {
        CommandRegistry::default()
    }

    /// A registry that can load every command in `factories`.
    ///
    /// A name listed twice, or a factory building a command with another name, is an error.
    pub fn with_factories(factories: &[(&'static str, Factory)]) -> Result<CommandRegistry, RegistryError> {
        let mut registry = CommandRegistry::new();
        for (name, factory) in factories {
            construct(name, *factory)?;
            if registry.factories.insert(*name, *factory).is_some() {
                return Err(RegistryError::Duplicate(name.to_string()));
            }
        }
        Ok(registry)
    }

    /// A registry for the commands gh ships with
    pub fn builtin() -> Result<CommandRegistry, RegistryError> {
        CommandRegistry::with_factories(commands::FACTORIES)
    }

    pub fn register(&mut self, command: Box<dyn Command>) -> Result<(), RegistryError> {
        let name = command.name();
        if self.commands.contains_key(name) {
            return Err(RegistryError::Duplicate(name.to_string()));
        }
        debug!("Registered command {name}");
        self.commands.insert(name, command);
        Ok(())
    }

    /// Construct and register the command called `name`.
    ///
    /// Returns `Ok(false)` when no factory is known for `name`.
    pub fn load(&mut self, name: &str) -> Result<bool, RegistryError> {
        let Some(factory) = self.factories.get(name) else {
            debug!("No command named {name}");
            return Ok(false);
        };
        let command = construct(name, *factory)?;
        self.register(command)?;
        Ok(true)
    }

    pub fn lookup(&mut self, name: &str) -> Option<&mut Box<dyn Command>> {
        self.commands.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Every registered or loadable command name, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .factories
            .keys()
            .chain(self.commands.keys())
            .copied()
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

fn construct(name: &str, factory: Factory) -> Result<Box<dyn Command>, RegistryError> {
    let command = factory();
    if command.name() != name {
        return Err(RegistryError::NameMismatch {
            expected: name.to_string(),
            actual: command.name().to_string(),
        });
    }
    Ok(command)
}
