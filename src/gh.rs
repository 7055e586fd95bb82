///! This module defines the code that looks up and runs gh commands.
pub mod login;
pub mod repo;

use std::path::PathBuf;

use anyhow::Result;
use clap::CommandFactory;
use log::{debug, error};

use crate::commands::{self, Opts, COMMAND_UNKNOWN, HELP, SUCCESS};
use crate::config;
use crate::github::{GitHub, OctocrabClient, Repository};
use crate::prompt::{Prompt, Terminal};
use crate::registry::CommandRegistry;

pub use login::login;
pub use repo::get_repo;

/// A context object that holds state for the gh commands
pub struct Context {
    pub opts: Opts,
    pub github: Box<dyn GitHub>,
    pub prompt: Box<dyn Prompt>,
    /// The repository resolved by `get_repo`, if any
    pub repo: Option<Repository>,
}

impl Context {
    pub fn new(opts: Opts, mut github: Box<dyn GitHub>, prompt: Box<dyn Prompt>) -> Context {
        github.set_user_agent(&user_agent());
        Context {
            opts,
            github,
            prompt,
            repo: None,
        }
    }

    /// The credentials file, from `--config` or the default location
    pub fn config_path(&self) -> Result<PathBuf> {
        config::resolve_config_path(self.opts.config_path.as_deref())
    }
}

fn user_agent() -> String {
    format!("github-cli/{} ({})", clap::crate_version!(), login::APP_URL)
}

/// Top level usage, options and the commands gh knows about
pub fn top_level_help(registry: &CommandRegistry) -> String {
    let mut help = Opts::command().render_help().to_string();
    help.push_str("\nCommands:\n");
    for name in registry.names() {
        help.push_str(&format!("  {name}\n"));
    }
    help
}

/// Look up the requested command and run it, returning the process exit status
pub async fn dispatch(registry: &mut CommandRegistry, context: &mut Context) -> Result<u8> {
    let mut args = context.opts.args.clone();
    if args.is_empty() {
        print!("{}", top_level_help(registry));
        return Ok(SUCCESS);
    }
    let name = args.remove(0);

    if !registry.contains(&name) {
        registry.load(&name)?;
    }
    let Some(command) = registry.lookup(&name) else {
        error!("Unknown command: {name}. Run `gh --help` to see the available commands.");
        return Ok(COMMAND_UNKNOWN);
    };

    if context.opts.help {
        command.help();
        return Ok(SUCCESS);
    }

    let matches = command.parser().try_get_matches_from_mut(&args)?;
    if matches.get_flag(HELP) {
        command.help();
        return Ok(SUCCESS);
    }
    command.bind(&matches)?;
    let args = commands::leftover_args(&matches);

    if command.requires_repository() {
        context.repo = get_repo(command.as_mut(), context).await?;
    }
    if command.requires_login() {
        login(context).await?;
    }

    debug!("Running {name} with arguments {:?}", args);
    command.run(context, &args).await
}

/// Run the gh CLI
pub async fn cli(opts: Opts) -> Result<u8> {
    let mut registry = CommandRegistry::builtin()?;
    let mut context = Context::new(opts, Box::new(OctocrabClient::new()), Box::new(Terminal));
    dispatch(&mut registry, &mut context).await
}
