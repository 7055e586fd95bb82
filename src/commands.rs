///! This module defines the global options, the `Command` trait and the commands gh knows about.
pub mod gist;
pub mod pull;
pub mod repo;

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches, Parser};
use clap_verbosity_flag::Verbosity;

use crate::gh::Context;
use crate::registry::Factory;
use crate::utils::RepoRef;

pub const SUCCESS: u8 = 0;
pub const FAILURE: u8 = 1;
pub const COMMAND_UNKNOWN: u8 = 127;

/// Id of the `-h/--help` flag every command parser carries
pub const HELP: &str = "help";
/// Id of the positional that collects everything after the options
pub const ARGS: &str = "args";

/// Every command gh can load, by name
pub const FACTORIES: &[(&str, Factory)] = &[
    (gist::NAME, gist::factory as Factory),
    (pull::NAME, pull::factory as Factory),
    (repo::NAME, repo::factory as Factory),
];

/// The top level clap parser and CLI arguments
#[derive(Parser, Debug)]
#[command(name = "gh")]
#[command(version = clap::crate_version!())]
#[command(about = "A small GitHub command line client")]
#[command(override_usage = "gh [options] <command> [command options] [args...]")]
#[command(disable_help_flag = true)]
pub struct Opts {
    #[arg(short = 'h', long = "help", help = "Show help")]
    pub help: bool,

    #[arg(short = 'u', long = "basic-auth", help = "Force basic authentication")]
    pub basic_auth: bool,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        help = "Credentials file [default: $HOME/.ghconfig]"
    )]
    pub config_path: Option<PathBuf>,

    #[arg(
        short = 'L',
        long = "location-aware",
        action = ArgAction::SetFalse,
        help = "Disable location awareness"
    )]
    pub loc_aware: bool,

    #[command(flatten)]
    pub verbose: Verbosity,

    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        help = "The command to run, followed by its options and arguments"
    )]
    pub args: Vec<String>,
}

/// Builds the option parser every command owns.
///
/// Parsing stops at the first positional token so trailing subcommand arguments pass through
/// untouched, and clap's own help flag is replaced with a plain `-h/--help` flag so that
/// `Command::help` can append the subcommand listing.
pub fn option_parser(name: &'static str, usage: &'static str) -> clap::Command {
    clap::Command::new(name)
        .override_usage(usage)
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new(HELP)
                .short('h')
                .long("help")
                .action(ArgAction::SetTrue)
                .help("Show help"),
        )
        .arg(
            Arg::new(ARGS)
                .value_name("ARGS")
                .action(ArgAction::Append)
                .num_args(1..)
                .trailing_var_arg(true),
        )
}

/// The positional arguments left over after a command's options
pub fn leftover_args(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>(ARGS)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// A named gh command
#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &'static str;

    /// Subcommand names and their descriptions, listed by `help`
    fn subcommands(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// The command's own option parser, see `option_parser`
    fn parser(&mut self) -> &mut clap::Command;

    /// Take the options this command cares about from its parsed arguments
    fn bind(&mut self, matches: &ArgMatches) -> Result<()>;

    /// The repository this command is bound to, if any
    fn repository(&self) -> Option<&RepoRef> {
        None
    }

    fn requires_repository(&self) -> bool {
        false
    }

    fn requires_login(&self) -> bool {
        true
    }

    async fn run(&mut self, context: &mut Context, args: &[String]) -> Result<u8>;

    fn help_text(&mut self) -> String {
        let mut help = self.parser().render_help().to_string();
        let mut subcommands = self.subcommands().to_vec();
        if !subcommands.is_empty() {
            subcommands.sort_by_key(|(name, _)| *name);
            help.push_str("\nSubcommands:\n");
            for (name, description) in subcommands {
                help.push_str(&format!("  {name}:\n\t{description}\n"));
            }
        }
        help
    }

    fn help(&mut self) {
        print!("{}", self.help_text());
    }
}
