use anyhow::Result;
use async_trait::async_trait;
use clap::{ArgMatches, Args, FromArgMatches};
use log::error;

use crate::commands::{option_parser, Command, FAILURE, SUCCESS};
use crate::gh::Context;
use crate::utils::RepoRef;

pub const NAME: &str = "pull";
const USAGE: &str = "gh pull [options] -r OWNER/NAME [ls]";

const SUBCOMMANDS: &[(&str, &str)] = &[("ls", "List pull requests (default)")];

#[derive(Args, Debug, Default)]
struct PullOptions {
    #[arg(short = 'r', long = "repository", value_name = "OWNER/NAME", help = "The repository to use")]
    repository: Option<RepoRef>,

    #[arg(
        short = 's',
        long = "state",
        default_value = "open",
        value_parser = ["open", "closed", "all"],
        help = "Only list pull requests in this state"
    )]
    state: String,
}

/// `gh pull`: work with pull requests
pub struct PullCommand {
    parser: clap::Command,
    options: PullOptions,
}

impl PullCommand {
    pub fn new() -> PullCommand {
        PullCommand {
            parser: PullOptions::augment_args(option_parser(NAME, USAGE))
                .about("Work with pull requests"),
            options: PullOptions::default(),
        }
    }
}

impl Default for PullCommand {
    fn default() -> Self {
        Self::new()
    }
}

pub fn factory() -> Box<dyn Command> {
    Box::new(PullCommand::new())
}

#[async_trait]
impl Command for PullCommand {
    fn name(&self) -> &'static str {
        NAME
    }

    fn subcommands(&self) -> &'static [(&'static str, &'static str)] {
        SUBCOMMANDS
    }

    fn parser(&mut self) -> &mut clap::Command {
        &mut self.parser
    }

    fn bind(&mut self, matches: &ArgMatches) -> Result<()> {
        self.options = PullOptions::from_arg_matches(matches)?;
        Ok(())
    }

    fn repository(&self) -> Option<&RepoRef> {
        self.options.repository.as_ref()
    }

    fn requires_repository(&self) -> bool {
        true
    }

    async fn run(&mut self, context: &mut Context, args: &[String]) -> Result<u8> {
        match args.first().map(String::as_str) {
            None | Some("ls") => {}
            Some(_) => {
                self.help();
                return Ok(FAILURE);
            }
        }
        let Some(repo) = &context.repo else {
            error!("No repository given, use -r OWNER/NAME");
            return Ok(FAILURE);
        };

        let pull_requests = context
            .github
            .pull_requests(&repo.owner.login, &repo.name, &self.options.state)
            .await?;
        for pull_request in pull_requests {
            println!(
                "#{} {} ({}) {}",
                pull_request.number, pull_request.title, pull_request.user.login, pull_request.html_url
            );
        }
        Ok(SUCCESS)
    }
}
