use anyhow::Result;
use async_trait::async_trait;
use clap::{ArgMatches, Args, FromArgMatches};
use log::error;
use serde::Serialize;

use crate::commands::{option_parser, Command, FAILURE, SUCCESS};
use crate::gh::Context;
use crate::github::Repository;
use crate::utils::RepoRef;

pub const NAME: &str = "repo";
const USAGE: &str = "gh repo [options] -r OWNER/NAME";

#[derive(Args, Debug, Default)]
struct RepoOptions {
    #[arg(short = 'r', long = "repository", value_name = "OWNER/NAME", help = "The repository to show")]
    repository: Option<RepoRef>,
}

/// The summary `gh repo` prints, as YAML
#[derive(Debug, Serialize)]
struct RepoSummary<'a> {
    full_name: &'a str,
    description: Option<&'a str>,
    url: &'a str,
    default_branch: Option<&'a str>,
    private: bool,
    stars: u32,
    forks: u32,
    open_issues: u32,
}

impl<'a> From<&'a Repository> for RepoSummary<'a> {
    fn from(repo: &'a Repository) -> Self {
        RepoSummary {
            full_name: &repo.full_name,
            description: repo.description.as_deref(),
            url: repo.html_url.as_str(),
            default_branch: repo.default_branch.as_deref(),
            private: repo.private,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            open_issues: repo.open_issues_count,
        }
    }
}

/// `gh repo`: show a repository
pub struct RepoCommand {
    parser: clap::Command,
    options: RepoOptions,
}

impl RepoCommand {
    pub fn new() -> RepoCommand {
        RepoCommand {
            parser: RepoOptions::augment_args(option_parser(NAME, USAGE))
                .about("Show information about a repository"),
            options: RepoOptions::default(),
        }
    }
}

impl Default for RepoCommand {
    fn default() -> Self {
        Self::new()
    }
}

pub fn factory() -> Box<dyn Command> {
    Box::new(RepoCommand::new())
}

#[async_trait]
impl Command for RepoCommand {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parser(&mut self) -> &mut clap::Command {
        &mut self.parser
    }

    fn bind(&mut self, matches: &ArgMatches) -> Result<()> {
        self.options = RepoOptions::from_arg_matches(matches)?;
        Ok(())
    }

    fn repository(&self) -> Option<&RepoRef> {
        self.options.repository.as_ref()
    }

    fn requires_repository(&self) -> bool {
        true
    }

    fn requires_login(&self) -> bool {
        false
    }

    async fn run(&mut self, context: &mut Context, _args: &[String]) -> Result<u8> {
        let Some(repo) = &context.repo else {
            error!("No repository given, use -r OWNER/NAME");
            return Ok(FAILURE);
        };
        print!("{}", serde_yaml::to_string(&RepoSummary::from(repo))?);
        Ok(SUCCESS)
    }
}
