use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use clap::{ArgMatches, Args, FromArgMatches};
use log::{debug, error};

use crate::commands::{option_parser, Command, FAILURE, SUCCESS};
use crate::gh::Context;
use crate::github::{GistFile, NewGist};

pub const NAME: &str = "gist";
const USAGE: &str = "gh gist [options] <create FILE...|ls>";

const SUBCOMMANDS: &[(&str, &str)] = &[
    ("ls", "List your gists"),
    ("create", "Create a gist from one or more files"),
];

#[derive(Args, Debug, Default)]
struct GistOptions {
    #[arg(short = 'd', long = "description", help = "Description of the new gist")]
    description: Option<String>,

    #[arg(short = 'p', long = "private", help = "Create a secret gist")]
    private: bool,
}

/// `gh gist`: create and list gists
pub struct GistCommand {
    parser: clap::Command,
    options: GistOptions,
}

impl GistCommand {
    pub fn new() -> GistCommand {
        GistCommand {
            parser: GistOptions::augment_args(option_parser(NAME, USAGE))
                .about("Work with gists"),
            options: GistOptions::default(),
        }
    }

    fn new_gist(&self, paths: &[String]) -> Result<NewGist> {
        let mut files = BTreeMap::new();
        for path in paths {
            let path = Path::new(path);
            let Some(file_name) = path.file_name() else {
                return Err(anyhow::anyhow!("Not a file: {}", path.display()));
            };
            debug!("Reading {}", path.display());
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Error reading {}: {e}", path.display()))?;
            files.insert(file_name.to_string_lossy().into_owned(), GistFile { content });
        }
        Ok(NewGist {
            description: self.options.description.clone(),
            public: !self.options.private,
            files,
        })
    }

    async fn create(&self, context: &Context, paths: &[String]) -> Result<u8> {
        if paths.is_empty() {
            error!("No files given, usage: {USAGE}");
            return Ok(FAILURE);
        }
        let new_gist = self.new_gist(paths)?;
        let gist = context.github.create_gist(&new_gist).await?;
        println!("{}", gist.html_url);
        Ok(SUCCESS)
    }

    async fn list(&self, context: &Context) -> Result<u8> {
        for gist in context.github.gists().await? {
            println!(
                "{}  {}  {}",
                gist.id,
                gist.created_at.format("%Y-%m-%d"),
                gist.description.as_deref().unwrap_or("")
            );
        }
        Ok(SUCCESS)
    }
}

impl Default for GistCommand {
    fn default() -> Self {
        Self::new()
    }
}

pub fn factory() -> Box<dyn Command> {
    Box::new(GistCommand::new())
}

#[async_trait]
impl Command for GistCommand {
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
        self.options = GistOptions::from_arg_matches(matches)?;
        Ok(())
    }

    async fn run(&mut self, context: &mut Context, args: &[String]) -> Result<u8> {
        match args.split_first() {
            Some((subcommand, paths)) if subcommand == "create" => self.create(context, paths).await,
            Some((subcommand, _)) if subcommand == "ls" => self.list(context).await,
            _ => {
                self.help();
                Ok(FAILURE)
            }
        }
    }
}
