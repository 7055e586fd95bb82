//! Test doubles for the GitHub client, the terminal and commands

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use clap::{ArgMatches, Args, FromArgMatches, Parser};

use crate::commands::{option_parser, Command, Opts, SUCCESS};
use crate::gh::Context;
use crate::github::{Account, Authorization, Gist, GitHub, NewGist, PullRequest, Repository};
use crate::prompt::Prompt;
use crate::utils::RepoRef;

/// Build a context from global options as they would appear after `gh`
pub fn context(args: &[&str], github: &MockGitHub, prompt: ScriptedPrompt) -> Context {
    let opts = Opts::try_parse_from(std::iter::once("gh").chain(args.iter().copied())).unwrap();
    Context::new(opts, Box::new(github.clone()), Box::new(prompt))
}

#[derive(Debug, Default)]
pub struct MockState {
    pub user_agent: Option<String>,
    pub token: Option<String>,
    pub basic: Option<(String, String)>,
    pub logins: usize,
    /// Remote calls, in order
    pub calls: Vec<String>,
    pub authorized: Vec<(String, String, Vec<String>)>,
    pub created_gists: Vec<NewGist>,
}

/// An in-memory `GitHub` whose state is shared between clones
#[derive(Debug, Clone, Default)]
pub struct MockGitHub {
    state: Arc<Mutex<MockState>>,
    new_token: Option<String>,
    authorize_fails: bool,
}

impl MockGitHub {
    pub fn new() -> MockGitHub {
        MockGitHub::default()
    }

    /// The token `authorize` hands out
    pub fn with_token(mut self, token: &str) -> MockGitHub {
        self.new_token = Some(token.to_owned());
        self
    }

    pub fn failing_authorize(mut self) -> MockGitHub {
        self.authorize_fails = true;
        self
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    fn record(&self, call: String) {
        self.state().calls.push(call);
    }
}

pub fn repository(owner: &str, name: &str) -> Repository {
    Repository {
        name: name.to_owned(),
        full_name: format!("{owner}/{name}"),
        owner: Account {
            login: owner.to_owned(),
            r#type: "User".to_owned(),
        },
        description: Some("A test repository".to_owned()),
        html_url: format!("https://github.com/{owner}/{name}").parse().unwrap(),
        default_branch: Some("main".to_owned()),
        private: false,
        stargazers_count: 3,
        forks_count: 1,
        open_issues_count: 2,
    }
}

pub fn gist(id: &str, description: Option<&str>) -> Gist {
    Gist {
        id: id.to_owned(),
        html_url: format!("https://gist.github.com/{id}").parse().unwrap(),
        description: description.map(str::to_owned),
        public: true,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

#[async_trait]
impl GitHub for MockGitHub {
    fn set_user_agent(&mut self, user_agent: &str) {
        self.state().user_agent = Some(user_agent.to_owned());
    }

    fn login(&mut self, token: &str) {
        let mut state = self.state();
        state.token = Some(token.to_owned());
        state.logins += 1;
    }

    fn login_basic(&mut self, username: &str, password: &str) {
        let mut state = self.state();
        state.basic = Some((username.to_owned(), password.to_owned()));
        state.logins += 1;
    }

    fn is_authenticated(&self) -> bool {
        let state = self.state();
        state.token.is_some() || state.basic.is_some()
    }

    async fn repository(&self, owner: &str, name: &str) -> Result<Repository> {
        self.record(format!("repository {owner}/{name}"));
        Ok(repository(owner, name))
    }

    async fn authorize(
        &self,
        username: &str,
        password: &str,
        scopes: &[&str],
        _app_name: &str,
        _app_url: &str,
    ) -> Result<Authorization> {
        self.record(format!("authorize {username}"));
        if self.authorize_fails {
            return Err(anyhow::anyhow!("GitHub: Bad credentials"));
        }
        self.state().authorized.push((
            username.to_owned(),
            password.to_owned(),
            scopes.iter().map(|s| s.to_string()).collect(),
        ));
        Ok(Authorization {
            token: self.new_token.clone().unwrap_or_else(|| "TOKEN".to_owned()),
        })
    }

    async fn create_gist(&self, new_gist: &NewGist) -> Result<Gist> {
        self.record("create_gist".to_owned());
        self.state().created_gists.push(new_gist.clone());
        Ok(gist("abc123", new_gist.description.as_deref()))
    }

    async fn gists(&self) -> Result<Vec<Gist>> {
        self.record("gists".to_owned());
        Ok(vec![gist("abc123", Some("notes")), gist("def456", None)])
    }

    async fn pull_requests(&self, owner: &str, name: &str, state: &str) -> Result<Vec<PullRequest>> {
        self.record(format!("pull_requests {owner}/{name} {state}"));
        Ok(vec![PullRequest {
            number: 7,
            title: "Fix the thing".to_owned(),
            state: "open".to_owned(),
            html_url: format!("https://github.com/{owner}/{name}/pull/7").parse().unwrap(),
            user: Account {
                login: "octocat".to_owned(),
                r#type: "User".to_owned(),
            },
        }])
    }
}

/// Answers prompts from a script, recording each question
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    answers: Arc<Mutex<VecDeque<String>>>,
    asked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> ScriptedPrompt {
        ScriptedPrompt {
            answers: Arc::new(Mutex::new(answers.iter().map(|a| a.to_string()).collect())),
            asked: Arc::default(),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }

    fn answer(&mut self, prompt: &str) -> Result<String> {
        self.asked.lock().unwrap().push(prompt.to_owned());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted answer for {prompt}"))
    }
}

impl Prompt for ScriptedPrompt {
    fn input(&mut self, prompt: &str) -> Result<String> {
        self.answer(prompt)
    }

    fn password(&mut self, prompt: &str) -> Result<String> {
        self.answer(prompt)
    }
}

#[derive(Args, Debug, Default)]
struct FakeOptions {
    #[arg(short = 'r', long = "repository")]
    repository: Option<RepoRef>,
}

pub type Runs = Arc<Mutex<Vec<Vec<String>>>>;

/// A command that records the arguments it was run with
pub struct FakeCommand {
    name: &'static str,
    parser: clap::Command,
    repository: Option<RepoRef>,
    requires_login: bool,
    status: u8,
    runs: Runs,
}

impl FakeCommand {
    pub fn new(name: &'static str) -> FakeCommand {
        FakeCommand {
            name,
            parser: FakeOptions::augment_args(option_parser(name, "gh fake [-r OWNER/NAME] ARGS")),
            repository: None,
            requires_login: true,
            status: SUCCESS,
            runs: Runs::default(),
        }
    }

    pub fn with_repository(mut self, repository: RepoRef) -> FakeCommand {
        self.repository = Some(repository);
        self
    }

    pub fn without_login(mut self) -> FakeCommand {
        self.requires_login = false;
        self
    }

    pub fn with_status(mut self, status: u8) -> FakeCommand {
        self.status = status;
        self
    }

    pub fn runs(&self) -> Runs {
        self.runs.clone()
    }
}

#[async_trait]
impl Command for FakeCommand {
    fn name(&self) -> &'static str {
        self.name
    }

    fn parser(&mut self) -> &mut clap::Command {
        &mut self.parser
    }

    fn bind(&mut self, matches: &ArgMatches) -> Result<()> {
        let options = FakeOptions::from_arg_matches(matches)?;
        if options.repository.is_some() {
            self.repository = options.repository;
        }
        Ok(())
    }

    fn repository(&self) -> Option<&RepoRef> {
        self.repository.as_ref()
    }

    fn requires_repository(&self) -> bool {
        true
    }

    fn requires_login(&self) -> bool {
        self.requires_login
    }

    async fn run(&mut self, _context: &mut Context, args: &[String]) -> Result<u8> {
        self.runs.lock().unwrap().push(args.to_vec());
        Ok(self.status)
    }
}
