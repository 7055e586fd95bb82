//! The GitHub API boundary: the `GitHub` trait the commands talk to, and an Octocrab backed implementation

use std::collections::BTreeMap;
use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http::HeaderName;
use log::{debug, error};
use octocrab::{Octocrab, OctocrabBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

/// A GitHub user or organization, partially deserialized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub login: String,
    pub r#type: String,
}

/// A repository handle, partially deserialized from `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub owner: Account,
    pub description: Option<String>,
    pub html_url: Url,
    pub default_branch: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub open_issues_count: u32,
}

/// The part of the `POST /authorizations` response we care about
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Authorization {
    pub token: String,
}

#[derive(Debug, Serialize)]
struct AuthorizationRequest<'a> {
    scopes: &'a [&'a str],
    note: &'a str,
    note_url: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GistFile {
    pub content: String,
}

/// The body of `POST /gists`
#[derive(Debug, Clone, Serialize)]
pub struct NewGist {
    pub description: Option<String>,
    pub public: bool,
    pub files: BTreeMap<String, GistFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gist {
    pub id: String,
    pub html_url: Url,
    pub description: Option<String>,
    pub public: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub html_url: Url,
    pub user: Account,
}

#[derive(Debug, Serialize)]
struct ListPullRequestsParameters<'a> {
    state: &'a str,
    per_page: u8,
}

/// The operations the commands need from GitHub.
///
/// Authentication state (`login`, `login_basic`) is set at most once per process, before any
/// command specific call.
#[async_trait]
pub trait GitHub: Send + Sync {
    fn set_user_agent(&mut self, user_agent: &str);

    /// Authenticate subsequent calls with an access token
    fn login(&mut self, token: &str);

    /// Authenticate subsequent calls with a username and password
    fn login_basic(&mut self, username: &str, password: &str);

    fn is_authenticated(&self) -> bool;

    async fn repository(&self, owner: &str, name: &str) -> Result<Repository>;

    /// Exchange a username and password for an access token
    async fn authorize(
        &self,
        username: &str,
        password: &str,
        scopes: &[&str],
        app_name: &str,
        app_url: &str,
    ) -> Result<Authorization>;

    async fn create_gist(&self, gist: &NewGist) -> Result<Gist>;

    /// The authenticated user's gists
    async fn gists(&self) -> Result<Vec<Gist>>;

    async fn pull_requests(&self, owner: &str, name: &str, state: &str) -> Result<Vec<PullRequest>>;
}

#[derive(Clone)]
enum Credentials {
    Anonymous,
    Token(String),
    Basic { username: String, password: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Anonymous => f.write_str("Anonymous"),
            Credentials::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

const NO_PARAMETERS: Option<&()> = None;

/// A `GitHub` implementation that builds an Octocrab client per call from the current credentials
#[derive(Debug)]
pub struct OctocrabClient {
    user_agent: Option<String>,
    credentials: Credentials,
}

impl OctocrabClient {
    pub fn new() -> OctocrabClient {
        OctocrabClient {
            user_agent: None,
            credentials: Credentials::Anonymous,
        }
    }

    fn octocrab(&self) -> Result<Octocrab> {
        self.build(&self.credentials)
    }

    fn build(&self, credentials: &Credentials) -> Result<Octocrab> {
        let mut builder = OctocrabBuilder::default()
            .add_header(
                HeaderName::from_static("accept"),
                "application/vnd.github+json".to_string(),
            )
            .add_header(
                HeaderName::from_static("x-github-api-version"),
                "2022-11-28".to_string(),
            );
        if let Some(user_agent) = &self.user_agent {
            builder = builder.add_header(HeaderName::from_static("user-agent"), user_agent.clone());
        }
        let octocrab = match credentials {
            Credentials::Anonymous => builder.build()?,
            Credentials::Token(token) => builder.personal_token(token.clone()).build()?,
            Credentials::Basic { username, password } => builder
                .basic_auth(username.clone(), password.clone())
                .build()?,
        };
        Ok(octocrab)
    }
}

impl Default for OctocrabClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitHub for OctocrabClient {
    fn set_user_agent(&mut self, user_agent: &str) {
        self.user_agent = Some(user_agent.to_owned());
    }

    fn login(&mut self, token: &str) {
        self.credentials = Credentials::Token(token.to_owned());
    }

    fn login_basic(&mut self, username: &str, password: &str) {
        self.credentials = Credentials::Basic {
            username: username.to_owned(),
            password: password.to_owned(),
        };
    }

    fn is_authenticated(&self) -> bool {
        !matches!(self.credentials, Credentials::Anonymous)
    }

    async fn repository(&self, owner: &str, name: &str) -> Result<Repository> {
        let route = format!("/repos/{owner}/{name}");
        match self.octocrab()?.get(route, NO_PARAMETERS).await {
            Ok(repository) => Ok(repository),
            Err(e) => {
                error!("Error getting repository {owner}/{name}: {e}");
                Err(anyhow::anyhow!(e))
            }
        }
    }

    async fn authorize(
        &self,
        username: &str,
        password: &str,
        scopes: &[&str],
        app_name: &str,
        app_url: &str,
    ) -> Result<Authorization> {
        debug!("Requesting an authorization for {username} with scopes {:?}", scopes);
        let octocrab = self.build(&Credentials::Basic {
            username: username.to_owned(),
            password: password.to_owned(),
        })?;
        let body = AuthorizationRequest {
            scopes,
            note: app_name,
            note_url: app_url,
        };
        match octocrab.post("/authorizations", Some(&body)).await {
            Ok(authorization) => Ok(authorization),
            Err(e) => {
                error!("Error authorizing {username}: {e}");
                Err(anyhow::anyhow!(e))
            }
        }
    }

    async fn create_gist(&self, gist: &NewGist) -> Result<Gist> {
        match self.octocrab()?.post("/gists", Some(gist)).await {
            Ok(gist) => Ok(gist),
            Err(e) => {
                error!("Error creating gist: {e}");
                Err(anyhow::anyhow!(e))
            }
        }
    }

    async fn gists(&self) -> Result<Vec<Gist>> {
        match self.octocrab()?.get("/gists", NO_PARAMETERS).await {
            Ok(gists) => Ok(gists),
            Err(e) => {
                error!("Error listing gists: {e}");
                Err(anyhow::anyhow!(e))
            }
        }
    }

    async fn pull_requests(&self, owner: &str, name: &str, state: &str) -> Result<Vec<PullRequest>> {
        let route = format!("/repos/{owner}/{name}/pulls");
        let parameters = ListPullRequestsParameters {
            state,
            per_page: 100,
        };
        match self.octocrab()?.get(route, Some(&parameters)).await {
            Ok(pull_requests) => Ok(pull_requests),
            Err(e) => {
                error!("Error listing pull requests for {owner}/{name}: {e}");
                Err(anyhow::anyhow!(e))
            }
        }
    }
}
