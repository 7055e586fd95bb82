use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;

/// An `owner/name` pair identifying a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> RepoRef {
        RepoRef {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for RepoRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = split_repo_full_name(s)?;
        Ok(RepoRef::new(owner, name))
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

pub fn split_repo_full_name(repo_full_name: &str) -> Result<(String, String)> {
    let v: Vec<&str> = repo_full_name.split('/').collect();
    if v.len() != 2 || v.iter().any(|part| part.is_empty()) {
        return Err(anyhow::anyhow!("Invalid repository name: {}", repo_full_name));
    }
    Ok((v[0].to_string(), v[1].to_string()))
}

/// Expands a leading `~/` against the user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
