use anyhow::Result;
use clap::error::ErrorKind;
use log::debug;

use crate::commands::Command;
use crate::gh::Context;
use crate::github::Repository;

/// Resolve the repository `command` is bound to.
///
/// Without a repository reference the handle stays unset, which is a usage error unless location
/// awareness was turned off with `-L`.
pub async fn get_repo(command: &mut dyn Command, context: &Context) -> Result<Option<Repository>> {
    let repo = match command.repository().cloned() {
        Some(reference) => {
            debug!("Resolving repository {reference}");
            Some(
                context
                    .github
                    .repository(&reference.owner, &reference.name)
                    .await?,
            )
        }
        None => None,
    };

    if repo.is_none() && context.opts.loc_aware {
        let usage = command
            .parser()
            .error(ErrorKind::MissingRequiredArgument, "A repository is required.");
        return Err(usage.into());
    }
    Ok(repo)
}
