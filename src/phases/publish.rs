//! Publishing: link the Deno Deploy project to the repository and push the
//! committed workflow.

use super::{Context, DeployProject, Ledger, SideEffect, Step};
use crate::defaults;
use crate::error::Result;
use crate::platforms::DenoDeployClient;
use crate::repository::{LocalRepository, PushCredentials};

/// Deploy `owner/repo` to `project` through the Deno Deploy GitHub
/// integration.
pub fn link_deno_project(
    ctx: &Context<'_>,
    ledger: &mut Ledger,
    token: &str,
    owner: &str,
    repo: &str,
    project: &DeployProject,
) -> Result<()> {
    ctx.begin(Step::LinkProject);
    DenoDeployClient::new(ctx.http, &ctx.config.endpoints.deno_api, token)
        .link_repository(owner, repo, project)?;
    ledger.record(SideEffect::DenoProjectLinked {
        project: project.name.clone(),
        owner: owner.to_string(),
        repo: repo.to_string(),
    });
    Ok(())
}

/// Push the current branch to remote `new`, authenticating with the GitHub
/// token. Consumes the working copy.
pub fn push(ctx: &Context<'_>, repository: LocalRepository) -> Result<()> {
    ctx.begin(Step::Push);
    log::debug!("{}: HEAD to {}", Step::Push, defaults::REMOTE_NAME);

    let credentials = PushCredentials {
        username: defaults::PUSH_USERNAME.to_string(),
        password: ctx.config.github_token.clone(),
    };
    repository.push(ctx.git, defaults::REMOTE_NAME, &credentials)
}
