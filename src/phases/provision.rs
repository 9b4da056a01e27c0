//! Provisioning: clone the template and turn it into a new GitHub
//! repository with a rendered, committed workflow.
//!
//! This phase:
//! - Clones `<template-owner>/<prefix>-<flavour>` into a private working copy
//! - Resolves the account behind the GitHub token
//! - Creates the private repository and points remote `new` at it
//! - Renders the workflow with `Project = <login>-<project-name>` and
//!   commits it

use std::collections::HashMap;
use std::io;
use std::path::Path;

use url::Url;

use super::{AccountIdentity, Context, Ledger, SideEffect, Step};
use crate::defaults;
use crate::error::{Error, Result};
use crate::platforms::GitHubClient;
use crate::repository::{LocalRepository, Signature};
use crate::template;

/// Output of the provisioning phase.
#[derive(Debug)]
pub struct Provisioned {
    pub repository: LocalRepository,
    pub account: AccountIdentity,
    /// Web URL of the new repository, also used as remote `new`.
    pub repository_url: Url,
}

/// Execute the provisioning phase.
pub fn execute(ctx: &Context<'_>, ledger: &mut Ledger) -> Result<Provisioned> {
    let config = ctx.config;
    ctx.begin(Step::CreateRepository);

    let repository = clone_template(ctx)?;

    let github = GitHubClient::new(ctx.http, &config.endpoints.github_api, &config.github_token);
    let account = github.current_user()?;
    log::info!("authenticated as {}", account.login);

    github.create_repository(&config.project_name)?;
    ledger.record(SideEffect::RepositoryCreated {
        owner: account.login.clone(),
        name: config.project_name.clone(),
    });

    let repository_url = config
        .endpoints
        .github_web
        .join(&format!("{}/{}", account.login, config.project_name))?;
    log::debug!("{}: {} -> {}", Step::ConfigureRemote, defaults::REMOTE_NAME, repository_url);
    repository
        .add_remote(ctx.git, defaults::REMOTE_NAME, repository_url.as_str())
        .map_err(failed(Step::ConfigureRemote))?;

    render_workflow(ctx, &repository, &account)?;

    Ok(Provisioned {
        repository,
        account,
        repository_url,
    })
}

/// Clone the flavour's template. An address that does not resolve means no
/// template exists for the flavour.
fn clone_template(ctx: &Context<'_>) -> Result<LocalRepository> {
    let config = ctx.config;
    let url = config.template_url()?;
    log::debug!("{}: {}", Step::CloneTemplate, url);

    LocalRepository::clone_from(ctx.git, url.as_str(), &config.project_name).map_err(|e| match e {
        Error::RepositoryNotFound { .. } => Error::UnknownFlavour {
            flavour: config.flavour.clone(),
        },
        other => other,
    })
}

/// Render the workflow in place and commit it as the account.
fn render_workflow(
    ctx: &Context<'_>,
    repository: &LocalRepository,
    account: &AccountIdentity,
) -> Result<()> {
    let settings = &ctx.config.template;
    let path = settings.workflow_path.as_path();

    let vars = HashMap::from([(
        defaults::PROJECT_VARIABLE.to_string(),
        ctx.config.deploy_name(&account.login),
    )]);

    log::debug!("{}: {}", Step::RenderWorkflow, path.display());
    let content = repository
        .read_file(path)
        .map_err(|e| local(Step::ReadWorkflow, path, e))?;
    let rendered = template::render(&content, &settings.syntax.delimiters(), &vars)?;
    repository
        .write_file(path, &rendered)
        .map_err(|e| local(Step::RenderWorkflow, path, e))?;

    log::debug!("{}: {}", Step::CommitWorkflow, settings.commit_message);
    repository
        .commit_file(
            ctx.git,
            path,
            &settings.commit_message,
            &Signature::for_login(&account.login),
        )
        .map_err(failed(Step::CommitWorkflow))
}

fn local(step: Step, path: &Path, error: io::Error) -> Error {
    Error::Local {
        step,
        message: format!("{}: {}", path.display(), error),
    }
}

/// Label a Git failure with the step it interrupted.
fn failed(step: Step) -> impl FnOnce(Error) -> Error {
    move |error| match error {
        Error::GitCommand { stderr, .. } => Error::Local {
            step,
            message: stderr,
        },
        other => Error::Local {
            step,
            message: other.to_string(),
        },
    }
}
