//! Implementation of the bootstrap steps.
//!
//! ## Overview
//!
//! A bootstrap runs a fixed sequence of phases chosen by the flavour suffix:
//!
//! | Target | Phases |
//! |---|---|
//! | Deno Deploy | provision → Deno project → link → push |
//! | Cloudflare Pages | provision → two secrets → Pages project → push |
//!
//! 1. Provisioning - Clone the template, create the GitHub repository,
//!    render and commit the workflow
//! 2. Project - Create the deployment project
//! 3. Secrets - Seal and upload repository secrets
//! 4. Publishing - Link the Deno project, push to the new remote
//!
//! Every remote mutation that succeeds is recorded in a `Ledger`. Nothing is
//! rolled back: when a later phase fails, the error is wrapped in
//! `Error::Incomplete` so the caller can report what was left behind.

use std::fmt;

use serde::Deserialize;

use crate::config::Config;
use crate::error::Error;
use crate::http::HttpTransport;
use crate::repository::GitOperations;

// Phase modules
pub mod orchestrator;
pub mod project;
pub mod provision;
pub mod publish;
pub mod secrets;

#[cfg(test)]
pub(crate) mod fakes;

/// A unit of work, used to label progress and failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CloneTemplate,
    DiscoverUser,
    CreateRepository,
    ConfigureRemote,
    ReadWorkflow,
    RenderWorkflow,
    CommitWorkflow,
    DiscoverOrganisation,
    CreateDenoProject,
    FetchPublicKey,
    UploadSecret,
    CreatePagesProject,
    LinkProject,
    Push,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Step::CloneTemplate => "clone template",
            Step::DiscoverUser => "discover GitHub user",
            Step::CreateRepository => "create GitHub repository",
            Step::ConfigureRemote => "configure GitHub remote",
            Step::ReadWorkflow => "read GitHub Action template",
            Step::RenderWorkflow => "create GitHub Action file",
            Step::CommitWorkflow => "commit GitHub Action",
            Step::DiscoverOrganisation => "discover Deno Deploy organisation",
            Step::CreateDenoProject => "create Deno Deploy project",
            Step::FetchPublicKey => "get repository public key",
            Step::UploadSecret => "create GitHub repository secret",
            Step::CreatePagesProject => "create Cloudflare Pages project",
            Step::LinkProject => "link Deno Deploy project",
            Step::Push => "push to GitHub",
        };
        f.write_str(text)
    }
}

/// User-facing announcement of a step: emoji, plain-text tag and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Announcement {
    pub emoji: &'static str,
    pub plain: &'static str,
    pub message: &'static str,
}

impl Step {
    /// Announcement printed when the step starts. Only the steps that create
    /// something remotely are announced.
    pub fn announcement(&self) -> Option<Announcement> {
        let (emoji, plain, message) = match self {
            Step::CreateRepository => ("🏗️", "[REPO]", "Creating GitHub repository"),
            Step::UploadSecret => ("🤫", "[SECRET]", "Creating GitHub repository secret"),
            Step::CreateDenoProject => ("🛠️", "[PROJECT]", "Creating Deno Deploy project"),
            Step::CreatePagesProject => {
                ("🛠️", "[PROJECT]", "Creating Cloudflare Pages project")
            }
            Step::LinkProject => (
                "🔗",
                "[LINK]",
                "Linking Deno Deploy project to GitHub repository",
            ),
            _ => return None,
        };
        Some(Announcement {
            emoji,
            plain,
            message,
        })
    }
}

/// Receives step boundaries as the bootstrap progresses.
pub trait Progress {
    fn started(&self, step: Step);
}

/// `Progress` that reports nothing.
pub struct Silent;

impl Progress for Silent {
    fn started(&self, _step: Step) {}
}

/// The authenticated GitHub account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountIdentity {
    pub login: String,
}

/// A deployment project created on Deno Deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployProject {
    pub id: String,
    pub name: String,
}

/// A remote resource created by a bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    RepositoryCreated { owner: String, name: String },
    SecretUploaded { owner: String, repo: String, name: String },
    DenoProjectCreated { id: String, name: String },
    PagesProjectCreated { account_id: String, name: String },
    DenoProjectLinked { project: String, owner: String, repo: String },
}

impl SideEffect {
    /// How to remove the resource by hand.
    pub fn undo_hint(&self) -> String {
        match self {
            SideEffect::RepositoryCreated { owner, name } => format!(
                "delete the GitHub repository {owner}/{name} (gh repo delete {owner}/{name})"
            ),
            SideEffect::SecretUploaded { owner, repo, name } => format!(
                "remove secret {name} from {owner}/{repo} (gh secret delete {name} --repo {owner}/{repo})"
            ),
            SideEffect::DenoProjectCreated { name, .. } => {
                format!("delete the Deno Deploy project {name} from its dashboard settings")
            }
            SideEffect::PagesProjectCreated { account_id, name } => format!(
                "delete the Cloudflare Pages project {name} in account {account_id}"
            ),
            SideEffect::DenoProjectLinked { project, owner, repo } => format!(
                "unlink {owner}/{repo} from the Deno Deploy project {project} in its Git settings"
            ),
        }
    }
}

impl fmt::Display for SideEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideEffect::RepositoryCreated { owner, name } => {
                write!(f, "GitHub repository {}/{}", owner, name)
            }
            SideEffect::SecretUploaded { owner, repo, name } => {
                write!(f, "secret {} on {}/{}", name, owner, repo)
            }
            SideEffect::DenoProjectCreated { name, .. } => {
                write!(f, "Deno Deploy project {}", name)
            }
            SideEffect::PagesProjectCreated { name, .. } => {
                write!(f, "Cloudflare Pages project {}", name)
            }
            SideEffect::DenoProjectLinked { project, owner, repo } => {
                write!(f, "link from {}/{} to {}", owner, repo, project)
            }
        }
    }
}

/// Remote mutations that have succeeded so far, in order.
#[derive(Debug, Default)]
pub struct Ledger {
    completed: Vec<SideEffect>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, effect: SideEffect) {
        log::info!("created {}", effect);
        self.completed.push(effect);
    }

    pub fn completed(&self) -> &[SideEffect] {
        &self.completed
    }

    /// Attach the ledger to `error`. Errors raised before anything was
    /// created pass through unchanged.
    pub fn fail(&self, error: Error) -> Error {
        if self.completed.is_empty() {
            return error;
        }
        Error::Incomplete {
            completed: self.completed.clone(),
            source: Box::new(error),
        }
    }
}

/// Everything a phase needs, passed explicitly.
pub struct Context<'a> {
    pub config: &'a Config,
    pub http: &'a dyn HttpTransport,
    pub git: &'a dyn GitOperations,
    pub progress: &'a dyn Progress,
}

impl<'a> Context<'a> {
    pub fn new(
        config: &'a Config,
        http: &'a dyn HttpTransport,
        git: &'a dyn GitOperations,
        progress: &'a dyn Progress,
    ) -> Self {
        Self {
            config,
            http,
            git,
            progress,
        }
    }

    /// Announce `step` and log it.
    pub(crate) fn begin(&self, step: Step) {
        log::debug!("starting: {}", step);
        self.progress.started(step);
    }
}
