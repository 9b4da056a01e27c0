//! # Configuration
//!
//! Everything a bootstrap needs to know is collected here once, up front,
//! and passed explicitly to each step. Nothing downstream reads the process
//! environment.
//!
//! ## Sources
//!
//! - **Positional arguments**: the flavour and the project name.
//! - **Environment variables**: `GITHUB_TOKEN` always, plus the credentials
//!   of the deployment target selected by the flavour suffix:
//!   `DENO_DEPLOY_TOKEN` for `*deno`, `CLOUDFLARE_ACCOUNT_ID` and
//!   `CLOUDFLARE_API_TOKEN` for `*cloudflare`. An empty value counts as
//!   missing.
//! - **CLI options**: template owner and template syntax, applied on top of
//!   the defaults with the `with_*` builders.
//!
//! Environment access goes through a lookup function so that tests can
//! supply a map instead of mutating the process environment.

use crate::defaults;
use crate::error::{Error, Result};
use crate::template::TemplateSyntax;
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Environment variable holding the GitHub token.
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
/// Environment variable holding the Deno Deploy token.
pub const DENO_DEPLOY_TOKEN: &str = "DENO_DEPLOY_TOKEN";
/// Environment variable holding the Cloudflare account identifier.
pub const CLOUDFLARE_ACCOUNT_ID: &str = "CLOUDFLARE_ACCOUNT_ID";
/// Environment variable holding the Cloudflare API token.
pub const CLOUDFLARE_API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";

/// Deployment platform selected by the flavour suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Deno Deploy, linked through its GitHub integration.
    DenoDeploy,
    /// Cloudflare Pages, deployed by the workflow using repository secrets.
    CloudflarePages,
}

impl Target {
    /// Select the deployment target from a flavour such as `svelte-deno`.
    pub fn from_flavour(flavour: &str) -> Result<Self> {
        if flavour.ends_with("deno") {
            Ok(Target::DenoDeploy)
        } else if flavour.ends_with("cloudflare") {
            Ok(Target::CloudflarePages)
        } else {
            Err(Error::UnknownFlavour {
                flavour: flavour.to_string(),
            })
        }
    }
}

/// Credentials for the deployment target.
#[derive(Clone)]
pub enum TargetCredentials {
    DenoDeploy { token: String },
    CloudflarePages { account_id: String, api_token: String },
}

impl TargetCredentials {
    pub fn target(&self) -> Target {
        match self {
            TargetCredentials::DenoDeploy { .. } => Target::DenoDeploy,
            TargetCredentials::CloudflarePages { .. } => Target::CloudflarePages,
        }
    }
}

impl fmt::Debug for TargetCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetCredentials::DenoDeploy { .. } => f
                .debug_struct("DenoDeploy")
                .field("token", &"<redacted>")
                .finish(),
            TargetCredentials::CloudflarePages { account_id, .. } => f
                .debug_struct("CloudflarePages")
                .field("account_id", account_id)
                .field("api_token", &"<redacted>")
                .finish(),
        }
    }
}

/// Base URLs of every remote the tool talks to.
///
/// All values end with `/` so that relative paths join underneath them.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub github_api: Url,
    pub github_web: Url,
    pub deno_api: Url,
    pub deno_dashboard: Url,
    pub cloudflare_api: Url,
    pub cloudflare_dashboard: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        fn parse(raw: &str) -> Url {
            Url::parse(raw).expect("built-in endpoint URLs are valid")
        }

        Self {
            github_api: parse(defaults::GITHUB_API_URL),
            github_web: parse(defaults::GITHUB_WEB_URL),
            deno_api: parse(defaults::DENO_API_URL),
            deno_dashboard: parse(defaults::DENO_DASHBOARD_URL),
            cloudflare_api: parse(defaults::CLOUDFLARE_API_URL),
            cloudflare_dashboard: parse(defaults::CLOUDFLARE_DASHBOARD_URL),
        }
    }
}

/// Where the template lives and how the workflow file inside it is rendered.
#[derive(Debug, Clone)]
pub struct TemplateSettings {
    /// Account owning the template repositories
    pub owner: String,
    /// Template repositories are named `<prefix>-<flavour>`
    pub prefix: String,
    /// Workflow file rendered inside the clone, relative to its root
    pub workflow_path: PathBuf,
    /// Delimiter pair used by the workflow template
    pub syntax: TemplateSyntax,
    /// Message of the local commit
    pub commit_message: String,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            owner: defaults::TEMPLATE_OWNER.to_string(),
            prefix: defaults::TEMPLATE_PREFIX.to_string(),
            workflow_path: PathBuf::from(defaults::WORKFLOW_PATH),
            syntax: TemplateSyntax::default(),
            commit_message: defaults::COMMIT_MESSAGE.to_string(),
        }
    }
}

/// Complete configuration of one bootstrap.
#[derive(Clone)]
pub struct Config {
    pub flavour: String,
    pub project_name: String,
    pub github_token: String,
    pub target: TargetCredentials,
    pub endpoints: Endpoints,
    pub template: TemplateSettings,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("flavour", &self.flavour)
            .field("project_name", &self.project_name)
            .field("github_token", &"<redacted>")
            .field("target", &self.target)
            .field("endpoints", &self.endpoints)
            .field("template", &self.template)
            .finish()
    }
}

impl Config {
    /// Build a configuration from the process environment.
    pub fn from_env(flavour: &str, project_name: &str) -> Result<Self> {
        Self::from_lookup(flavour, project_name, |name| std::env::var(name).ok())
    }

    /// Build a configuration, reading variables through `lookup`.
    ///
    /// Variables are checked in a fixed order (`GITHUB_TOKEN` first) and the
    /// first missing one is reported.
    pub fn from_lookup<F>(flavour: &str, project_name: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| -> Result<String> {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::MissingEnv {
                    name: name.to_string(),
                })
        };

        let github_token = require(GITHUB_TOKEN)?;
        let target = match Target::from_flavour(flavour)? {
            Target::DenoDeploy => TargetCredentials::DenoDeploy {
                token: require(DENO_DEPLOY_TOKEN)?,
            },
            Target::CloudflarePages => TargetCredentials::CloudflarePages {
                account_id: require(CLOUDFLARE_ACCOUNT_ID)?,
                api_token: require(CLOUDFLARE_API_TOKEN)?,
            },
        };

        Ok(Self {
            flavour: flavour.to_string(),
            project_name: project_name.to_string(),
            github_token,
            target,
            endpoints: Endpoints::default(),
            template: TemplateSettings::default(),
        })
    }

    /// Override the account owning the template repositories.
    pub fn with_template_owner(mut self, owner: impl Into<String>) -> Self {
        self.template.owner = owner.into();
        self
    }

    /// Override the workflow template delimiters.
    pub fn with_template_syntax(mut self, syntax: TemplateSyntax) -> Self {
        self.template.syntax = syntax;
        self
    }

    /// Override the remote base URLs.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Clone URL of the template selected by the flavour.
    pub fn template_url(&self) -> Result<Url> {
        let path = format!(
            "{}/{}-{}",
            self.template.owner, self.template.prefix, self.flavour
        );
        Ok(self.endpoints.github_web.join(&path)?)
    }

    /// Name of the deployment project: `<login>-<project-name>`.
    pub fn deploy_name(&self, login: &str) -> String {
        format!("{}-{}", login, self.project_name)
    }
}
