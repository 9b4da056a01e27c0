//! Orchestrator for a complete bootstrap
//!
//! This module runs the phases in the order the deployment target needs and
//! turns any failure after the first remote mutation into
//! `Error::Incomplete`.

use url::Url;

use super::{project, provision, publish, secrets, Context, Ledger, SideEffect};
use crate::config::{Target, TargetCredentials, CLOUDFLARE_ACCOUNT_ID, CLOUDFLARE_API_TOKEN};
use crate::error::Result;

/// Result of a successful bootstrap.
#[derive(Debug, Clone)]
pub struct Summary {
    pub target: Target,
    /// GitHub account that owns the new repository
    pub login: String,
    /// Name of the deployment project, `<login>-<project-name>`
    pub deploy_name: String,
    pub repository_url: Url,
    /// Deployment dashboard of the new project
    pub dashboard_url: Url,
    /// Everything created, in order
    pub created: Vec<SideEffect>,
}

/// Execute the complete bootstrap.
///
/// Deno Deploy:
/// 1. Provision the repository
/// 2. Create the Deno Deploy project
/// 3. Link it to the repository
/// 4. Push
///
/// Cloudflare Pages:
/// 1. Provision the repository
/// 2. Upload `CLOUDFLARE_API_TOKEN` and `CLOUDFLARE_ACCOUNT_ID` as secrets
/// 3. Create the Pages project
/// 4. Push
pub fn execute(ctx: &Context<'_>) -> Result<Summary> {
    let mut ledger = Ledger::new();
    run(ctx, &mut ledger).map_err(|e| ledger.fail(e))
}

fn run(ctx: &Context<'_>, ledger: &mut Ledger) -> Result<Summary> {
    let config = ctx.config;
    let endpoints = &config.endpoints;

    // Provisioning
    let provisioned = provision::execute(ctx, ledger)?;
    let login = provisioned.account.login.clone();
    let repo = config.project_name.as_str();
    let deploy_name = config.deploy_name(&login);

    let dashboard_url = match &config.target {
        TargetCredentials::DenoDeploy { token } => {
            let project = project::create_deno_project(ctx, ledger, token, &deploy_name)?;
            publish::link_deno_project(ctx, ledger, token, &login, repo, &project)?;
            endpoints
                .deno_dashboard
                .join(&format!("projects/{}", project.name))?
        }
        TargetCredentials::CloudflarePages {
            account_id,
            api_token,
        } => {
            secrets::upload(ctx, ledger, &login, repo, CLOUDFLARE_API_TOKEN, api_token)?;
            secrets::upload(ctx, ledger, &login, repo, CLOUDFLARE_ACCOUNT_ID, account_id)?;
            project::create_pages_project(ctx, ledger, account_id, api_token, &deploy_name)?;
            endpoints
                .cloudflare_dashboard
                .join(&format!("{}/pages/view/{}", account_id, deploy_name))?
        }
    };

    // Publishing
    publish::push(ctx, provisioned.repository)?;
    log::info!("pushed to {}", provisioned.repository_url);

    Ok(Summary {
        target: config.target.target(),
        login,
        deploy_name,
        repository_url: provisioned.repository_url,
        dashboard_url,
        created: ledger.completed().to_vec(),
    })
}
