//! Deployment-project creation on Deno Deploy or Cloudflare Pages.

use super::{Context, DeployProject, Ledger, SideEffect, Step};
use crate::error::Result;
use crate::platforms::{CloudflareClient, DenoDeployClient};

/// Create the Deno Deploy project `name` under the token's only organisation.
pub fn create_deno_project(
    ctx: &Context<'_>,
    ledger: &mut Ledger,
    token: &str,
    name: &str,
) -> Result<DeployProject> {
    ctx.begin(Step::CreateDenoProject);
    let deno = DenoDeployClient::new(ctx.http, &ctx.config.endpoints.deno_api, token);

    let organisation = deno.sole_organisation()?;
    log::debug!("using Deno Deploy organisation {}", organisation.id);

    let project = deno.create_project(&organisation, name)?;
    ledger.record(SideEffect::DenoProjectCreated {
        id: project.id.clone(),
        name: project.name.clone(),
    });
    Ok(project)
}

/// Create the Cloudflare Pages project `name` in `account_id`.
pub fn create_pages_project(
    ctx: &Context<'_>,
    ledger: &mut Ledger,
    account_id: &str,
    api_token: &str,
    name: &str,
) -> Result<()> {
    ctx.begin(Step::CreatePagesProject);
    CloudflareClient::new(ctx.http, &ctx.config.endpoints.cloudflare_api, api_token)
        .create_pages_project(account_id, name)?;
    ledger.record(SideEffect::PagesProjectCreated {
        account_id: account_id.to_string(),
        name: name.to_string(),
    });
    Ok(())
}
