//! Default values for launchctl configuration.
//!
//! This module provides centralized default values used across the
//! provisioning steps, ensuring consistency and avoiding duplication.

/// GitHub REST API root.
pub const GITHUB_API_URL: &str = "https://api.github.com/";

/// GitHub web root, used for clone, remote and display URLs.
pub const GITHUB_WEB_URL: &str = "https://github.com/";

/// Deno Deploy dashboard API root.
pub const DENO_API_URL: &str = "https://dash.deno.com/_api/";

/// Deno Deploy dashboard root, used for display URLs.
pub const DENO_DASHBOARD_URL: &str = "https://dash.deno.com/";

/// Cloudflare REST API root.
pub const CLOUDFLARE_API_URL: &str = "https://api.cloudflare.com/client/v4/";

/// Cloudflare dashboard root, used for display URLs.
pub const CLOUDFLARE_DASHBOARD_URL: &str = "https://dash.cloudflare.com/";

/// GitHub account that owns the template repositories.
pub const TEMPLATE_OWNER: &str = "fraserdarwent";

/// Template repositories are named `<prefix>-<flavour>`.
pub const TEMPLATE_PREFIX: &str = "launchctl";

/// Workflow file rendered inside the clone.
pub const WORKFLOW_PATH: &str = ".github/workflows/deploy.yaml";

/// Variable bound to `<login>-<project-name>` when rendering the workflow.
pub const PROJECT_VARIABLE: &str = "Project";

/// Message of the single local commit.
pub const COMMIT_MESSAGE: &str = "Templated GitHub Action";

/// Name of the remote pointing at the new repository.
pub const REMOTE_NAME: &str = "new";

/// Basic-auth username used for pushes; GitHub ignores it for tokens.
pub const PUSH_USERNAME: &str = "PAT";

/// Branch deployments are built from.
pub const PRODUCTION_BRANCH: &str = "main";

/// GitHub REST API version pinned on every request.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// User agent sent with every HTTP request.
pub fn user_agent() -> String {
    format!("launchctl/{}", env!("CARGO_PKG_VERSION"))
}
