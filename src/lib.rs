//! # launchctl Library
//!
//! This library bootstraps a new project from a template: it creates a
//! private GitHub repository from the template, wires it to a deployment
//! platform (Deno Deploy or Cloudflare Pages) and pushes a rendered CI
//! workflow. It backs the `launchctl` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use launchctl::config::{Config, Target, GITHUB_TOKEN, DENO_DEPLOY_TOKEN};
//!
//! let config = Config::from_lookup("svelte-deno", "demo", |name| match name {
//!     GITHUB_TOKEN => Some("ghp_example".to_string()),
//!     DENO_DEPLOY_TOKEN => Some("ddp_example".to_string()),
//!     _ => None,
//! })
//! .unwrap();
//!
//! assert_eq!(config.target.target(), Target::DenoDeploy);
//! assert_eq!(config.deploy_name("octocat"), "octocat-demo");
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: flavour, project name, tokens, endpoints
//!   and template settings, collected once and passed explicitly.
//! - **Transports (`http`, `repository`, `git`)**: the `HttpTransport` and
//!   `GitOperations` traits, with real implementations over `reqwest` and the
//!   system `git`.
//! - **Platforms (`platforms`)**: thin clients for GitHub, Deno Deploy and
//!   Cloudflare.
//! - **Sealing (`seal`)**: libsodium-compatible sealed boxes for GitHub
//!   Actions secrets.
//! - **Templates (`template`)**: placeholder rendering of the workflow file.
//! - **Phases (`phases`)**: the bootstrap itself, with a ledger of created
//!   resources.
//!
//! ## Execution Flow
//!
//! The main entry point is `phases::orchestrator::execute`:
//!
//! 1.  **Provisioning**: clone the template, create the repository, render
//!     and commit the workflow.
//! 2.  **Secrets** (Cloudflare): seal and upload the Cloudflare credentials.
//! 3.  **Project**: create the deployment project.
//! 4.  **Publishing**: link the project (Deno Deploy) and push.

pub mod config;
pub mod defaults;
pub mod error;
pub mod git;
pub mod http;
pub mod output;
pub mod phases;
pub mod platforms;
pub mod repository;
pub mod seal;
pub mod template;

pub use error::{Error, Result};
