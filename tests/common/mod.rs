//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a CLI command builder with a scrubbed environment and
//! in-memory doubles for the HTTP and Git seams of the library.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     launchctl_cmd().arg("--help").assert().success();
//! }
//! ```

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use launchctl::defaults;
use launchctl::http::{HttpTransport, Method, Request, Response, TransportError};
use launchctl::repository::{GitOperations, PushCredentials, Signature};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{launchctl_cmd, RecordingGit, RoutedTransport, WORKFLOW};
}

/// Every variable the CLI reads.
const ENV_VARS: &[&str] = &[
    "GITHUB_TOKEN",
    "DENO_DEPLOY_TOKEN",
    "CLOUDFLARE_ACCOUNT_ID",
    "CLOUDFLARE_API_TOKEN",
    "LAUNCHCTL_LOG",
    "LAUNCHCTL_TEMPLATE_OWNER",
    "LAUNCHCTL_TEMPLATE_SYNTAX",
];

/// Workflow fixture in the shape the template repositories use.
#[allow(dead_code)]
pub const WORKFLOW: &str = r#"name: Deploy
on:
  push:
    branches: [main]
jobs:
  deploy:
    runs-on: ubuntu-latest
    permissions:
      id-token: write
      contents: read
    steps:
      - uses: actions/checkout@v4
      - uses: denoland/deployctl@v1
        with:
          project: {{ .Project }}
          entrypoint: main.ts
"#;

/// The `launchctl` binary with none of its variables inherited from the
/// developer's shell.
#[allow(dead_code)]
pub fn launchctl_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("launchctl");
    for name in ENV_VARS {
        cmd.env_remove(name);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

/// `HttpTransport` answering from a route table keyed on method and path.
#[allow(dead_code)]
#[derive(Default)]
pub struct RoutedTransport {
    routes: Vec<(Method, String, Response)>,
    requests: RefCell<Vec<Request>>,
}

#[allow(dead_code)]
impl RoutedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, method: Method, path: &str, status: u16, body: &str) -> Self {
        self.routes
            .push((method, path.to_string(), Response::new(status, body)));
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| format!("{} {}", r.method, r.url.path()))
            .collect()
    }
}

impl HttpTransport for RoutedTransport {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        Ok(self
            .routes
            .iter()
            .find(|(method, path, _)| *method == request.method && path == request.url.path())
            .map(|(_, _, response)| response.clone())
            .unwrap_or_else(|| Response::new(404, r#"{"message":"Not Found"}"#)))
    }
}

/// `GitOperations` that writes `WORKFLOW` (or a replacement) on clone and
/// records the rest.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingGit {
    pub calls: RefCell<Vec<String>>,
    pub committed: RefCell<Option<String>>,
    workflow: Option<String>,
}

#[allow(dead_code)]
impl RecordingGit {
    pub fn with_workflow(workflow: &str) -> Self {
        Self {
            workflow: Some(workflow.to_string()),
            ..Self::default()
        }
    }
}

impl GitOperations for RecordingGit {
    fn clone_repository(&self, url: &str, target_dir: &Path) -> launchctl::Result<()> {
        self.calls.borrow_mut().push(format!("clone {}", url));
        let workflow = target_dir.join(defaults::WORKFLOW_PATH);
        fs::create_dir_all(workflow.parent().unwrap())?;
        fs::write(workflow, self.workflow.as_deref().unwrap_or(WORKFLOW))?;
        Ok(())
    }

    fn add_remote(&self, _repo_dir: &Path, name: &str, url: &str) -> launchctl::Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("remote add {} {}", name, url));
        Ok(())
    }

    fn stage(&self, repo_dir: &Path, path: &Path) -> launchctl::Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("add {}", path.display()));
        *self.committed.borrow_mut() = Some(fs::read_to_string(repo_dir.join(path))?);
        Ok(())
    }

    fn commit(&self, _repo_dir: &Path, message: &str, author: &Signature) -> launchctl::Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("commit {} ({})", message, author.name));
        Ok(())
    }

    fn push(
        &self,
        _repo_dir: &Path,
        remote: &str,
        credentials: &PushCredentials,
    ) -> launchctl::Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("push {} as {}", remote, credentials.username));
        Ok(())
    }
}
