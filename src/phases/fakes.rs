//! Recording fakes for the HTTP and Git seams.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::defaults;
use crate::error::{Error, Result};
use crate::http::{HttpTransport, Method, Request, Response, TransportError};
use crate::repository::{GitOperations, PushCredentials, Signature};

/// Answers requests from a fixed route table and records every request.
///
/// Routes match on method and URL path; unmatched requests get a 404.
#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: Vec<(Method, String, Response)>,
    offline: bool,
    requests: RefCell<Vec<Request>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn route(mut self, method: Method, path: &str, response: Response) -> Self {
        self.routes.push((method, path.to_string(), response));
        self
    }

    /// Fail every request at the transport level.
    pub(crate) fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    /// `METHOD /path` of every request, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| format!("{} {}", r.method, r.url.path()))
            .collect()
    }
}

impl HttpTransport for FakeTransport {
    fn send(&self, request: &Request) -> std::result::Result<Response, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        if self.offline {
            return Err(TransportError("connection refused".to_string()));
        }
        let response = self
            .routes
            .iter()
            .find(|(method, path, _)| *method == request.method && path == request.url.path())
            .map(|(_, _, response)| response.clone())
            .unwrap_or_else(|| Response::new(404, r#"{"message":"Not Found"}"#));
        Ok(response)
    }
}

/// Git double: a clone writes a workflow fixture, everything else is
/// recorded.
pub(crate) struct FakeGit {
    workflow: String,
    missing_template: bool,
    without_workflow: bool,
    fail_commit: bool,
    fail_push: bool,
    calls: RefCell<Vec<String>>,
    committed: RefCell<Option<String>>,
    staged: RefCell<Option<PathBuf>>,
}

impl FakeGit {
    pub(crate) fn new(workflow: &str) -> Self {
        Self {
            workflow: workflow.to_string(),
            missing_template: false,
            without_workflow: false,
            fail_commit: false,
            fail_push: false,
            calls: RefCell::new(Vec::new()),
            committed: RefCell::new(None),
            staged: RefCell::new(None),
        }
    }

    pub(crate) fn missing_template(mut self) -> Self {
        self.missing_template = true;
        self
    }

    /// Clone succeeds but leaves no workflow file behind.
    pub(crate) fn without_workflow(mut self) -> Self {
        self.without_workflow = true;
        self
    }

    pub(crate) fn failing_commit(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    pub(crate) fn failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Workflow content at the time of the commit.
    pub(crate) fn committed(&self) -> Option<String> {
        self.committed.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl GitOperations for FakeGit {
    fn clone_repository(&self, url: &str, target_dir: &Path) -> Result<()> {
        self.record(format!("clone {}", url));
        if self.missing_template {
            return Err(Error::RepositoryNotFound {
                url: url.to_string(),
            });
        }
        if self.without_workflow {
            return Ok(());
        }
        let workflow = target_dir.join(defaults::WORKFLOW_PATH);
        if let Some(parent) = workflow.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(workflow, &self.workflow)?;
        Ok(())
    }

    fn add_remote(&self, _repo_dir: &Path, name: &str, url: &str) -> Result<()> {
        self.record(format!("remote add {} {}", name, url));
        Ok(())
    }

    fn stage(&self, _repo_dir: &Path, path: &Path) -> Result<()> {
        self.record(format!("add {}", path.display()));
        *self.staged.borrow_mut() = Some(path.to_path_buf());
        Ok(())
    }

    fn commit(&self, repo_dir: &Path, message: &str, author: &Signature) -> Result<()> {
        self.record(format!("commit {} by {}", message, author.email));
        if self.fail_commit {
            return Err(Error::GitCommand {
                command: "commit".to_string(),
                stderr: "fatal: unable to write new index file".to_string(),
            });
        }
        if let Some(path) = self.staged.borrow().as_ref() {
            *self.committed.borrow_mut() = Some(fs::read_to_string(repo_dir.join(path))?);
        }
        Ok(())
    }

    fn push(&self, _repo_dir: &Path, remote: &str, credentials: &PushCredentials) -> Result<()> {
        self.record(format!("push {} as {}", remote, credentials.username));
        if self.fail_push {
            return Err(Error::GitCommand {
                command: "push".to_string(),
                stderr: "remote rejected".to_string(),
            });
        }
        Ok(())
    }
}
