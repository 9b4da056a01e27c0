//! # Local Repository Handle
//!
//! This module provides `LocalRepository`, the single owned value that
//! carries the template clone through the pipeline: clone, render, commit,
//! push. The working copy lives in a private temporary directory that is
//! removed when the handle is dropped; `push` consumes the handle since no
//! local edits are expected afterwards.
//!
//! ## Design
//!
//! Git itself is reached through the `GitOperations` trait.
//! `DefaultGitOperations` wraps the system `git` command (see `crate::git`);
//! tests substitute implementations that write fixture files and record
//! calls instead of touching the network.

use crate::error::{Error, Result};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use tempfile::TempDir;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations {
    /// Clones `url` into the existing, empty directory `target_dir`.
    fn clone_repository(&self, url: &str, target_dir: &Path) -> Result<()>;

    /// Registers a remote.
    fn add_remote(&self, repo_dir: &Path, name: &str, url: &str) -> Result<()>;

    /// Stages one path, relative to the working tree root.
    fn stage(&self, repo_dir: &Path, path: &Path) -> Result<()>;

    /// Commits the index.
    fn commit(&self, repo_dir: &Path, message: &str, author: &Signature) -> Result<()>;

    /// Pushes the current branch to `remote`.
    fn push(&self, repo_dir: &Path, remote: &str, credentials: &PushCredentials) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command to perform real Git operations.
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn clone_repository(&self, url: &str, target_dir: &Path) -> Result<()> {
        crate::git::clone(url, target_dir)
    }

    fn add_remote(&self, repo_dir: &Path, name: &str, url: &str) -> Result<()> {
        crate::git::add_remote(repo_dir, name, url)
    }

    fn stage(&self, repo_dir: &Path, path: &Path) -> Result<()> {
        crate::git::stage(repo_dir, path)
    }

    fn commit(&self, repo_dir: &Path, message: &str, author: &Signature) -> Result<()> {
        crate::git::commit(repo_dir, message, &author.name, &author.email)
    }

    fn push(&self, repo_dir: &Path, remote: &str, credentials: &PushCredentials) -> Result<()> {
        crate::git::push(
            repo_dir,
            remote,
            &credentials.username,
            &credentials.password,
        )
    }
}

/// Commit author and committer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
}

impl Signature {
    /// Signature of a GitHub account using its no-reply address.
    pub fn for_login(login: &str) -> Self {
        Self {
            name: login.to_string(),
            email: format!("{}@users.noreply.github.com", login),
        }
    }
}

/// HTTP basic-auth credentials for a push.
#[derive(Clone)]
pub struct PushCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for PushCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A cloned template waiting to become the new repository.
pub struct LocalRepository {
    name: String,
    workdir: TempDir,
}

impl fmt::Debug for LocalRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalRepository")
            .field("name", &self.name)
            .field("path", &self.workdir.path())
            .finish()
    }
}

impl LocalRepository {
    /// Clone `url` into a fresh private directory; `name` is the name the
    /// repository will have on GitHub.
    pub fn clone_from(git: &dyn GitOperations, url: &str, name: &str) -> Result<Self> {
        let workdir = tempfile::Builder::new().prefix("launchctl-").tempdir()?;
        log::debug!("cloning {} into {}", url, workdir.path().display());
        git.clone_repository(url, workdir.path())?;
        Ok(Self {
            name: name.to_string(),
            workdir,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root of the working tree.
    pub fn path(&self) -> &Path {
        self.workdir.path()
    }

    /// Read a file from the working tree.
    pub fn read_file(&self, relative: &Path) -> io::Result<String> {
        fs::read_to_string(self.path().join(relative))
    }

    /// Overwrite a file in the working tree.
    pub fn write_file(&self, relative: &Path, content: &str) -> io::Result<()> {
        fs::write(self.path().join(relative), content)
    }

    pub fn add_remote(&self, git: &dyn GitOperations, remote: &str, url: &str) -> Result<()> {
        git.add_remote(self.path(), remote, url)
    }

    /// Stage `relative` and commit it.
    pub fn commit_file(
        &self,
        git: &dyn GitOperations,
        relative: &Path,
        message: &str,
        author: &Signature,
    ) -> Result<()> {
        git.stage(self.path(), relative)?;
        git.commit(self.path(), message, author)
    }

    /// Push the committed history to `remote`. The working copy is removed
    /// afterwards, whether or not the push succeeded.
    pub fn push(
        self,
        git: &dyn GitOperations,
        remote: &str,
        credentials: &PushCredentials,
    ) -> Result<()> {
        git.push(self.path(), remote, credentials)
            .map_err(|e| Error::Push {
                remote: remote.to_string(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    #[derive(Default)]
    struct MockGitOps {
        calls: RefCell<Vec<String>>,
        fail_push: bool,
    }

    impl GitOperations for MockGitOps {
        fn clone_repository(&self, url: &str, target_dir: &Path) -> Result<()> {
            self.calls.borrow_mut().push(format!("clone {}", url));
            fs::write(target_dir.join("README.md"), "# template\n")?;
            Ok(())
        }

        fn add_remote(&self, _repo_dir: &Path, name: &str, url: &str) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("remote add {} {}", name, url));
            Ok(())
        }

        fn stage(&self, _repo_dir: &Path, path: &Path) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("add {}", path.display()));
            Ok(())
        }

        fn commit(&self, _repo_dir: &Path, message: &str, author: &Signature) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("commit {} by {}", message, author.email));
            Ok(())
        }

        fn push(&self, _repo_dir: &Path, remote: &str, _credentials: &PushCredentials) -> Result<()> {
            self.calls.borrow_mut().push(format!("push {}", remote));
            if self.fail_push {
                return Err(Error::GitCommand {
                    command: "push".to_string(),
                    stderr: "rejected".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_clone_read_write() {
        let git = MockGitOps::default();
        let repo = LocalRepository::clone_from(&git, "https://example.com/t", "demo").unwrap();
        assert_eq!(repo.name(), "demo");

        let readme = PathBuf::from("README.md");
        assert_eq!(repo.read_file(&readme).unwrap(), "# template\n");
        repo.write_file(&readme, "# demo\n").unwrap();
        assert_eq!(repo.read_file(&readme).unwrap(), "# demo\n");
    }

    #[test]
    fn test_workdir_removed_after_push() {
        let git = MockGitOps::default();
        let repo = LocalRepository::clone_from(&git, "https://example.com/t", "demo").unwrap();
        let path = repo.path().to_path_buf();
        assert!(path.exists());

        let credentials = PushCredentials {
            username: "PAT".to_string(),
            password: "ghp".to_string(),
        };
        repo.push(&git, "new", &credentials).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_commit_file_stages_then_commits() {
        let git = MockGitOps::default();
        let repo = LocalRepository::clone_from(&git, "https://example.com/t", "demo").unwrap();
        repo.commit_file(
            &git,
            Path::new("README.md"),
            "Templated GitHub Action",
            &Signature::for_login("octocat"),
        )
        .unwrap();

        let calls = git.calls.borrow();
        assert_eq!(calls[1], "add README.md");
        assert_eq!(
            calls[2],
            "commit Templated GitHub Action by octocat@users.noreply.github.com"
        );
    }

    #[test]
    fn test_push_failure_is_push_error() {
        let git = MockGitOps {
            fail_push: true,
            ..Default::default()
        };
        let repo = LocalRepository::clone_from(&git, "https://example.com/t", "demo").unwrap();
        let credentials = PushCredentials {
            username: "PAT".to_string(),
            password: "ghp".to_string(),
        };
        let err = repo.push(&git, "new", &credentials).unwrap_err();
        assert!(matches!(err, Error::Push { .. }));
    }

    #[test]
    fn test_credentials_debug_redacted() {
        let credentials = PushCredentials {
            username: "PAT".to_string(),
            password: "ghp_secret".to_string(),
        };
        assert!(!format!("{:?}", credentials).contains("ghp_secret"));
    }
}
