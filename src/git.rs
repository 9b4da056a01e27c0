use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Clone a repository into `target_dir`.
///
/// This uses the system git command with terminal prompts disabled, so an
/// address that needs credentials fails instead of hanging. GitHub answers
/// both "does not exist" and "private" with an authentication challenge;
/// those are reported as `Error::RepositoryNotFound`.
pub fn clone(url: &str, target_dir: &Path) -> Result<()> {
    let output = git()
        .args(["clone", "--quiet", url])
        .arg(target_dir)
        .output()
        .map_err(|e| Error::GitClone {
            url: url.to_string(),
            message: e.to_string(),
            hint: Some("Make sure git is installed and on PATH".to_string()),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);

        if is_unresolvable(&stderr) {
            return Err(Error::RepositoryNotFound {
                url: url.to_string(),
            });
        }

        return Err(Error::GitClone {
            url: url.to_string(),
            message: stderr.trim().to_string(),
            hint: None,
        });
    }

    Ok(())
}

/// Add a remote named `name` pointing at `url`.
pub fn add_remote(repo_dir: &Path, name: &str, url: &str) -> Result<()> {
    run(repo_dir, ["remote", "add", name, url], &[])?;
    Ok(())
}

/// Stage a single path.
pub fn stage(repo_dir: &Path, path: &Path) -> Result<()> {
    run(
        repo_dir,
        [OsStr::new("add"), OsStr::new("--"), path.as_os_str()],
        &[],
    )?;
    Ok(())
}

/// Commit the index with an explicit author and committer.
///
/// An unchanged index still produces a commit, so a template without
/// placeholders bootstraps the same way as one with them.
pub fn commit(repo_dir: &Path, message: &str, author_name: &str, author_email: &str) -> Result<()> {
    let name = format!("user.name={}", author_name);
    let email = format!("user.email={}", author_email);
    run(
        repo_dir,
        [
            "-c",
            name.as_str(),
            "-c",
            email.as_str(),
            "commit",
            "--quiet",
            "--allow-empty",
            "-m",
            message,
        ],
        &[],
    )?;
    Ok(())
}

/// Push the current branch to `remote` using HTTP basic auth.
///
/// The credential travels in an `http.extraHeader` supplied through the
/// `GIT_CONFIG_*` environment, so it never appears in the process arguments,
/// the remote URL or the repository config.
pub fn push(repo_dir: &Path, remote: &str, username: &str, password: &str) -> Result<()> {
    let credentials = STANDARD.encode(format!("{}:{}", username, password));
    let header = format!("Authorization: Basic {}", credentials);
    let env = [
        ("GIT_CONFIG_COUNT", "1"),
        ("GIT_CONFIG_KEY_0", "http.extraHeader"),
        ("GIT_CONFIG_VALUE_0", header.as_str()),
    ];
    run(repo_dir, ["push", "--quiet", remote, "HEAD"], &env)?;
    Ok(())
}

fn git() -> Command {
    let mut command = Command::new("git");
    command.env("GIT_TERMINAL_PROMPT", "0");
    command
}

fn run<I, S>(repo_dir: &Path, args: I, env: &[(&str, &str)]) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<S> = args.into_iter().collect();
    let label = args
        .iter()
        .map(|a| a.as_ref().to_string_lossy().into_owned())
        .find(|a| !a.starts_with('-') && !a.contains('='))
        .unwrap_or_default();

    let mut command = git();
    command.arg("-C").arg(repo_dir).args(&args);
    for (key, value) in env {
        command.env(key, value);
    }

    let output = command.output().map_err(|e| Error::GitCommand {
        command: label.clone(),
        stderr: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command: label,
            stderr: failure_reason(&output),
        });
    }

    Ok(output)
}

/// Some failures (`nothing to commit`) are only explained on stdout.
fn failure_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        return stderr.trim().to_string();
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Whether clone stderr means the address is unknown or unauthorized.
fn is_unresolvable(stderr: &str) -> bool {
    let stderr = stderr.to_lowercase();
    [
        "authentication failed",
        "authentication required",
        "could not read username",
        "terminal prompts disabled",
        "repository not found",
        "does not exist",
    ]
    .iter()
    .any(|needle| stderr.contains(needle))
}
