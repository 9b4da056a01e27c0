//! # Error Handling
//!
//! This module defines the centralized error type for `launchctl`. It uses
//! the `thiserror` library to create a single `Error` enum that covers every
//! way a bootstrap can fail, with short messages naming the step that failed.
//!
//! ## Taxonomy
//!
//! - **Missing configuration**: `MissingEnv`. Raised before any network or
//!   Git call is made.
//! - **Unsupported input**: `UnknownFlavour`, `NoOrganisation`,
//!   `UnsupportedOrganisations`. Raised before the remote mutation they guard.
//! - **Remote failures**: `Network`, `Status`, `Decode`, `GitClone`,
//!   `GitCommand`, plus the local `Local`, `Template`, `Seal` and I/O errors.
//! - **Late-stage failures**: `Link` and `Push` are kept apart so a caller can
//!   tell "project created but not wired to Git" from "nothing was pushed".
//!   `Incomplete` wraps any failure that happens after a remote resource was
//!   created and carries the ledger of what was left behind.

use crate::phases::{SideEffect, Step};
use thiserror::Error;

/// Main error type for launchctl operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required environment variable is unset or empty.
    #[error("Missing required env var {name}")]
    MissingEnv { name: String },

    /// The flavour does not name a template or a deployment target.
    #[error("unknown flavour: {flavour}")]
    UnknownFlavour { flavour: String },

    /// The Deno Deploy token reaches no organisation at all.
    #[error("failed to discover Deno Deploy organisation: no organisation found")]
    NoOrganisation,

    /// The Deno Deploy token reaches more than one organisation.
    #[error("we only support 1 organisation but found {count}")]
    UnsupportedOrganisations { count: usize },

    /// The request never produced a response.
    #[error("failed to {step}: {message}")]
    Network { step: Step, message: String },

    /// The remote answered with a non-2xx status.
    #[error("failed to {step}: got {status}{}", message.as_ref().map(|m| format!(" ({})", m)).unwrap_or_default())]
    Status {
        step: Step,
        status: u16,
        /// Error message supplied by the platform, when one could be decoded
        message: Option<String>,
    },

    /// The remote answered 2xx but the body was not what we expected.
    #[error("failed to {step}: {message}")]
    Decode { step: Step, message: String },

    /// The clone address does not resolve or requires credentials we lack.
    #[error("repository not found: {url}")]
    RepositoryNotFound { url: String },

    /// An error occurred while cloning a Git repository.
    #[error("Git clone error for {url}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    GitClone {
        url: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// An error occurred while executing a Git command.
    #[error("Git command failed: {command} - {stderr}")]
    GitCommand { command: String, stderr: String },

    /// An error occurred while rendering the workflow template.
    #[error("Template processing error: {message}{}", variable.as_ref().map(|v| format!(" (variable: {})", v)).unwrap_or_default())]
    Template {
        message: String,
        /// The template variable that caused the error, if applicable
        variable: Option<String>,
    },

    /// A step working on the local clone failed.
    #[error("failed to {step}: {message}")]
    Local { step: Step, message: String },

    /// The recipient key decoded to the wrong number of bytes.
    #[error("recipient public key has invalid length ({length} bytes)")]
    InvalidKeyLength { length: usize },

    /// Authenticated encryption of a secret failed.
    #[error("failed to encrypt secret: {message}")]
    Seal { message: String },

    /// Linking the deployment project to the repository failed.
    #[error("failed to link Deno Deploy project {project}: {message}")]
    Link { project: String, message: String },

    /// Pushing the committed workflow to the new remote failed.
    #[error("failed to push to {remote}: {message}")]
    Push { remote: String, message: String },

    /// A step failed after at least one remote resource had been created.
    ///
    /// Nothing is rolled back; `completed` lists what was left behind.
    #[error("{source}")]
    Incomplete {
        completed: Vec<SideEffect>,
        source: Box<Error>,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {message}")]
    Client { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A base64 decoding error, wrapped from `base64::DecodeError`.
    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Side effects left behind by a failed bootstrap, if any.
    pub fn orphaned(&self) -> &[SideEffect] {
        match self {
            Error::Incomplete { completed, .. } => completed,
            _ => &[],
        }
    }

    /// The underlying failure, looking through `Incomplete`.
    pub fn root(&self) -> &Error {
        match self {
            Error::Incomplete { source, .. } => source.root(),
            other => other,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
