//! Clients for the three remote platforms.
//!
//! Each client borrows an `HttpTransport`, a base URL and a token; none of
//! them holds state between calls.

pub mod cloudflare;
pub mod deno;
pub mod github;

pub use cloudflare::CloudflareClient;
pub use deno::{DenoDeployClient, Organisation};
pub use github::{GitHubClient, RepositoryPublicKey};
