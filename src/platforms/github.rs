//! GitHub REST API client.
//!
//! Covers the four calls a bootstrap makes: who am I, create a repository,
//! fetch a repository's Actions public key, and store an encrypted Actions
//! secret. All requests are bearer-authenticated with the user's token.

use crate::defaults;
use crate::error::Result;
use crate::http::{HttpTransport, Request};
use crate::phases::{AccountIdentity, Step};
use serde::{Deserialize, Serialize};
use url::Url;

/// Public key GitHub uses to open Actions secrets for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryPublicKey {
    pub key_id: String,
    /// Base64-encoded X25519 public key
    pub key: String,
}

#[derive(Debug, Serialize)]
struct CreateRepository<'a> {
    name: &'a str,
    private: bool,
}

#[derive(Debug, Serialize)]
struct PutSecret<'a> {
    encrypted_value: &'a str,
    key_id: &'a str,
}

pub struct GitHubClient<'a> {
    http: &'a dyn HttpTransport,
    base: &'a Url,
    token: &'a str,
}

impl<'a> GitHubClient<'a> {
    pub fn new(http: &'a dyn HttpTransport, base: &'a Url, token: &'a str) -> Self {
        Self { http, base, token }
    }

    fn request(&self, request: Request) -> Request {
        request
            .bearer(self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", defaults::GITHUB_API_VERSION)
    }

    /// `GET /user`
    pub fn current_user(&self) -> Result<AccountIdentity> {
        let step = Step::DiscoverUser;
        let request = self.request(Request::get(self.base.join("user")?));
        self.http
            .send_for(step, &request)?
            .expect_success(step)?
            .json(step)
    }

    /// `POST /user/repos`, always private.
    pub fn create_repository(&self, name: &str) -> Result<()> {
        let step = Step::CreateRepository;
        let request = self
            .request(Request::post(self.base.join("user/repos")?))
            .json(&CreateRepository {
                name,
                private: true,
            })?;
        self.http.send_for(step, &request)?.expect_success(step)?;
        Ok(())
    }

    /// `GET /repos/{owner}/{repo}/actions/secrets/public-key`
    pub fn repository_public_key(&self, owner: &str, repo: &str) -> Result<RepositoryPublicKey> {
        let step = Step::FetchPublicKey;
        let path = format!("repos/{}/{}/actions/secrets/public-key", owner, repo);
        let request = self.request(Request::get(self.base.join(&path)?));
        self.http
            .send_for(step, &request)?
            .expect_success(step)?
            .json(step)
    }

    /// `PUT /repos/{owner}/{repo}/actions/secrets/{name}`
    pub fn put_repository_secret(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        encrypted_value: &str,
        key_id: &str,
    ) -> Result<()> {
        let step = Step::UploadSecret;
        let path = format!("repos/{}/{}/actions/secrets/{}", owner, repo, name);
        let request = self
            .request(Request::put(self.base.join(&path)?))
            .json(&PutSecret {
                encrypted_value,
                key_id,
            })?;
        self.http.send_for(step, &request)?.expect_success(step)?;
        Ok(())
    }
}
