//! Deno Deploy dashboard API client.
//!
//! The dashboard API is private and undocumented; requests authenticate with
//! the `token` cookie the dashboard itself uses. Error bodies carry a
//! `message` field that is passed through when present.

use crate::defaults;
use crate::error::{Error, Result};
use crate::http::{HttpTransport, Request};
use crate::phases::{DeployProject, Step};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Organisation {
    pub id: String,
}

#[derive(Debug, Deserialize)]
struct CreatedProject {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateProject<'a> {
    name: &'a str,
    organization_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LinkRepository<'a> {
    organization: &'a str,
    repo: &'a str,
    production_branch: &'a str,
    project_id: &'a str,
}

pub struct DenoDeployClient<'a> {
    http: &'a dyn HttpTransport,
    base: &'a Url,
    token: &'a str,
}

impl<'a> DenoDeployClient<'a> {
    pub fn new(http: &'a dyn HttpTransport, base: &'a Url, token: &'a str) -> Self {
        Self { http, base, token }
    }

    /// `GET /organizations`
    pub fn organisations(&self) -> Result<Vec<Organisation>> {
        let step = Step::DiscoverOrganisation;
        let request = Request::get(self.base.join("organizations")?).cookie(self.token);
        self.http
            .send_for(step, &request)?
            .expect_success(step)?
            .json(step)
    }

    /// The one organisation the token reaches.
    ///
    /// Accounts with several organisations are not supported.
    pub fn sole_organisation(&self) -> Result<Organisation> {
        let mut organisations = self.organisations()?;
        match organisations.len() {
            0 => Err(Error::NoOrganisation),
            1 => Ok(organisations.remove(0)),
            count => Err(Error::UnsupportedOrganisations { count }),
        }
    }

    /// `POST /projects`
    pub fn create_project(&self, organisation: &Organisation, name: &str) -> Result<DeployProject> {
        let step = Step::CreateDenoProject;
        let request = Request::post(self.base.join("projects")?)
            .cookie(self.token)
            .json(&CreateProject {
                name,
                organization_id: &organisation.id,
            })?;
        let created: CreatedProject = self
            .http
            .send_for(step, &request)?
            .expect_success(step)?
            .json(step)?;

        if created.id.is_empty() {
            return Err(Error::Decode {
                step,
                message: "response carries no project id".to_string(),
            });
        }

        Ok(DeployProject {
            id: created.id,
            name: name.to_string(),
        })
    }

    /// `POST /github/link`: deploy `owner/repo` to `project` on every push to
    /// the production branch.
    pub fn link_repository(&self, owner: &str, repo: &str, project: &DeployProject) -> Result<()> {
        let step = Step::LinkProject;
        let link_error = |message: String| Error::Link {
            project: project.name.clone(),
            message,
        };

        let request = Request::post(self.base.join("github/link")?)
            .cookie(self.token)
            .json(&LinkRepository {
                organization: owner,
                repo,
                production_branch: defaults::PRODUCTION_BRANCH,
                project_id: &project.id,
            })?;
        let response = self
            .http
            .send_for(step, &request)
            .map_err(|e| link_error(e.to_string()))?;

        if !response.is_success() {
            let message = match response.error_message() {
                Some(detail) => format!("got {} ({})", response.status, detail),
                None => format!("got {}", response.status),
            };
            return Err(link_error(message));
        }

        Ok(())
    }
}
