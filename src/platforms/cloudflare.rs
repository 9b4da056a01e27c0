//! Cloudflare Pages API client.

use crate::defaults;
use crate::error::Result;
use crate::http::{HttpTransport, Request};
use crate::phases::Step;
use serde_json::json;
use url::Url;

pub struct CloudflareClient<'a> {
    http: &'a dyn HttpTransport,
    base: &'a Url,
    token: &'a str,
}

impl<'a> CloudflareClient<'a> {
    pub fn new(http: &'a dyn HttpTransport, base: &'a Url, token: &'a str) -> Self {
        Self { http, base, token }
    }

    /// `POST /accounts/{account}/pages/projects`
    ///
    /// The project starts empty; the repository's workflow deploys to it.
    pub fn create_pages_project(&self, account_id: &str, name: &str) -> Result<()> {
        let step = Step::CreatePagesProject;
        let path = format!("accounts/{}/pages/projects", account_id);
        let request = Request::post(self.base.join(&path)?)
            .bearer(self.token)
            .json(&json!({
                "build_config": {},
                "canonical_deployment": {},
                "deployment_configs": {
                    "preview": {},
                    "production": {}
                },
                "latest_deployment": {},
                "name": name,
                "production_branch": defaults::PRODUCTION_BRANCH
            }))?;
        self.http.send_for(step, &request)?.expect_success(step)?;
        Ok(())
    }
}
