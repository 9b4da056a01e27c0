//! Repository secrets: fetch the Actions public key, seal, upload.

use super::{Context, Ledger, SideEffect, Step};
use crate::error::Result;
use crate::platforms::GitHubClient;
use crate::seal;

/// Store `value` as the Actions secret `name` of `owner/repo`.
///
/// The key is fetched again for every secret; GitHub may rotate it.
pub fn upload(
    ctx: &Context<'_>,
    ledger: &mut Ledger,
    owner: &str,
    repo: &str,
    name: &str,
    value: &str,
) -> Result<()> {
    ctx.begin(Step::UploadSecret);
    let config = ctx.config;
    let github = GitHubClient::new(ctx.http, &config.endpoints.github_api, &config.github_token);

    let public_key = github.repository_public_key(owner, repo)?;
    let sealed = seal::seal(&public_key.key, value)?;
    log::debug!("sealed {} with key {}", name, public_key.key_id);

    github.put_repository_secret(owner, repo, name, &sealed, &public_key.key_id)?;
    ledger.record(SideEffect::SecretUploaded {
        owner: owner.to_string(),
        repo: repo.to_string(),
        name: name.to_string(),
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, CLOUDFLARE_ACCOUNT_ID, CLOUDFLARE_API_TOKEN, GITHUB_TOKEN};
    use crate::error::Error;
    use crate::http::{Method, Response};
    use crate::phases::fakes::{FakeGit, FakeTransport};
    use crate::phases::Silent;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use crypto_box::aead::OsRng;
    use crypto_box::SecretKey;

    fn config() -> Config {
        Config::from_lookup("x-cloudflare", "demo", |name| match name {
            GITHUB_TOKEN => Some("ghp".to_string()),
            CLOUDFLARE_ACCOUNT_ID => Some("acc".to_string()),
            CLOUDFLARE_API_TOKEN => Some("cf".to_string()),
            _ => None,
        })
        .unwrap()
    }

    const KEY_PATH: &str = "/repos/octocat/demo/actions/secrets/public-key";

    #[test]
    fn test_upload_sends_openable_ciphertext() {
        let secret = SecretKey::generate(&mut OsRng);
        let public = STANDARD.encode(secret.public_key().as_bytes());
        let body = serde_json::json!({"key_id": "kid-1", "key": public}).to_string();

        let config = config();
        let http = FakeTransport::new()
            .route(Method::Get, KEY_PATH, Response::new(200, body))
            .route(
                Method::Put,
                "/repos/octocat/demo/actions/secrets/CLOUDFLARE_API_TOKEN",
                Response::new(201, ""),
            );
        let git = FakeGit::new("");
        let ctx = Context::new(&config, &http, &git, &Silent);
        let mut ledger = Ledger::new();

        upload(&ctx, &mut ledger, "octocat", "demo", "CLOUDFLARE_API_TOKEN", "cf").unwrap();

        let put = http.requests()[1].body.clone().unwrap();
        assert_eq!(put["key_id"], "kid-1");
        let sealed = STANDARD
            .decode(put["encrypted_value"].as_str().unwrap())
            .unwrap();
        assert_eq!(secret.unseal(&sealed).unwrap(), b"cf");
        assert_eq!(ledger.completed().len(), 1);
    }

    #[test]
    fn test_bad_key_uploads_nothing() {
        let config = config();
        let http = FakeTransport::new().route(
            Method::Get,
            KEY_PATH,
            Response::new(200, r#"{"key_id":"kid-1","key":"AAAA"}"#),
        );
        let git = FakeGit::new("");
        let ctx = Context::new(&config, &http, &git, &Silent);
        let mut ledger = Ledger::new();

        let err = upload(&ctx, &mut ledger, "octocat", "demo", "X", "v").unwrap_err();
        assert!(matches!(err, Error::InvalidKeyLength { length: 3 }));
        assert_eq!(http.requests().len(), 1);
        assert!(ledger.completed().is_empty());
    }
}
