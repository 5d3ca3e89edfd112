//! Repository creation through the GitHub REST API.

use super::HelperError;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

const TIMEOUT: Duration = Duration::from_secs(15);

/// Body of `POST /user/repos`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRepoRequest {
    pub name: String,
    pub description: String,
    pub private: bool,
    pub auto_init: bool,
}

impl CreateRepoRequest {
    pub fn new(name: impl Into<String>, description: impl Into<String>, private: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            private,
            auto_init: false,
        }
    }
}

/// Blocking client for the authenticated user's repositories.
pub struct GithubClient {
    http: Client,
    api_url: String,
    token: String,
}

impl GithubClient {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Result<Self, HelperError> {
        let http = Client::builder()
            .timeout(TIMEOUT)
            .user_agent(concat!("calcpad/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Create a repository. Returns the API's JSON description of it.
    pub fn create_repo(
        &self,
        request: &CreateRepoRequest,
    ) -> Result<serde_json::Value, HelperError> {
        let url = format!("{}/user/repos", self.api_url);
        debug!(%url, name = %request.name, private = request.private, "Creating repository");

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .json(request)
            .send()?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let body = response.text().unwrap_or_default();
            return Err(HelperError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let repo: serde_json::Value = response.json()?;
        info!(name = %request.name, "Repository created");
        Ok(repo)
    }
}

/// Create a repository under the token's owner through the API rooted at
/// `api_url` (normally [`crate::config::DEFAULT_GITHUB_API_URL`]).
pub fn create_github_repo(
    api_url: &str,
    token: &str,
    name: &str,
    description: &str,
    private: bool,
) -> Result<serde_json::Value, HelperError> {
    GithubClient::new(api_url, token)?
        .create_repo(&CreateRepoRequest::new(name, description, private))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::test_server::serve_once;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_payload_shape() {
        let request = CreateRepoRequest::new("my-repo", "demo", true);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "name": "my-repo",
                "description": "demo",
                "private": true,
                "auto_init": false,
            })
        );
    }

    #[test]
    fn test_created_response_is_parsed() {
        let (url, server) = serve_once(
            "201 Created",
            "application/json",
            r#"{"full_name":"me/my-repo"}"#,
        );
        let client = GithubClient::new(format!("{}/", url), "secret").unwrap();

        let repo = client
            .create_repo(&CreateRepoRequest::new("my-repo", "", false))
            .unwrap();
        assert_eq!(repo, json!({"full_name": "me/my-repo"}));

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /user/repos "));
        let lower = request.to_lowercase();
        assert!(lower.contains("authorization: token secret"));
        assert!(lower.contains("accept: application/vnd.github+json"));
        assert!(request.contains(r#""auto_init":false"#));
    }

    #[test]
    fn test_error_status_is_reported() {
        let (url, server) = serve_once(
            "422 Unprocessable Entity",
            "application/json",
            r#"{"message":"name already exists"}"#,
        );
        let err = create_github_repo(&url, "secret", "taken", "", false).unwrap_err();
        let request = server.join().unwrap();
        assert!(request.contains(r#""name":"taken""#));
        match err {
            HelperError::Api { status, body } => {
                assert_eq!(status, 422);
                assert!(body.contains("name already exists"));
            }
            other => panic!("expected an API error, got {other:?}"),
        }
    }
}
