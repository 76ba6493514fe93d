use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde_json::json;

use crate::error::{Result, TagflowError};
use crate::remote::RemoteApi;

/// Read calls (tag lookup) get a short timeout; the just-pushed tag check is
/// retried by the verifier anyway.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);
/// Workflow dispatch is attempted once, so it gets more headroom.
const DISPATCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Gitea REST API client.
///
/// Covers the two calls tagflow makes: tag-ref lookup and workflow dispatch,
/// both authenticated with a bearer token.
#[derive(Debug)]
pub struct GiteaClient {
    server: Url,
    repo: String,
    token: String,
    http: Client,
}

impl GiteaClient {
    /// Creates a client for a repository on a Gitea server.
    ///
    /// # Arguments
    /// * `server` - Base server URL, e.g. "https://git.example.com"
    /// * `repo` - Repository in "owner/name" form
    /// * `token` - API token used as a bearer credential
    pub fn new(
        server: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        let server = Url::parse(&server.into())
            .map_err(|e| TagflowError::input(format!("invalid server URL: {}", e)))?;

        let http = Client::builder()
            .build()
            .map_err(|e| TagflowError::remote("building HTTP client", e.to_string()))?;

        Ok(GiteaClient {
            server,
            repo: repo.into(),
            token: token.into(),
            http,
        })
    }

    /// Joins path segments onto the server URL.
    ///
    /// Each segment is percent-encoded individually; tag names and workflow
    /// files may carry URL-reserved characters (a tag can even contain '/'),
    /// and those must not change the request target.
    fn api_url(&self, tail: &[&str]) -> Result<Url> {
        let mut url = self.server.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| TagflowError::input("server URL cannot hold a path"))?;
            segments.pop_if_empty();
            segments.extend(["api", "v1", "repos"]);
            segments.extend(self.repo.split('/'));
            segments.extend(tail);
        }
        Ok(url)
    }

    fn read_body(response: Response) -> String {
        response
            .text()
            .unwrap_or_else(|e| format!("<unreadable response body: {}>", e))
    }
}

impl RemoteApi for GiteaClient {
    fn tag_exists(&self, tag_name: &str) -> Result<bool> {
        let url = self.api_url(&["git", "refs", "tags", tag_name])?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .timeout(LOOKUP_TIMEOUT)
            .send()
            .map_err(|e| TagflowError::remote("tag lookup", e.to_string()))?;

        if response.status().is_success() {
            Ok(true)
        } else if response.status() == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            let status = response.status();
            Err(TagflowError::remote(
                format!("tag lookup for '{}'", tag_name),
                format!("HTTP {}: {}", status, Self::read_body(response)),
            ))
        }
    }

    fn dispatch_workflow(&self, workflow: &str, tag_name: &str) -> Result<()> {
        let url = self.api_url(&["actions", "workflows", workflow, "dispatches"])?;

        let body = json!({
            "ref": format!("refs/tags/{}", tag_name),
            "inputs": { "tag": tag_name },
        });

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .timeout(DISPATCH_TIMEOUT)
            .json(&body)
            .send()
            .map_err(|e| TagflowError::remote("workflow dispatch", e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            Err(TagflowError::remote(
                format!("dispatching workflow '{}' for tag '{}'", workflow, tag_name),
                format!("HTTP {}: {}", status, Self::read_body(response)),
            ))
        }
    }
}
