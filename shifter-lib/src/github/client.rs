//! The client for the real hosted API, speaking REST over HTTPS.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::error::{optional, GithubError, Result};
use super::types::{Comment, CreateRepositoryRequest, Issue, Repository, User};
use super::GithubApi;
use crate::core::config::GITHUB_API_BASE_URL;
use crate::core::credentials::Token;

/// Number of items requested per page from list endpoints. This is the
/// largest page size the API allows.
const PAGE_SIZE: usize = 100;

/// The shape of an error response body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the hosted API, authenticated with a credential token.
pub struct HttpGithubClient {
    http_client: Client,
    base_url: String,
}

impl std::fmt::Debug for HttpGithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<HttpGithubClient base_url={:?}>", self.base_url)
    }
}

impl HttpGithubClient {
    /// Create a client for the public API endpoint.
    pub fn new(token: &Token) -> Result<Self> {
        Self::with_base_url(token, GITHUB_API_BASE_URL)
    }

    /// Create a client for an API endpoint at the given base URL.
    pub fn with_base_url(token: &Token, base_url: &str) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
            .map_err(|_| GithubError::Unauthorized {
                message: "token contains characters which cannot be sent in a header".to_owned(),
            })?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let http_client = Client::builder()
            .user_agent(concat!("shifter/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, ?url, "Sending request");
        self.http_client.request(method, url)
    }

    fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text()?;
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(ErrorBody { message }) => message,
            Err(_) => text,
        };
        Err(GithubError::from_status(status.as_u16(), message))
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = Self::check_status(request.send()?)?;
        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }

    fn get_all_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        for page in 1.. {
            let page = page.to_string();
            let per_page = PAGE_SIZE.to_string();
            let request = self
                .request(Method::GET, path)
                .query(&[("per_page", per_page.as_str()), ("page", page.as_str())]);
            let page_items: Vec<T> = self.send(request)?;
            let is_last_page = page_items.len() < PAGE_SIZE;
            items.extend(page_items);
            if is_last_page {
                break;
            }
        }
        Ok(items)
    }
}

impl GithubApi for HttpGithubClient {
    #[instrument]
    fn get_current_user(&self) -> Result<User> {
        self.send(self.request(Method::GET, "/user"))
    }

    #[instrument]
    fn find_repository(&self, owner: &str, name: &str) -> Result<Option<Repository>> {
        let path = format!("/repos/{owner}/{name}");
        optional(self.send(self.request(Method::GET, &path)))
    }

    #[instrument]
    fn create_repository(&self, request: &CreateRepositoryRequest) -> Result<Repository> {
        self.send(self.request(Method::POST, "/user/repos").json(request))
    }

    #[instrument]
    fn delete_repository(&self, owner: &str, name: &str) -> Result<()> {
        let path = format!("/repos/{owner}/{name}");
        let response = Self::check_status(self.request(Method::DELETE, &path).send()?)?;
        debug!(status = ?response.status(), "Deleted repository");
        Ok(())
    }

    #[instrument]
    fn list_issues(&self, owner: &str, name: &str) -> Result<Vec<Issue>> {
        // Only the first page is requested: it holds the newest issues, and
        // only the newest one is ever used.
        let path = format!("/repos/{owner}/{name}/issues");
        let per_page = PAGE_SIZE.to_string();
        let request = self.request(Method::GET, &path).query(&[
            ("state", "all"),
            ("sort", "created"),
            ("direction", "desc"),
            ("per_page", per_page.as_str()),
        ]);
        let mut issues: Vec<Issue> = self.send(request)?;
        issues.reverse();
        Ok(issues)
    }

    #[instrument]
    fn list_issue_comments(&self, owner: &str, name: &str, number: u64) -> Result<Vec<Comment>> {
        let path = format!("/repos/{owner}/{name}/issues/{number}/comments");
        self.get_all_pages(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_does_not_show_token() -> eyre::Result<()> {
        let client = HttpGithubClient::with_base_url(
            &Token::new("ghp_secret"),
            "https://github.example.com/api/v3/",
        )?;
        let debug = format!("{client:?}");
        assert!(!debug.contains("ghp_secret"));
        assert_eq!(
            debug,
            r#"<HttpGithubClient base_url="https://github.example.com/api/v3">"#
        );
        Ok(())
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let result = HttpGithubClient::new(&Token::new("ghp_\nsecret"));
        assert!(matches!(result, Err(GithubError::Unauthorized { .. })));
    }
}
