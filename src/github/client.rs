//! GitHub REST client
//!
//! Thin request/response wrappers for the user endpoints plus the concurrent
//! starred-repository fetch. All requests go through an injected
//! [`Transport`], so the same client runs against reqwest in production and
//! against scripted transports in tests.

use super::types::{GitHubUser, Repository, UserUpdate};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::{ApiRequest, HttpClient, Transport};
use crate::pagination::{
    check_path_segment, FetchOptions, FetchReport, PageFetcher, PageRoute, GITHUB_ACCEPT,
};
use crate::types::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// GitHub REST client
#[derive(Clone)]
pub struct GitHub {
    transport: Arc<dyn Transport>,
    base_url: Url,
    token: Option<String>,
    accept: String,
    fetch_options: FetchOptions,
}

impl GitHub {
    /// Create a client over a transport
    pub fn new(transport: Arc<dyn Transport>, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
            token: None,
            accept: GITHUB_ACCEPT.to_string(),
            fetch_options: FetchOptions::default(),
        }
    }

    /// Build a reqwest-backed client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_config(config.http_client_config())?;
        let mut client = Self::new(Arc::new(http), config.api.base_url()?)
            .with_accept(config.api.accept.as_str())
            .with_fetch_options(config.fetch.fetch_options());
        client.token = config.token();
        Ok(client)
    }

    /// Set the bearer token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the `Accept` header
    #[must_use]
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    /// Set options for paginated fetches
    #[must_use]
    pub fn with_fetch_options(mut self, options: FetchOptions) -> Self {
        self.fetch_options = options;
        self
    }

    /// API base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Options used for paginated fetches
    pub fn fetch_options(&self) -> &FetchOptions {
        &self.fetch_options
    }

    /// Public profile of `username` (`GET /users/{username}`)
    ///
    /// The token is sent when configured but not required.
    pub async fn get_user(&self, username: &str) -> Result<GitHubUser> {
        check_path_segment("username", username)?;
        let mut request = ApiRequest::get(self.endpoint(&["users", username])?);
        if let Some(token) = &self.token {
            request = request.bearer(token.as_str());
        }
        self.send_json(request).await
    }

    /// Profile of the token holder (`GET /user`)
    pub async fn get_authenticated_user(&self) -> Result<GitHubUser> {
        let request = ApiRequest::get(self.endpoint(&["user"])?).bearer(self.credential()?);
        self.send_json(request).await
    }

    /// Update the token holder's profile (`PATCH /user`)
    pub async fn update_authenticated_user(&self, update: &UserUpdate) -> Result<GitHubUser> {
        if update.is_empty() {
            return Err(Error::invalid_value("update", "no profile fields set"));
        }
        // Not idempotent, so never retried
        let request = ApiRequest::new(Method::PATCH, self.endpoint(&["user"])?)
            .bearer(self.credential()?)
            .json(serde_json::to_value(update)?)
            .retries(0);

        let user: GitHubUser = self.send_json(request).await?;
        info!(login = %user.login, "Updated authenticated user");
        Ok(user)
    }

    /// Repositories starred by `owner`, pages `1..=page_count` fetched concurrently
    ///
    /// `page_count` is not clamped here; see
    /// [`FetchSettings::clamp_pages`](crate::config::FetchSettings::clamp_pages).
    pub async fn starred_repos(&self, owner: &str, page_count: u32) -> Result<FetchReport<Repository>> {
        let credential = self.credential()?;
        self.page_fetcher(PageRoute::starred())
            .fetch(owner, credential, page_count)
            .await
    }

    /// Page fetcher sharing this client's transport, base URL and options
    pub fn page_fetcher(&self, route: PageRoute) -> PageFetcher {
        PageFetcher::new(Arc::clone(&self.transport), self.base_url.clone(), route)
            .with_accept(self.accept.as_str())
            .with_options(self.fetch_options.clone())
    }

    fn credential(&self) -> Result<&str> {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::missing_field("token"))
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                Error::invalid_value("base_url", format!("'{}' cannot be a base URL", self.base_url))
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let request = request.header("Accept", self.accept.as_str());
        debug!(method = %request.method, url = %request.url, "Sending request");
        let response = self.transport.send(request).await?.error_for_status()?;
        response.json()
    }
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub")
            .field("base_url", &self.base_url.as_str())
            .field("has_token", &self.token.is_some())
            .field("accept", &self.accept)
            .field("fetch_options", &self.fetch_options)
            .finish_non_exhaustive()
    }
}
