//! GitHub HTTP client
//!
//! Thin transport over the GraphQL and REST endpoints. Every call takes the
//! credential chosen by the retrier for that attempt and hands back the raw
//! JSON envelope; interpreting it is left to the caller.

use std::time::Duration;

use http::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use serde_json::{Value, json};

use crate::credentials::Credential;
use crate::retry::{FetchFault, RawResponse};

pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";
pub const DEFAULT_REST_URL: &str = "https://api.github.com";

const USER_AGENT: &str = "github-profile-cards";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    graphql_url: String,
    rest_base_url: String,
}

impl GithubClient {
    /// Client pointed at api.github.com
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_base_urls(DEFAULT_GRAPHQL_URL, DEFAULT_REST_URL)
    }

    /// Client pointed at custom endpoints (GitHub Enterprise, test servers)
    pub fn with_base_urls(
        graphql_url: impl Into<String>,
        rest_base_url: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(REQUEST_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            graphql_url: graphql_url.into(),
            rest_base_url: rest_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// POST a GraphQL document
    pub async fn graphql(
        &self,
        query: &str,
        variables: Value,
        credential: Option<Credential>,
    ) -> Result<RawResponse, FetchFault> {
        let request = self
            .http
            .post(&self.graphql_url)
            .json(&json!({ "query": query, "variables": variables }));
        self.send(request, credential.as_ref()).await
    }

    /// GET a REST path such as `/search/commits?q=author:octocat`
    pub async fn rest_get(
        &self,
        path: &str,
        accept: Option<&str>,
        credential: Option<Credential>,
    ) -> Result<RawResponse, FetchFault> {
        let url = format!("{}/{}", self.rest_base_url, path.trim_start_matches('/'));
        let mut request = self.http.get(url);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }
        self.send(request, credential.as_ref()).await
    }

    async fn send(
        &self,
        mut request: reqwest::RequestBuilder,
        credential: Option<&Credential>,
    ) -> Result<RawResponse, FetchFault> {
        if let Some(credential) = credential {
            request = request.header(AUTHORIZATION, bearer(credential)?);
        }

        let response = request
            .send()
            .await
            .map_err(|err| FetchFault::Transport(Box::new(err)))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| FetchFault::Transport(Box::new(err)))?;

        let raw = RawResponse::new(status.as_u16(), decode_body(&bytes));
        if status.is_success() {
            Ok(raw)
        } else {
            tracing::debug!(status = raw.status, "GitHub responded with an error status");
            Err(FetchFault::Status(raw))
        }
    }
}

fn bearer(credential: &Credential) -> Result<HeaderValue, FetchFault> {
    let mut value = HeaderValue::from_str(&format!("bearer {}", credential.expose()))
        .map_err(|err| FetchFault::Transport(Box::new(err)))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Non-JSON bodies (HTML error pages) are kept as a string
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
