//! WakaTime Source Implementation
//!
//! WakaTime is public and unauthenticated, so no credential rotation here.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::entities::{WakaTimeEntry, WakaTimeStats};
use crate::domain::repository::WakaTimeSource;
use crate::error::{CardError, CardResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct StatsEnvelope {
    data: StatsData,
}

#[derive(Debug, Deserialize)]
struct StatsData {
    username: Option<String>,
    range: Option<String>,
    human_readable_range: Option<String>,
    human_readable_total: Option<String>,
    human_readable_total_including_other_language: Option<String>,
    #[serde(default)]
    is_coding_activity_visible: bool,
    #[serde(default)]
    is_other_usage_visible: bool,
    #[serde(default)]
    languages: Vec<EntryNode>,
}

#[derive(Debug, Deserialize)]
struct EntryNode {
    name: String,
    #[serde(default)]
    percent: f64,
    #[serde(default)]
    text: String,
    #[serde(default)]
    hours: u64,
    #[serde(default)]
    minutes: u64,
}

#[derive(Debug, Clone)]
pub struct WakaTimeClient {
    http: reqwest::Client,
    /// Replaces `https://<api_domain>` when set
    base_url: Option<String>,
}

impl WakaTimeClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: Self::build_http()?,
            base_url: None,
        })
    }

    /// Client that ignores the requested domain and talks to `base_url`
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: Self::build_http()?,
            base_url: Some(base_url.into().trim_end_matches('/').to_string()),
        })
    }

    fn build_http() -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .user_agent("github-profile-cards")
            .timeout(REQUEST_TIMEOUT)
            .build()
    }

    fn stats_url(&self, username: &str, api_domain: &str) -> String {
        let base = match &self.base_url {
            Some(base) => base.clone(),
            None => format!("https://{api_domain}"),
        };
        format!("{base}/api/v1/users/{username}/stats?is_including_today=true")
    }
}

impl WakaTimeSource for WakaTimeClient {
    async fn stats(&self, username: &str, api_domain: &str) -> CardResult<WakaTimeStats> {
        let url = self.stats_url(username, api_domain);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| CardError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%username, status = status.as_u16(), "WakaTime stats unavailable");
            return Err(CardError::WakaTimeUserNotFound(username.to_string()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| CardError::Transport(err.to_string()))?;
        let StatsEnvelope { data } = serde_json::from_slice(&bytes)?;

        Ok(WakaTimeStats {
            username: data.username.unwrap_or_else(|| username.to_string()),
            range: data.range,
            human_readable_range: data.human_readable_range,
            human_readable_total: data
                .human_readable_total_including_other_language
                .or(data.human_readable_total),
            is_coding_activity_visible: data.is_coding_activity_visible,
            is_other_usage_visible: data.is_other_usage_visible,
            languages: data
                .languages
                .into_iter()
                .map(|entry| WakaTimeEntry {
                    name: entry.name,
                    percent: entry.percent,
                    text: entry.text,
                    hours: entry.hours,
                    minutes: entry.minutes,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_stats_url_uses_domain() {
        let client = WakaTimeClient::new().unwrap();
        assert_eq!(
            client.stats_url("octocat", "wakapi.dev"),
            "https://wakapi.dev/api/v1/users/octocat/stats?is_including_today=true"
        );
    }

    #[tokio::test]
    async fn test_stats_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/octocat/stats"))
            .and(query_param("is_including_today", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "username": "octocat",
                    "range": "last_7_days",
                    "human_readable_range": "last week",
                    "human_readable_total": "10 hrs",
                    "human_readable_total_including_other_language": "11 hrs",
                    "is_coding_activity_visible": true,
                    "is_other_usage_visible": false,
                    "languages": [
                        { "name": "Rust", "percent": 70.5, "text": "7 hrs 3 mins", "hours": 7, "minutes": 3 },
                        { "name": "TOML", "percent": 29.5, "text": "2 hrs 57 mins", "hours": 2, "minutes": 57 }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let client = WakaTimeClient::with_base_url(server.uri()).unwrap();
        let stats = client.stats("octocat", "wakatime.com").await.unwrap();

        assert_eq!(stats.human_readable_total.as_deref(), Some("11 hrs"));
        assert!(stats.is_coding_activity_visible);
        assert_eq!(stats.languages.len(), 2);
        assert_eq!(stats.languages[0].name, "Rust");
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Not found" })))
            .mount(&server)
            .await;

        let client = WakaTimeClient::with_base_url(server.uri()).unwrap();
        match client.stats("ghost", "wakatime.com").await.unwrap_err() {
            CardError::WakaTimeUserNotFound(username) => assert_eq!(username, "ghost"),
            other => panic!("expected WakaTime user not found, got {other:?}"),
        }
    }
}
