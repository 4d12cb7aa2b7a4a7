//! API DTOs (Data Transfer Objects)
//!
//! Query parameters are kept as raw strings and parsed leniently: a value
//! that does not parse falls back to the card default instead of failing
//! the request.

use serde::{Deserialize, Serialize};

use crate::application::config::parse_list;
use crate::domain::entities::{
    ContributionDay, Gist, LanguageStat, PrimaryLanguage, Repository, UserStats,
};
use crate::domain::rank::RankResult;

/// `"true"`/`"false"`, anything else is unset
pub fn parse_boolean(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// Comma-separated list, trimmed, empty entries dropped
pub fn parse_array(value: Option<&str>) -> Vec<String> {
    value.map(parse_list).unwrap_or_default()
}

/// Query for GET /api
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsParams {
    pub username: Option<String>,
    pub include_all_commits: Option<String>,
    pub commits_year: Option<String>,
    pub exclude_repo: Option<String>,
    pub show: Option<String>,
    pub cache_seconds: Option<String>,
}

/// Query for GET /api/top-langs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopLangsParams {
    pub username: Option<String>,
    pub exclude_repo: Option<String>,
    pub hide: Option<String>,
    pub langs_count: Option<String>,
    pub size_weight: Option<String>,
    pub count_weight: Option<String>,
    pub cache_seconds: Option<String>,
}

/// Query for GET /api/pin
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PinParams {
    pub username: Option<String>,
    pub repo: Option<String>,
    pub cache_seconds: Option<String>,
}

/// Query for GET /api/gist
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GistParams {
    pub id: Option<String>,
    pub cache_seconds: Option<String>,
}

/// Query for GET /api/wakatime
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WakaTimeParams {
    pub username: Option<String>,
    pub api_domain: Option<String>,
    pub cache_seconds: Option<String>,
}

/// Query for GET /api/streak and GET /api/activity
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContributionParams {
    pub username: Option<String>,
    pub days: Option<String>,
    pub cache_seconds: Option<String>,
}

/// Response for GET /api
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub name: String,
    pub login: String,
    pub total_stars: u64,
    pub total_commits: u64,
    #[serde(rename = "totalPRs")]
    pub total_prs: u64,
    #[serde(rename = "totalPRsMerged", skip_serializing_if = "Option::is_none")]
    pub total_prs_merged: Option<u64>,
    #[serde(rename = "mergedPRsPercentage", skip_serializing_if = "Option::is_none")]
    pub merged_prs_percentage: Option<f64>,
    pub total_reviews: u64,
    pub total_issues: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_discussions_started: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_discussions_answered: Option<u64>,
    pub contributed_to: u64,
    pub rank: RankResult,
}

impl From<UserStats> for StatsResponse {
    fn from(stats: UserStats) -> Self {
        Self {
            name: stats.name,
            login: stats.login,
            total_stars: stats.total_stars,
            total_commits: stats.total_commits,
            total_prs: stats.total_prs,
            total_prs_merged: stats.total_prs_merged,
            merged_prs_percentage: stats.merged_prs_percentage,
            total_reviews: stats.total_reviews,
            total_issues: stats.total_issues,
            total_discussions_started: stats.total_discussions_started,
            total_discussions_answered: stats.total_discussions_answered,
            contributed_to: stats.contributed_to,
            rank: stats.rank,
        }
    }
}

/// Response for GET /api/top-langs
#[derive(Debug, Clone, Serialize)]
pub struct TopLangsResponse {
    pub languages: Vec<LanguageStat>,
}

/// Response for GET /api/pin
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoResponse {
    pub name: String,
    pub name_with_owner: String,
    pub description: Option<String>,
    pub is_archived: bool,
    pub is_template: bool,
    pub primary_language: Option<PrimaryLanguage>,
    pub star_count: u64,
    pub fork_count: u64,
}

impl From<Repository> for RepoResponse {
    fn from(repo: Repository) -> Self {
        Self {
            name: repo.name,
            name_with_owner: repo.name_with_owner,
            description: repo.description,
            is_archived: repo.is_archived,
            is_template: repo.is_template,
            primary_language: repo.primary_language,
            star_count: repo.star_count,
            fork_count: repo.fork_count,
        }
    }
}

/// Response for GET /api/gist
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GistResponse {
    pub name: String,
    pub name_with_owner: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars_count: u64,
    pub forks_count: u64,
}

impl From<Gist> for GistResponse {
    fn from(gist: Gist) -> Self {
        Self {
            name: gist.name,
            name_with_owner: gist.name_with_owner,
            description: gist.description,
            language: gist.language,
            stars_count: gist.star_count,
            forks_count: gist.fork_count,
        }
    }
}

/// Response for GET /api/activity
#[derive(Debug, Clone, Serialize)]
pub struct ActivityResponse {
    pub days: Vec<ContributionDay>,
}
