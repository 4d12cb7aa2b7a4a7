//! Domain Entities
//!
//! Data each card is built from, as returned by the upstream sources and
//! after post-processing by the use cases.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::rank::RankResult;

/// Stars of one owned repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStars {
    pub name: String,
    pub stars: u64,
}

/// User profile counters as reported by GitHub
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserActivity {
    pub name: Option<String>,
    pub login: String,
    pub commits: u64,
    pub reviews: u64,
    pub contributed_to: u64,
    pub prs: u64,
    /// Only fetched when the card shows merged PRs
    pub merged_prs: Option<u64>,
    pub open_issues: u64,
    pub closed_issues: u64,
    pub followers: u64,
    pub discussions_started: Option<u64>,
    pub discussions_answered: Option<u64>,
    /// Total owned repositories, including ones not in `repositories`
    pub repository_count: u64,
    pub repositories: Vec<RepoStars>,
}

/// Post-processed stats card data
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    pub name: String,
    pub login: String,
    pub total_stars: u64,
    pub total_commits: u64,
    pub total_prs: u64,
    pub total_prs_merged: Option<u64>,
    pub merged_prs_percentage: Option<f64>,
    pub total_reviews: u64,
    pub total_issues: u64,
    pub total_discussions_started: Option<u64>,
    pub total_discussions_answered: Option<u64>,
    pub contributed_to: u64,
    pub rank: RankResult,
}

/// One language edge of a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageEdge {
    pub name: String,
    pub color: Option<String>,
    pub size: u64,
}

/// Languages of one repository, largest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLanguages {
    pub name: String,
    pub languages: Vec<LanguageEdge>,
}

/// Language aggregated over every counted repository
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageStat {
    pub name: String,
    pub color: Option<String>,
    /// Bytes summed over repositories
    pub size: u64,
    /// Repositories using the language
    pub count: u64,
    /// Ranking score after size/count weighting
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimaryLanguage {
    pub name: String,
    pub color: Option<String>,
}

/// Repository as returned by the pin query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub name_with_owner: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub is_archived: bool,
    pub is_template: bool,
    pub primary_language: Option<PrimaryLanguage>,
    pub star_count: u64,
    pub fork_count: u64,
}

/// Result of looking a repository up under both a user and an organization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryOwners {
    /// `Some` when a user with that login exists
    pub user: Option<Option<Repository>>,
    /// `Some` when an organization with that login exists
    pub organization: Option<Option<Repository>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GistFile {
    pub name: String,
    pub language: Option<String>,
    pub size: u64,
}

/// Gist as returned by GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGist {
    pub owner: String,
    pub description: Option<String>,
    pub files: Vec<GistFile>,
    pub star_count: u64,
    pub fork_count: u64,
}

/// Post-processed gist card data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gist {
    pub name: String,
    pub name_with_owner: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub star_count: u64,
    pub fork_count: u64,
}

/// Contributions on one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub count: u64,
}

/// Consecutive days with at least one contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakRun {
    pub length: u64,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl StreakRun {
    pub const EMPTY: StreakRun = StreakRun {
        length: 0,
        start: None,
        end: None,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub total_contributions: u64,
    pub first_contribution: Option<NaiveDate>,
    pub current: StreakRun,
    pub longest: StreakRun,
}

/// Coding time for one WakaTime category (language, editor, ...)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WakaTimeEntry {
    pub name: String,
    pub percent: f64,
    pub text: String,
    pub hours: u64,
    pub minutes: u64,
}

/// WakaTime stats for a user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WakaTimeStats {
    pub username: String,
    pub range: Option<String>,
    pub human_readable_range: Option<String>,
    pub human_readable_total: Option<String>,
    pub is_coding_activity_visible: bool,
    pub is_other_usage_visible: bool,
    pub languages: Vec<WakaTimeEntry>,
}
