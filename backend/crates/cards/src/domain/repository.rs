//! Source Traits
//!
//! Interfaces for upstream data access. Implementations are in the infra layer.

use crate::domain::entities::{
    ContributionDay, RawGist, RepoLanguages, RepositoryOwners, UserActivity, WakaTimeStats,
};
use crate::domain::value_objects::StatsExtras;
use crate::error::CardResult;

/// Parameters of the stats query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsQuery {
    pub login: String,
    /// Count commits of this year instead of the last twelve months
    pub commits_year: Option<i32>,
    pub extras: StatsExtras,
    /// Keep paging repositories while they still have stars
    pub multi_page_stars: bool,
}

/// User stats source
#[trait_variant::make(StatsSource: Send)]
pub trait LocalStatsSource {
    /// Profile counters and starred repositories
    async fn user_activity(&self, query: &StatsQuery) -> CardResult<UserActivity>;

    /// All-time commit count from commit search
    async fn total_commits(&self, login: &str) -> CardResult<u64>;
}

/// Repository languages source
#[trait_variant::make(LanguageSource: Send)]
pub trait LocalLanguageSource {
    /// Languages of the user's non-fork repositories
    async fn repository_languages(&self, login: &str) -> CardResult<Vec<RepoLanguages>>;
}

/// Single repository source
#[trait_variant::make(RepositorySource: Send)]
pub trait LocalRepositorySource {
    /// Look `owner/name` up as both a user and an organization repository
    async fn repository(&self, owner: &str, name: &str) -> CardResult<RepositoryOwners>;
}

/// Gist source
#[trait_variant::make(GistSource: Send)]
pub trait LocalGistSource {
    async fn gist(&self, id: &str) -> CardResult<Option<RawGist>>;
}

/// Contribution calendar source
#[trait_variant::make(ContributionSource: Send)]
pub trait LocalContributionSource {
    /// One entry per day of the last year
    async fn contribution_calendar(&self, login: &str) -> CardResult<Vec<ContributionDay>>;
}

/// WakaTime stats source
#[trait_variant::make(WakaTimeSource: Send)]
pub trait LocalWakaTimeSource {
    async fn stats(&self, username: &str, api_domain: &str) -> CardResult<WakaTimeStats>;
}

/// Everything the GitHub-backed cards read
pub trait GithubSources:
    StatsSource
    + LanguageSource
    + RepositorySource
    + GistSource
    + ContributionSource
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> GithubSources for T where
    T: StatsSource
        + LanguageSource
        + RepositorySource
        + GistSource
        + ContributionSource
        + Clone
        + Send
        + Sync
        + 'static
{
}
