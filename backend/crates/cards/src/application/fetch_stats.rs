//! Fetch Stats Use Case

use std::sync::Arc;

use crate::application::config::CardsConfig;
use crate::domain::entities::UserStats;
use crate::domain::rank::{RankInput, calculate_rank};
use crate::domain::repository::{StatsQuery, StatsSource};
use crate::domain::services::{merged_prs_percentage, sum_stars};
use crate::domain::value_objects::StatsExtras;
use crate::error::CardResult;

/// Input DTO for fetch stats
#[derive(Debug, Clone, Default)]
pub struct FetchStatsInput {
    pub username: String,
    /// Count all-time commits through commit search
    pub include_all_commits: bool,
    pub commits_year: Option<i32>,
    /// Excluded on top of the deployment's `EXCLUDE_REPO`
    pub exclude_repo: Vec<String>,
    pub extras: StatsExtras,
}

/// Fetch Stats Use Case
pub struct FetchStatsUseCase<S>
where
    S: StatsSource,
{
    source: Arc<S>,
    config: Arc<CardsConfig>,
}

impl<S> FetchStatsUseCase<S>
where
    S: StatsSource,
{
    pub fn new(source: Arc<S>, config: Arc<CardsConfig>) -> Self {
        Self { source, config }
    }

    pub async fn execute(&self, input: FetchStatsInput) -> CardResult<UserStats> {
        let query = StatsQuery {
            login: input.username.clone(),
            commits_year: input.commits_year,
            extras: input.extras,
            multi_page_stars: self.config.multi_page_stars,
        };
        let activity = self.source.user_activity(&query).await?;

        let total_commits = if input.include_all_commits {
            self.source.total_commits(&input.username).await?
        } else {
            activity.commits
        };

        let excluded: Vec<String> = self
            .config
            .exclude_repo
            .iter()
            .chain(&input.exclude_repo)
            .cloned()
            .collect();
        let total_stars = sum_stars(&activity.repositories, &excluded);
        let total_issues = activity.open_issues + activity.closed_issues;

        let rank = calculate_rank(&RankInput {
            all_commits: input.include_all_commits,
            commits: total_commits,
            prs: activity.prs,
            issues: total_issues,
            reviews: activity.reviews,
            repos: activity.repository_count,
            stars: total_stars,
            followers: activity.followers,
        });

        tracing::debug!(
            login = %activity.login,
            level = %rank.level,
            percentile = rank.percentile,
            "Computed user stats"
        );

        Ok(UserStats {
            name: activity.name.clone().unwrap_or_else(|| activity.login.clone()),
            login: activity.login,
            total_stars,
            total_commits,
            total_prs: activity.prs,
            total_prs_merged: activity.merged_prs,
            merged_prs_percentage: activity
                .merged_prs
                .map(|merged| merged_prs_percentage(merged, activity.prs)),
            total_reviews: activity.reviews,
            total_issues,
            total_discussions_started: activity.discussions_started,
            total_discussions_answered: activity.discussions_answered,
            contributed_to: activity.contributed_to,
            rank,
        })
    }
}
