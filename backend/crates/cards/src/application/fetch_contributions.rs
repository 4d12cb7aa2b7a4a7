//! Fetch Contributions Use Case
//!
//! Backs both the streak and the activity cards.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domain::entities::{ContributionDay, Streak};
use crate::domain::repository::ContributionSource;
use crate::domain::services::{compute_streak, recent_activity};
use crate::domain::value_objects::ActivityDays;
use crate::error::CardResult;

pub struct FetchContributionsUseCase<C>
where
    C: ContributionSource,
{
    source: Arc<C>,
}

impl<C> FetchContributionsUseCase<C>
where
    C: ContributionSource,
{
    pub fn new(source: Arc<C>) -> Self {
        Self { source }
    }

    pub async fn streak(&self, username: &str) -> CardResult<Streak> {
        self.streak_as_of(username, Utc::now().date_naive()).await
    }

    /// Streak with an explicit "today"
    pub async fn streak_as_of(&self, username: &str, today: NaiveDate) -> CardResult<Streak> {
        let days = self.source.contribution_calendar(username).await?;
        Ok(compute_streak(&days, today))
    }

    pub async fn activity(&self, username: &str, window: ActivityDays) -> CardResult<Vec<ContributionDay>> {
        let days = self.source.contribution_calendar(username).await?;
        Ok(recent_activity(&days, window))
    }
}
