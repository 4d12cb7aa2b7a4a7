//! Fetch WakaTime Use Case

use std::sync::Arc;

use crate::domain::entities::WakaTimeStats;
use crate::domain::repository::WakaTimeSource;
use crate::error::CardResult;

pub const DEFAULT_API_DOMAIN: &str = "wakatime.com";

pub struct FetchWakaTimeUseCase<W>
where
    W: WakaTimeSource,
{
    source: Arc<W>,
}

impl<W> FetchWakaTimeUseCase<W>
where
    W: WakaTimeSource,
{
    pub fn new(source: Arc<W>) -> Self {
        Self { source }
    }

    /// `api_domain` defaults to wakatime.com; trailing slashes are ignored
    pub async fn execute(&self, username: &str, api_domain: Option<&str>) -> CardResult<WakaTimeStats> {
        let api_domain = api_domain
            .map(|domain| domain.trim_end_matches('/'))
            .filter(|domain| !domain.is_empty())
            .unwrap_or(DEFAULT_API_DOMAIN);
        self.source.stats(username, api_domain).await
    }
}
