//! Fetch Top Languages Use Case

use std::sync::Arc;

use crate::application::config::CardsConfig;
use crate::domain::entities::LanguageStat;
use crate::domain::repository::LanguageSource;
use crate::domain::services::{aggregate_languages, select_top_languages};
use crate::domain::value_objects::{LangsCount, LanguageWeights};
use crate::error::CardResult;

#[derive(Debug, Clone, Default)]
pub struct FetchTopLanguagesInput {
    pub username: String,
    pub exclude_repo: Vec<String>,
    pub hide: Vec<String>,
    pub langs_count: LangsCount,
    pub weights: LanguageWeights,
}

pub struct FetchTopLanguagesUseCase<L>
where
    L: LanguageSource,
{
    source: Arc<L>,
    config: Arc<CardsConfig>,
}

impl<L> FetchTopLanguagesUseCase<L>
where
    L: LanguageSource,
{
    pub fn new(source: Arc<L>, config: Arc<CardsConfig>) -> Self {
        Self { source, config }
    }

    pub async fn execute(&self, input: FetchTopLanguagesInput) -> CardResult<Vec<LanguageStat>> {
        let repositories = self.source.repository_languages(&input.username).await?;

        let excluded: Vec<String> = self
            .config
            .exclude_repo
            .iter()
            .chain(&input.exclude_repo)
            .cloned()
            .collect();
        let ranked = aggregate_languages(&repositories, &excluded, input.weights);

        Ok(select_top_languages(ranked, &input.hide, input.langs_count))
    }
}
