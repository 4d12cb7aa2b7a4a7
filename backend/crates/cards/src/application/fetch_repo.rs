//! Fetch Repository Use Case

use std::sync::Arc;

use crate::domain::entities::Repository;
use crate::domain::repository::RepositorySource;
use crate::domain::services::resolve_repository;
use crate::error::{CardError, CardResult};

pub struct FetchRepoUseCase<R>
where
    R: RepositorySource,
{
    source: Arc<R>,
}

impl<R> FetchRepoUseCase<R>
where
    R: RepositorySource,
{
    pub fn new(source: Arc<R>) -> Self {
        Self { source }
    }

    pub async fn execute(&self, username: Option<&str>, repo: Option<&str>) -> CardResult<Repository> {
        let present: fn(Option<&str>) -> Option<&str> = |value| value.filter(|value| !value.is_empty());
        let (owner, name) = match (present(username), present(repo)) {
            (Some(owner), Some(name)) => (owner, name),
            (None, None) => return Err(CardError::MissingParam(vec!["username", "repo"])),
            (None, Some(_)) => return Err(CardError::MissingParam(vec!["username"])),
            (Some(_), None) => return Err(CardError::MissingParam(vec!["repo"])),
        };

        let owners = self.source.repository(owner, name).await?;
        resolve_repository(owners)
    }
}
