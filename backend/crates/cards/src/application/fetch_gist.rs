//! Fetch Gist Use Case

use std::sync::Arc;

use crate::domain::entities::Gist;
use crate::domain::repository::GistSource;
use crate::domain::services::build_gist;
use crate::error::{CardError, CardResult};

pub struct FetchGistUseCase<G>
where
    G: GistSource,
{
    source: Arc<G>,
}

impl<G> FetchGistUseCase<G>
where
    G: GistSource,
{
    pub fn new(source: Arc<G>) -> Self {
        Self { source }
    }

    pub async fn execute(&self, id: Option<&str>) -> CardResult<Gist> {
        let id = id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CardError::MissingParam(vec!["id"]))?;
        let gist = self.source.gist(id).await?.ok_or(CardError::GistNotFound)?;
        build_gist(gist)
    }
}
