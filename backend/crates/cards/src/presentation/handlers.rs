//! HTTP Handlers
//!
//! Every handler runs the access guard before touching an upstream and
//! attaches a `Cache-Control` header to both successes and errors.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use platform::cache::{CacheTtl, parse_int};
use serde::Serialize;

use crate::application::config::CardsConfig;
use crate::application::fetch_contributions::FetchContributionsUseCase;
use crate::application::fetch_gist::FetchGistUseCase;
use crate::application::fetch_repo::FetchRepoUseCase;
use crate::application::fetch_stats::{FetchStatsInput, FetchStatsUseCase};
use crate::application::fetch_top_langs::{FetchTopLanguagesInput, FetchTopLanguagesUseCase};
use crate::application::fetch_wakatime::FetchWakaTimeUseCase;
use crate::domain::access::AccessGuard;
use crate::domain::entities::{Streak, WakaTimeStats};
use crate::domain::repository::{GithubSources, WakaTimeSource};
use crate::domain::value_objects::{
    ActivityDays, LangsCount, LanguageWeights, ResourceKind, StatsExtras,
};
use crate::error::{CardError, CardResult};
use crate::presentation::dto::{
    ActivityResponse, ContributionParams, GistParams, GistResponse, PinParams, RepoResponse,
    StatsParams, StatsResponse, TopLangsParams, TopLangsResponse, WakaTimeParams, parse_array,
    parse_boolean,
};

/// Shared state for card handlers
#[derive(Clone)]
pub struct CardsAppState<G, W>
where
    G: GithubSources,
    W: WakaTimeSource + Clone + Send + Sync + 'static,
{
    pub github: Arc<G>,
    pub wakatime: Arc<W>,
    pub guard: Arc<AccessGuard>,
    pub config: Arc<CardsConfig>,
}

impl<G, W> CardsAppState<G, W>
where
    G: GithubSources,
    W: WakaTimeSource + Clone + Send + Sync + 'static,
{
    pub fn new(github: G, wakatime: W, config: CardsConfig) -> Self {
        Self {
            github: Arc::new(github),
            wakatime: Arc::new(wakatime),
            guard: Arc::new(AccessGuard::new(config.access.clone())),
            config: Arc::new(config),
        }
    }

    /// Reject identifiers the deployment does not serve
    fn admit(&self, identifier: &str, kind: ResourceKind) -> CardResult<()> {
        let decision = self.guard.check(identifier, kind);
        match decision.reason {
            Some(reason) => Err(CardError::denied(kind, reason)),
            None => Ok(()),
        }
    }

    fn respond<T: Serialize>(
        &self,
        ttl: CacheTtl,
        cache_seconds: Option<&str>,
        result: CardResult<T>,
    ) -> Response {
        let policy = &self.config.cache;
        match result {
            Ok(body) => {
                let seconds = policy.resolve(ttl, cache_seconds.and_then(parse_int));
                ([(header::CACHE_CONTROL, policy.header_value(seconds))], Json(body)).into_response()
            }
            Err(err) => err.into_response_with(policy),
        }
    }

    fn reject(&self, rejection: QueryRejection) -> Response {
        CardError::from(rejection).into_response_with(&self.config.cache)
    }
}

fn require_username(username: Option<&str>) -> CardResult<&str> {
    username
        .filter(|name| !name.is_empty())
        .ok_or_else(|| CardError::MissingParam(vec!["username"]))
}

/// GET /api
pub async fn stats_card<G, W>(
    State(state): State<CardsAppState<G, W>>,
    query: Result<Query<StatsParams>, QueryRejection>,
) -> Response
where
    G: GithubSources,
    W: WakaTimeSource + Clone + Send + Sync + 'static,
{
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => return state.reject(rejection),
    };
    let result = load_stats(&state, &params).await;
    state.respond(CacheTtl::STATS, params.cache_seconds.as_deref(), result)
}

async fn load_stats<G, W>(state: &CardsAppState<G, W>, params: &StatsParams) -> CardResult<StatsResponse>
where
    G: GithubSources,
    W: WakaTimeSource + Clone + Send + Sync + 'static,
{
    let username = require_username(params.username.as_deref())?;
    state.admit(username, ResourceKind::Username)?;

    let show = parse_array(params.show.as_deref());
    let input = FetchStatsInput {
        username: username.to_string(),
        include_all_commits: parse_boolean(params.include_all_commits.as_deref()).unwrap_or(false),
        commits_year: params
            .commits_year
            .as_deref()
            .and_then(parse_int)
            .and_then(|year| i32::try_from(year).ok()),
        exclude_repo: parse_array(params.exclude_repo.as_deref()),
        extras: StatsExtras::from_show(&show),
    };

    let use_case = FetchStatsUseCase::new(state.github.clone(), state.config.clone());
    Ok(use_case.execute(input).await?.into())
}

/// GET /api/top-langs
pub async fn top_langs_card<G, W>(
    State(state): State<CardsAppState<G, W>>,
    query: Result<Query<TopLangsParams>, QueryRejection>,
) -> Response
where
    G: GithubSources,
    W: WakaTimeSource + Clone + Send + Sync + 'static,
{
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => return state.reject(rejection),
    };
    let result = load_top_langs(&state, &params).await;
    state.respond(CacheTtl::TOP_LANGS, params.cache_seconds.as_deref(), result)
}

async fn load_top_langs<G, W>(
    state: &CardsAppState<G, W>,
    params: &TopLangsParams,
) -> CardResult<TopLangsResponse>
where
    G: GithubSources,
    W: WakaTimeSource + Clone + Send + Sync + 'static,
{
    let username = require_username(params.username.as_deref())?;
    state.admit(username, ResourceKind::Username)?;

    let defaults = LanguageWeights::default();
    let weight = |raw: Option<&str>, default: f64| {
        raw.and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .unwrap_or(default)
    };
    let input = FetchTopLanguagesInput {
        username: username.to_string(),
        exclude_repo: parse_array(params.exclude_repo.as_deref()),
        hide: parse_array(params.hide.as_deref()),
        langs_count: params
            .langs_count
            .as_deref()
            .and_then(parse_int)
            .map(LangsCount::clamped)
            .unwrap_or_default(),
        weights: LanguageWeights {
            size: weight(params.size_weight.as_deref(), defaults.size),
            count: weight(params.count_weight.as_deref(), defaults.count),
        },
    };

    let use_case = FetchTopLanguagesUseCase::new(state.github.clone(), state.config.clone());
    let languages = use_case.execute(input).await?;
    Ok(TopLangsResponse { languages })
}

/// GET /api/pin
pub async fn pin_card<G, W>(
    State(state): State<CardsAppState<G, W>>,
    query: Result<Query<PinParams>, QueryRejection>,
) -> Response
where
    G: GithubSources,
    W: WakaTimeSource + Clone + Send + Sync + 'static,
{
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => return state.reject(rejection),
    };
    let result = load_pin(&state, &params).await;
    state.respond(CacheTtl::PIN, params.cache_seconds.as_deref(), result)
}

async fn load_pin<G, W>(state: &CardsAppState<G, W>, params: &PinParams) -> CardResult<RepoResponse>
where
    G: GithubSources,
    W: WakaTimeSource + Clone + Send + Sync + 'static,
{
    if let Some(username) = params.username.as_deref().filter(|name| !name.is_empty()) {
        state.admit(username, ResourceKind::Username)?;
    }

    let use_case = FetchRepoUseCase::new(state.github.clone());
    let repo = use_case
        .execute(params.username.as_deref(), params.repo.as_deref())
        .await?;
    Ok(repo.into())
}

/// GET /api/gist
pub async fn gist_card<G, W>(
    State(state): State<CardsAppState<G, W>>,
    query: Result<Query<GistParams>, QueryRejection>,
) -> Response
where
    G: GithubSources,
    W: WakaTimeSource + Clone + Send + Sync + 'static,
{
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => return state.reject(rejection),
    };
    let result = load_gist(&state, &params).await;
    state.respond(CacheTtl::GIST, params.cache_seconds.as_deref(), result)
}

async fn load_gist<G, W>(state: &CardsAppState<G, W>, params: &GistParams) -> CardResult<GistResponse>
where
    G: GithubSources,
    W: WakaTimeSource + Clone + Send + Sync + 'static,
{
    if let Some(id) = params.id.as_deref().filter(|id| !id.is_empty()) {
        state.admit(id, ResourceKind::Gist)?;
    }

    let use_case = FetchGistUseCase::new(state.github.clone());
    Ok(use_case.execute(params.id.as_deref()).await?.into())
}

/// GET /api/wakatime
pub async fn wakatime_card<G, W>(
    State(state): State<CardsAppState<G, W>>,
    query: Result<Query<WakaTimeParams>, QueryRejection>,
) -> Response
where
    G: GithubSources,
    W: WakaTimeSource + Clone + Send + Sync + 'static,
{
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => return state.reject(rejection),
    };
    let result = load_wakatime(&state, &params).await;
    state.respond(CacheTtl::WAKATIME, params.cache_seconds.as_deref(), result)
}

async fn load_wakatime<G, W>(
    state: &CardsAppState<G, W>,
    params: &WakaTimeParams,
) -> CardResult<WakaTimeStats>
where
    G: GithubSources,
    W: WakaTimeSource + Clone + Send + Sync + 'static,
{
    let username = require_username(params.username.as_deref())?;
    state.admit(username, ResourceKind::WakatimeUsername)?;

    let use_case = FetchWakaTimeUseCase::new(state.wakatime.clone());
    use_case.execute(username, params.api_domain.as_deref()).await
}

/// GET /api/streak
pub async fn streak_card<G, W>(
    State(state): State<CardsAppState<G, W>>,
    query: Result<Query<ContributionParams>, QueryRejection>,
) -> Response
where
    G: GithubSources,
    W: WakaTimeSource + Clone + Send + Sync + 'static,
{
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => return state.reject(rejection),
    };
    let result = load_streak(&state, &params).await;
    state.respond(CacheTtl::STREAK, params.cache_seconds.as_deref(), result)
}

async fn load_streak<G, W>(state: &CardsAppState<G, W>, params: &ContributionParams) -> CardResult<Streak>
where
    G: GithubSources,
    W: WakaTimeSource + Clone + Send + Sync + 'static,
{
    let username = require_username(params.username.as_deref())?;
    state.admit(username, ResourceKind::Username)?;

    FetchContributionsUseCase::new(state.github.clone())
        .streak(username)
        .await
}

/// GET /api/activity
pub async fn activity_card<G, W>(
    State(state): State<CardsAppState<G, W>>,
    query: Result<Query<ContributionParams>, QueryRejection>,
) -> Response
where
    G: GithubSources,
    W: WakaTimeSource + Clone + Send + Sync + 'static,
{
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => return state.reject(rejection),
    };
    let result = load_activity(&state, &params).await;
    state.respond(CacheTtl::ACTIVITY, params.cache_seconds.as_deref(), result)
}

async fn load_activity<G, W>(
    state: &CardsAppState<G, W>,
    params: &ContributionParams,
) -> CardResult<ActivityResponse>
where
    G: GithubSources,
    W: WakaTimeSource + Clone + Send + Sync + 'static,
{
    let username = require_username(params.username.as_deref())?;
    state.admit(username, ResourceKind::Username)?;

    let window = params
        .days
        .as_deref()
        .and_then(parse_int)
        .map(ActivityDays::clamped)
        .unwrap_or_default();
    let days = FetchContributionsUseCase::new(state.github.clone())
        .activity(username, window)
        .await?;
    Ok(ActivityResponse { days })
}
