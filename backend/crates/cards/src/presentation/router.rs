//! Cards Router

use axum::{Router, routing::get};

use crate::application::config::CardsConfig;
use crate::domain::repository::{GithubSources, WakaTimeSource};
use crate::infra::github::GithubSource;
use crate::infra::wakatime::WakaTimeClient;
use crate::presentation::handlers::{self, CardsAppState};

/// Create the cards router backed by the live GitHub and WakaTime clients
pub fn cards_router(github: GithubSource, wakatime: WakaTimeClient, config: CardsConfig) -> Router {
    cards_router_generic(github, wakatime, config)
}

/// Create a cards router for any source implementation
pub fn cards_router_generic<G, W>(github: G, wakatime: W, config: CardsConfig) -> Router
where
    G: GithubSources,
    W: WakaTimeSource + Clone + Send + Sync + 'static,
{
    let state = CardsAppState::new(github, wakatime, config);

    Router::new()
        .route("/", get(handlers::stats_card::<G, W>))
        .route("/top-langs", get(handlers::top_langs_card::<G, W>))
        .route("/pin", get(handlers::pin_card::<G, W>))
        .route("/gist", get(handlers::gist_card::<G, W>))
        .route("/wakatime", get(handlers::wakatime_card::<G, W>))
        .route("/streak", get(handlers::streak_card::<G, W>))
        .route("/activity", get(handlers::activity_card::<G, W>))
        .with_state(state)
}
