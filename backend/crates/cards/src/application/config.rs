//! Application Configuration
//!
//! Configuration for the cards application layer, read once at startup.

use platform::cache::{CacheOverride, CachePolicy};

use crate::domain::access::AccessLists;

pub const WHITELIST_KEY: &str = "WHITELIST";
pub const GIST_WHITELIST_KEY: &str = "GIST_WHITELIST";
pub const EXCLUDE_REPO_KEY: &str = "EXCLUDE_REPO";
pub const CACHE_SECONDS_KEY: &str = "CACHE_SECONDS";
pub const FETCH_MULTI_PAGE_STARS_KEY: &str = "FETCH_MULTI_PAGE_STARS";
pub const APP_ENV_KEY: &str = "APP_ENV";

/// Cards application configuration
#[derive(Debug, Clone, Default)]
pub struct CardsConfig {
    /// Allow/deny lists for the access guard
    pub access: AccessLists,
    /// Repositories left out of star counts and language stats
    pub exclude_repo: Vec<String>,
    /// Cache-Control behaviour
    pub cache: CachePolicy,
    /// Page through every starred repository instead of the first 100
    pub multi_page_stars: bool,
}

impl CardsConfig {
    /// Build the config from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let access = AccessLists {
            whitelist: lookup(WHITELIST_KEY).map(|raw| parse_list(&raw)),
            gist_whitelist: lookup(GIST_WHITELIST_KEY).map(|raw| parse_list(&raw)),
            ..AccessLists::default()
        };

        let cache = CachePolicy {
            override_seconds: lookup(CACHE_SECONDS_KEY).map(|raw| CacheOverride::parse(&raw)),
            disabled: lookup(APP_ENV_KEY).is_some_and(|env| env == "development"),
        };

        let config = Self {
            access,
            exclude_repo: lookup(EXCLUDE_REPO_KEY)
                .map(|raw| parse_list(&raw))
                .unwrap_or_default(),
            cache,
            multi_page_stars: lookup(FETCH_MULTI_PAGE_STARS_KEY).is_some_and(|raw| raw == "true"),
        };

        tracing::info!(
            whitelist = config.access.whitelist.as_ref().map(Vec::len),
            gist_whitelist = config.access.gist_whitelist.as_ref().map(Vec::len),
            excluded_repos = config.exclude_repo.len(),
            cache_override = ?config.cache.override_seconds,
            caching_disabled = config.cache.disabled,
            multi_page_stars = config.multi_page_stars,
            "Loaded cards configuration"
        );

        config
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
