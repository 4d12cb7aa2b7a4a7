//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and upstream sources.
//! Contains one use case per card.

pub mod config;
pub mod fetch_contributions;
pub mod fetch_gist;
pub mod fetch_repo;
pub mod fetch_stats;
pub mod fetch_top_langs;
pub mod fetch_wakatime;
