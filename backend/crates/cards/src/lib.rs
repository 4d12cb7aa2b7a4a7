//! Profile Cards Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Rank scoring, access control, entities, source traits
//! - `application/` - One use case per card
//! - `infra/` - GitHub GraphQL/REST and WakaTime implementations
//! - `presentation/` - HTTP handlers
//!
//! ## Upstream Model
//! - Every GitHub call goes through `platform::retry::RateLimitRetrier`,
//!   which rotates through the `PAT_<n>` tokens on rate limits
//! - The access guard runs before any upstream call
//! - Every response, including errors, carries a `Cache-Control` header

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::CardsConfig;
pub use error::{CardError, CardResult};
pub use infra::github::GithubSource;
pub use infra::wakatime::WakaTimeClient;
pub use presentation::router::{cards_router, cards_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
