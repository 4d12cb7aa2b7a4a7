//! Card Error Types
//!
//! This module provides card-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::extract::rejection::QueryRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::cache::CachePolicy;
use platform::retry::RetryError;
use thiserror::Error;

use crate::domain::access::DenyReason;
use crate::domain::value_objects::ResourceKind;

/// Card-specific result type alias
pub type CardResult<T> = Result<T, CardError>;

const DEPLOY_OWN_INSTANCE: &str = "Please deploy your own instance";
const TRY_AGAIN_LATER: &str = "Please try again later";

/// Card-specific error variants
#[derive(Debug, Error)]
pub enum CardError {
    /// Required query parameters are absent
    #[error("Missing params {} make sure you pass the parameters in URL", quote_params(.0))]
    MissingParam(Vec<&'static str>),

    #[error("{0}")]
    InvalidParam(String),

    #[error(transparent)]
    Query(#[from] QueryRejection),

    #[error("{}", not_whitelisted_message(.0))]
    NotWhitelisted(ResourceKind),

    #[error("This username is blacklisted")]
    Blacklisted,

    #[error("{0}")]
    UserNotFound(String),

    #[error("{0}")]
    RepoNotFound(String),

    #[error("Gist not found")]
    GistNotFound,

    #[error("Could not resolve to a User with the login of '{0}'")]
    WakaTimeUserNotFound(String),

    /// GraphQL `errors` other than not-found
    #[error("{0}")]
    Graphql(String),

    /// Non-success response that was not a credential problem
    #[error("GitHub responded with status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Could not fetch total commits.")]
    CommitsUnavailable,

    #[error("Upstream returned an unexpected payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Could not reach upstream: {0}")]
    Transport(String),

    #[error("No GitHub API tokens found")]
    NoCredentials,

    #[error("Downtime due to GitHub API rate limiting")]
    RateLimited,
}

fn quote_params(params: &[&str]) -> String {
    params
        .iter()
        .map(|param| format!("\"{param}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn not_whitelisted_message(kind: &ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Gist => "This gist ID is not whitelisted",
        ResourceKind::Username | ResourceKind::WakatimeUsername => {
            "This username is not whitelisted"
        }
    }
}

impl CardError {
    /// Error for a request the access guard refused
    pub fn denied(kind: ResourceKind, reason: DenyReason) -> Self {
        match reason {
            DenyReason::NotWhitelisted => CardError::NotWhitelisted(kind),
            DenyReason::Blacklisted => CardError::Blacklisted,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CardError::MissingParam(_) | CardError::InvalidParam(_) | CardError::Query(_) => {
                ErrorKind::BadRequest
            }
            CardError::NotWhitelisted(_) | CardError::Blacklisted => ErrorKind::Forbidden,
            CardError::UserNotFound(_)
            | CardError::RepoNotFound(_)
            | CardError::GistNotFound
            | CardError::WakaTimeUserNotFound(_) => ErrorKind::NotFound,
            CardError::Graphql(_)
            | CardError::Upstream { .. }
            | CardError::CommitsUnavailable
            | CardError::Decode(_)
            | CardError::Transport(_) => ErrorKind::BadGateway,
            CardError::NoCredentials => ErrorKind::InternalServerError,
            CardError::RateLimited => ErrorKind::ServiceUnavailable,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            CardError::NoCredentials => {
                tracing::error!("No GitHub tokens configured");
            }
            CardError::RateLimited => {
                tracing::warn!("Every GitHub token is rate limited");
            }
            CardError::Graphql(_)
            | CardError::Upstream { .. }
            | CardError::CommitsUnavailable
            | CardError::Decode(_)
            | CardError::Transport(_) => {
                tracing::warn!(error = %self, "Upstream failure");
            }
            _ => {
                tracing::debug!(error = %self, "Card request rejected");
            }
        }
    }

    /// Render with the error `Cache-Control` of the given policy
    pub fn into_response_with(self, policy: &CachePolicy) -> Response {
        self.log();
        let cache_control = policy.error_header_value();
        let mut response = AppError::from(self).into_response();
        if let Ok(value) = cache_control.parse() {
            response.headers_mut().insert(header::CACHE_CONTROL, value);
        }
        response
    }
}

impl From<RetryError> for CardError {
    fn from(err: RetryError) -> Self {
        match err {
            RetryError::NoCredentials => CardError::NoCredentials,
            RetryError::Exhausted { .. } => CardError::RateLimited,
            RetryError::Transport(source) => CardError::Transport(source.to_string()),
        }
    }
}

impl From<CardError> for AppError {
    fn from(err: CardError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        match err {
            CardError::Query(rejection) => AppError::from(rejection),
            CardError::Decode(source) => AppError::from(source),
            CardError::NotWhitelisted(_) | CardError::Blacklisted => {
                AppError::new(kind, message).with_action(DEPLOY_OWN_INSTANCE)
            }
            CardError::UserNotFound(_) => AppError::new(kind, message)
                .with_action("Make sure the provided username is not an organization"),
            CardError::WakaTimeUserNotFound(_) => AppError::new(kind, message)
                .with_action("Make sure you have a public WakaTime profile"),
            CardError::Graphql(_)
            | CardError::Upstream { .. }
            | CardError::CommitsUnavailable
            | CardError::Transport(_) => AppError::new(kind, message).with_action(TRY_AGAIN_LATER),
            CardError::NoCredentials => AppError::new(kind, message).with_action(
                "Please add an env variable called PAT_1 with your GitHub API token",
            ),
            CardError::RateLimited => AppError::new(kind, message)
                .with_action("Please try again later or deploy your own instance"),
            _ => AppError::new(kind, message),
        }
    }
}

impl IntoResponse for CardError {
    fn into_response(self) -> Response {
        self.into_response_with(&CachePolicy::default())
    }
}
