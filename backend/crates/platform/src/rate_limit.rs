//! Upstream Rate Limit Detection
//!
//! GitHub reports an exhausted token in several inconsistent shapes, so
//! every one of them is checked:
//! - a GraphQL error entry whose `type` is `RATE_LIMITED`
//! - a `data.rateLimit.remaining` quota of zero
//! - an error message mentioning "rate limit" in any case
//!
//! Revoked, suspended or missing tokens are recognized separately from a
//! failed response.

use serde_json::Value;

/// GraphQL error `type` GitHub uses for an exhausted token
pub const RATE_LIMITED_ERROR_TYPE: &str = "RATE_LIMITED";

/// REST/GraphQL message for a revoked or malformed token
pub const BAD_CREDENTIALS_MESSAGE: &str = "Bad credentials";

/// Message returned for tokens of a suspended account
pub const ACCOUNT_SUSPENDED_MESSAGE: &str = "Sorry. Your account was suspended.";

/// Why a response was classified as rate limited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitSignal {
    /// An error entry carried the `RATE_LIMITED` type
    ErrorType,
    /// `rateLimit.remaining` reached zero
    QuotaExhausted,
    /// An error message mentioned "rate limit"
    Message,
}

/// Why a credential was refused outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialRejection {
    BadCredentials,
    AccountSuspended,
    /// Any other 401, e.g. the anonymous attempt past the end of the pool
    Unauthenticated,
}

/// Inspect an upstream envelope for any rate-limit signal
pub fn detect(body: &Value) -> Option<RateLimitSignal> {
    let errors = body
        .get("errors")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    if errors
        .iter()
        .any(|error| error.get("type").and_then(Value::as_str) == Some(RATE_LIMITED_ERROR_TYPE))
    {
        return Some(RateLimitSignal::ErrorType);
    }

    let remaining = body
        .pointer("/data/rateLimit/remaining")
        .and_then(Value::as_u64);
    if remaining == Some(0) {
        return Some(RateLimitSignal::QuotaExhausted);
    }

    let message_hit = errors
        .iter()
        .filter_map(|error| error.get("message").and_then(Value::as_str))
        .chain(body.get("message").and_then(Value::as_str))
        .any(mentions_rate_limit);
    if message_hit {
        return Some(RateLimitSignal::Message);
    }

    None
}

/// Inspect a failed response for a refused credential
pub fn credential_rejection(status: u16, body: &Value) -> Option<CredentialRejection> {
    match body.get("message").and_then(Value::as_str) {
        Some(BAD_CREDENTIALS_MESSAGE) => Some(CredentialRejection::BadCredentials),
        Some(ACCOUNT_SUSPENDED_MESSAGE) => Some(CredentialRejection::AccountSuspended),
        _ if status == 401 => Some(CredentialRejection::Unauthenticated),
        _ => None,
    }
}

fn mentions_rate_limit(message: &str) -> bool {
    message.to_ascii_lowercase().contains("rate limit")
}
