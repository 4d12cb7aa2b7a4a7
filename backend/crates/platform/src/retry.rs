//! Credential-Rotating Retrier
//!
//! Runs an upstream operation with the first token of the pool and moves on
//! to the next token whenever the response shows the current one is rate
//! limited, revoked, or suspended. At most `pool.len() + 1` attempts are
//! made per call; the attempt counter lives on this call's stack only.

use std::error::Error;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::credentials::{Credential, CredentialPool};
use crate::rate_limit;

/// Boxed error for transport-level faults
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Upstream response passed through untouched
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

impl RawResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First GraphQL error entry as `(type, message)`
    pub fn first_error(&self) -> Option<(Option<&str>, &str)> {
        let error = self.body.get("errors")?.as_array()?.first()?;
        let kind = error.get("type").and_then(Value::as_str);
        let message = error.get("message").and_then(Value::as_str).unwrap_or_default();
        Some((kind, message))
    }

    /// REST-style top level `message`
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

/// Failure of a single upstream attempt
#[derive(Debug, Error)]
pub enum FetchFault {
    /// No response at all (DNS, connect, timeout, reset)
    #[error("upstream request failed: {0}")]
    Transport(#[source] BoxError),

    /// The upstream answered with a non-success status
    #[error("upstream responded with status {}", .0.status)]
    Status(RawResponse),
}

/// Fatal outcome of [`RateLimitRetrier::retry`]
#[derive(Debug, Error)]
pub enum RetryError {
    /// Misconfiguration: there is nothing to rotate through
    #[error("No GitHub API tokens found")]
    NoCredentials,

    /// Every credential was tried and refused
    #[error("Downtime due to GitHub API rate limiting")]
    Exhausted { attempts: usize },

    /// Network fault, not a credential problem
    #[error(transparent)]
    Transport(BoxError),
}

impl RetryError {
    /// Whether the failure should clear up by itself
    pub fn is_transient(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }
}

/// Retrier sharing one read-only credential pool
#[derive(Debug, Clone)]
pub struct RateLimitRetrier {
    pool: Arc<CredentialPool>,
}

impl RateLimitRetrier {
    pub fn new(pool: Arc<CredentialPool>) -> Self {
        Self { pool }
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    /// Run `operation` until a credential gets through
    ///
    /// `operation` receives the variables, the credential for this attempt
    /// (`None` on the final attempt, past the end of the pool) and the
    /// 0-based attempt index.
    ///
    /// ## Returns
    /// * `Ok(response)` - a success, or a non-retryable fault response
    ///   returned as-is for the caller to interpret
    /// * `Err(RetryError)` - empty pool, exhausted pool, or network fault
    pub async fn retry<V, F, Fut>(&self, operation: F, variables: V) -> Result<RawResponse, RetryError>
    where
        V: Clone,
        F: Fn(V, Option<Credential>, usize) -> Fut,
        Fut: Future<Output = Result<RawResponse, FetchFault>>,
    {
        if self.pool.is_empty() {
            tracing::error!("No GitHub tokens configured, refusing to call upstream");
            return Err(RetryError::NoCredentials);
        }

        let max_attempt = self.pool.len();
        for attempt in 0..=max_attempt {
            let credential = self.pool.get(attempt).cloned();
            let label = CredentialPool::label(attempt);
            match operation(variables.clone(), credential, attempt).await {
                Ok(response) => match rate_limit::detect(&response.body) {
                    Some(signal) => {
                        tracing::warn!(credential = %label, ?signal, "GitHub token rate limited, rotating to the next one");
                    }
                    None => return Ok(response),
                },
                Err(FetchFault::Transport(source)) => {
                    tracing::warn!(attempt, error = %source, "Upstream transport failure");
                    return Err(RetryError::Transport(source));
                }
                Err(FetchFault::Status(response)) => {
                    if let Some(rejection) =
                        rate_limit::credential_rejection(response.status, &response.body)
                    {
                        tracing::warn!(credential = %label, ?rejection, "GitHub token refused, rotating to the next one");
                    } else if let Some(signal) = rate_limit::detect(&response.body) {
                        tracing::warn!(credential = %label, ?signal, "GitHub token rate limited, rotating to the next one");
                    } else {
                        tracing::debug!(attempt, status = response.status, "Returning upstream fault response");
                        return Ok(response);
                    }
                }
            }
        }

        tracing::error!(attempts = max_attempt + 1, "All GitHub tokens are rate limited");
        Err(RetryError::Exhausted {
            attempts: max_attempt + 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn retrier(size: usize) -> RateLimitRetrier {
        let credentials = (1..=size)
            .map(|index| Credential::new(format!("token-{index}")))
            .collect();
        RateLimitRetrier::new(Arc::new(CredentialPool::new(credentials)))
    }

    fn rate_limited() -> RawResponse {
        RawResponse::new(
            200,
            json!({ "errors": [{ "type": "RATE_LIMITED", "message": "API rate limit exceeded" }] }),
        )
    }

    fn success() -> RawResponse {
        RawResponse::new(200, json!({ "data": { "user": { "login": "octocat" } } }))
    }

    /// Records every (credential, attempt) the retrier hands out
    #[derive(Default)]
    struct Calls(Mutex<Vec<(Option<String>, usize)>>);

    impl Calls {
        fn record(&self, credential: &Option<Credential>, attempt: usize) {
            self.0
                .lock()
                .unwrap()
                .push((credential.as_ref().map(|c| c.expose().to_string()), attempt));
        }

        fn count(&self) -> usize {
            self.0.lock().unwrap().len()
        }

        fn last(&self) -> (Option<String>, usize) {
            self.0.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[tokio::test]
    async fn test_exhausts_after_pool_size_plus_one_attempts() {
        let calls = Calls::default();
        let result = retrier(7)
            .retry(
                |_vars: (), credential, attempt| {
                    calls.record(&credential, attempt);
                    async { Ok(rate_limited()) }
                },
                (),
            )
            .await;

        assert!(matches!(result, Err(RetryError::Exhausted { attempts: 8 })));
        assert_eq!(calls.count(), 8);
        // No eighth token exists, so the final attempt goes out anonymously
        assert_eq!(calls.last(), (None, 7));
    }

    #[tokio::test]
    async fn test_immediate_success_invokes_once() {
        let calls = Calls::default();
        let result = retrier(3)
            .retry(
                |_vars: (), credential, attempt| {
                    calls.record(&credential, attempt);
                    async { Ok(success()) }
                },
                (),
            )
            .await
            .unwrap();

        assert_eq!(result, success());
        assert_eq!(calls.count(), 1);
        assert_eq!(calls.last(), (Some("token-1".to_string()), 0));
    }

    #[tokio::test]
    async fn test_rotates_until_third_credential_succeeds() {
        let calls = Calls::default();
        let result = retrier(7)
            .retry(
                |_vars: (), credential, attempt| {
                    calls.record(&credential, attempt);
                    async move {
                        if attempt < 2 {
                            Ok(rate_limited())
                        } else {
                            Ok(success())
                        }
                    }
                },
                (),
            )
            .await
            .unwrap();

        assert_eq!(result, success());
        assert_eq!(calls.count(), 3);
        assert_eq!(calls.last(), (Some("token-3".to_string()), 2));
    }

    #[tokio::test]
    async fn test_message_only_rate_limit_is_rotated() {
        let calls = Calls::default();
        let result = retrier(2)
            .retry(
                |_vars: (), credential, attempt| {
                    calls.record(&credential, attempt);
                    async move {
                        if attempt == 0 {
                            Ok(RawResponse::new(
                                200,
                                json!({ "errors": [{ "type": "SOMETHING_ELSE", "message": "You have exceeded a secondary RATE LIMIT" }] }),
                            ))
                        } else {
                            Ok(success())
                        }
                    }
                },
                (),
            )
            .await
            .unwrap();

        assert_eq!(result, success());
        assert_eq!(calls.count(), 2);
    }

    #[tokio::test]
    async fn test_quota_exhaustion_is_rotated() {
        let calls = Calls::default();
        let result = retrier(2)
            .retry(
                |_vars: (), credential, attempt| {
                    calls.record(&credential, attempt);
                    async move {
                        if attempt == 0 {
                            Ok(RawResponse::new(200, json!({ "data": { "rateLimit": { "remaining": 0 } } })))
                        } else {
                            Ok(success())
                        }
                    }
                },
                (),
            )
            .await;

        assert!(result.is_ok());
        assert_eq!(calls.count(), 2);
    }

    #[tokio::test]
    async fn test_empty_pool_fails_without_invoking() {
        let calls = Calls::default();
        let result = retrier(0)
            .retry(
                |_vars: (), credential, attempt| {
                    calls.record(&credential, attempt);
                    async { Ok(success()) }
                },
                (),
            )
            .await;

        assert!(matches!(result, Err(RetryError::NoCredentials)));
        assert_eq!(calls.count(), 0);
    }

    #[tokio::test]
    async fn test_bad_and_suspended_credentials_are_rotated() {
        let calls = Calls::default();
        let result = retrier(3)
            .retry(
                |_vars: (), credential, attempt| {
                    calls.record(&credential, attempt);
                    async move {
                        match attempt {
                            0 => Err(FetchFault::Status(RawResponse::new(
                                401,
                                json!({ "message": "Bad credentials" }),
                            ))),
                            1 => Err(FetchFault::Status(RawResponse::new(
                                403,
                                json!({ "message": "Sorry. Your account was suspended." }),
                            ))),
                            _ => Ok(success()),
                        }
                    }
                },
                (),
            )
            .await
            .unwrap();

        assert_eq!(result, success());
        assert_eq!(calls.count(), 3);
    }

    #[tokio::test]
    async fn test_unauthenticated_final_attempt_ends_exhausted() {
        let calls = Calls::default();
        let result = retrier(2)
            .retry(
                |_vars: (), credential, attempt| {
                    calls.record(&credential, attempt);
                    async move {
                        match credential {
                            Some(_) => Ok(rate_limited()),
                            None => Err(FetchFault::Status(RawResponse::new(
                                401,
                                json!({ "message": "This endpoint requires you to be authenticated." }),
                            ))),
                        }
                    }
                },
                (),
            )
            .await;

        assert!(matches!(result, Err(RetryError::Exhausted { attempts: 3 })));
        assert_eq!(calls.count(), 3);
        assert_eq!(calls.last(), (None, 2));
    }

    #[tokio::test]
    async fn test_transport_fault_is_not_retried() {
        let calls = Calls::default();
        let result = retrier(5)
            .retry(
                |_vars: (), credential, attempt| {
                    calls.record(&credential, attempt);
                    async {
                        Err(FetchFault::Transport(Box::new(std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            "connection reset by peer",
                        ))))
                    }
                },
                (),
            )
            .await;

        match result {
            Err(RetryError::Transport(source)) => {
                assert!(source.to_string().contains("connection reset"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
        assert_eq!(calls.count(), 1);
    }

    #[tokio::test]
    async fn test_other_fault_response_returned_as_is() {
        let calls = Calls::default();
        let not_found = RawResponse::new(404, json!({ "message": "Not Found" }));
        let result = retrier(5)
            .retry(
                |_vars: (), credential, attempt| {
                    calls.record(&credential, attempt);
                    let response = not_found.clone();
                    async move { Err(FetchFault::Status(response)) }
                },
                (),
            )
            .await
            .unwrap();

        assert_eq!(result, not_found);
        assert!(!result.is_success());
        assert_eq!(calls.count(), 1);
    }

    #[tokio::test]
    async fn test_variables_reach_every_attempt() {
        let seen = Mutex::new(Vec::new());
        let _ = retrier(1)
            .retry(
                |vars: Value, _credential, _attempt| {
                    seen.lock().unwrap().push(vars);
                    async { Ok(rate_limited()) }
                },
                json!({ "login": "octocat" }),
            )
            .await;

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|vars| vars["login"] == "octocat"));
    }

    #[tokio::test]
    async fn test_fresh_calls_start_from_first_credential() {
        let retrier = retrier(3);
        for _ in 0..2 {
            let calls = Calls::default();
            let _ = retrier
                .retry(
                    |_vars: (), credential, attempt| {
                        calls.record(&credential, attempt);
                        async move {
                            if attempt == 0 {
                                Ok(rate_limited())
                            } else {
                                Ok(success())
                            }
                        }
                    },
                    (),
                )
                .await;
            assert_eq!(calls.0.lock().unwrap()[0], (Some("token-1".to_string()), 0));
        }
    }

    #[test]
    fn test_first_error_and_message() {
        let response = RawResponse::new(
            200,
            json!({ "errors": [{ "type": "NOT_FOUND", "message": "Could not resolve" }] }),
        );
        assert_eq!(response.first_error(), Some((Some("NOT_FOUND"), "Could not resolve")));
        assert_eq!(response.message(), None);

        let response = RawResponse::new(422, json!({ "message": "Validation Failed" }));
        assert_eq!(response.message(), Some("Validation Failed"));
        assert!(response.first_error().is_none());
    }

    #[test]
    fn test_only_exhaustion_is_transient() {
        assert!(RetryError::Exhausted { attempts: 3 }.is_transient());
        assert!(!RetryError::NoCredentials.is_transient());
    }
}
